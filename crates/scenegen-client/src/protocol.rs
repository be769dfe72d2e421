//! Wire types for the generation service.
//! These mirror the service's request models.

use serde::Serialize;

use scenegen_core::request::SubmissionRequest;

// ── Generate ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub keyword: &'a str,
    pub hashtags: &'a [String],
}

impl<'a> From<&'a SubmissionRequest> for GenerateRequest<'a> {
    fn from(req: &'a SubmissionRequest) -> Self {
        Self {
            keyword: &req.keyword,
            hashtags: &req.hashtags,
        }
    }
}

// Response is scenegen_core::scenario::GenerateResponse (validated on decode)
