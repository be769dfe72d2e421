//! HTTP client for the scenario generation service.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use scenegen_core::request::SubmissionRequest;
use scenegen_core::scenario::GenerateResponse;
use scenegen_core::{Result, ScenegenError};

use crate::protocol::GenerateRequest;

/// Client for the generation service API.
pub struct GenerationClient {
    client: Client,
    base_url: String,
}

impl GenerationClient {
    /// Build a client. `timeout` of `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!(?timeout, "Failed to build HTTP client, using defaults without timeout: {}", e);
            Client::new()
        });
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit keywords and hashtags, returning the validated scenario set.
    ///
    /// One request, no retries. Non-2xx statuses, transport failures and
    /// bodies that do not match the response shape all come back as errors.
    #[instrument(skip(self, request), fields(keyword = %request.keyword, hashtags = request.hashtags.len()))]
    pub async fn generate(&self, request: &SubmissionRequest) -> Result<GenerateResponse> {
        let url = format!("{}/generate", self.base_url);
        let body = GenerateRequest::from(request);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScenegenError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Generation service returned an error status");
            return Err(ScenegenError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ScenegenError::Transport(e.to_string()))?;
        let response = GenerateResponse::from_json(&bytes)?;
        debug!(
            "Received {} scenarios ({} ranked hashtags)",
            response.scenarios.len(),
            response.top_hashtags.as_ref().map(Vec::len).unwrap_or(0)
        );
        Ok(response)
    }
}
