//! Submission input: keyword plus an optional hashtag set.

use crate::error::{Result, ScenegenError};

/// Where the hashtags of a submission come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashtagSource {
    /// Tags chosen from the picker catalogue, already in final form.
    Selected(Vec<String>),
    /// Raw text; only whitespace-separated tokens starting with `#` are kept.
    FreeText(String),
}

impl HashtagSource {
    pub fn into_hashtags(self) -> Vec<String> {
        match self {
            HashtagSource::Selected(tags) => tags,
            HashtagSource::FreeText(text) => parse_hashtags(&text),
        }
    }
}

/// One generation request, as sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub keyword: String,
    pub hashtags: Vec<String>,
}

impl SubmissionRequest {
    /// Build a request. The keyword must contain something other than
    /// whitespace; it is otherwise passed through untouched.
    pub fn new(keyword: impl Into<String>, source: HashtagSource) -> Result<Self> {
        let keyword = keyword.into();
        if keyword.trim().is_empty() {
            return Err(ScenegenError::EmptyKeyword);
        }
        Ok(Self {
            keyword,
            hashtags: source.into_hashtags(),
        })
    }
}

/// Pull `#`-prefixed tokens out of free text. Order and duplicates are kept,
/// casing is not normalised.
pub fn parse_hashtags(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.starts_with('#'))
        .map(str::to_string)
        .collect()
}
