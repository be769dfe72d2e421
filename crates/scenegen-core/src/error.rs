use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenegenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Enter keywords for your content")]
    EmptyKeyword,

    #[error("Failed to reach generation service: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status. The code only goes to logs.
    #[error("Failed to generate scenarios")]
    Status { status: u16 },

    #[error("Malformed response from generation service: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScenegenError>;
