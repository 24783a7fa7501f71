use thiserror::Error;

/// Top-level error type for the TextGrab backend.
#[derive(Debug, Error)]
pub enum TextGrabError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0} is not enabled on this server")]
    NotConfigured(String),

    #[error("provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TextGrabError {
    /// Wrap a failure coming back from an external provider.
    pub fn provider(provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TextGrabError>;
