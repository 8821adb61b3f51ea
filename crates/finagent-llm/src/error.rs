//! Errors from talking to a chat model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    #[error("LLM API rejected the credentials")]
    AuthenticationFailed,

    #[error("LLM rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("LLM rejected the request: {0}")]
    InvalidRequest(String),

    #[error("Unknown model: {0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The reply could not be understood
    #[error("Unexpected LLM response: {0}")]
    UnexpectedResponse(String),

    #[error("LLM configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Classify a non-success HTTP status from a completions endpoint
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed,
            429 => Self::RateLimitExceeded(body),
            400 | 422 => Self::InvalidRequest(body),
            404 => Self::ModelNotFound(model.to_string()),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}
