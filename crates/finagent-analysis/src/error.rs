//! Error types for financial analysis operations

use thiserror::Error;

/// Financial analysis specific errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The statement provider answered with an error payload
    #[error("API error: {0}")]
    Api(String),

    /// Statements for the requested ticker could not be obtained
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while reading fixtures or writing reports
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external call did not finish in time
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Prompt template failed to render
    #[error("Prompt error: {0}")]
    Prompt(#[from] minijinja::Error),

    /// The analyst agent failed
    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Convert AnalysisError to finagent_core::Error
impl From<AnalysisError> for finagent_core::Error {
    fn from(err: AnalysisError) -> Self {
        finagent_core::Error::ProcessingFailed(err.to_string())
    }
}

/// Convert finagent_core::Error to AnalysisError
impl From<finagent_core::Error> for AnalysisError {
    fn from(err: finagent_core::Error) -> Self {
        AnalysisError::Agent(err.to_string())
    }
}
