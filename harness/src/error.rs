use servicenow::ApiError;
use thiserror::Error;

/// Failures of the suite itself, as opposed to failed checks.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
