use crate::types::ApiRequest;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("ServiceNow credentials not configured")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status code {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The one operation the validation checks need from an instance: send a
/// Table API request and hand back the decoded JSON body.
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value>;

    fn instance_name(&self) -> &str;
}
