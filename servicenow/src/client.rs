use crate::config::InstanceConfig;
use crate::provider::{ApiError, ApiResult, TableApi};
use crate::types::{ApiRequest, HttpMethod};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

/// Table API client for a single instance using basic authentication.
pub struct ServiceNowClient {
    http_client: reqwest::Client,
    base_url: String,
    config: InstanceConfig,
}

impl ServiceNowClient {
    pub fn new(config: InstanceConfig) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|message| ApiError::InvalidConfig { message })?;

        if !config.has_credentials() {
            warn!(
                "ServiceNow credentials not configured; set SN_USERNAME and SN_PASSWORD. \
                 Every live call will fail until they are provided."
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url(),
            config,
        })
    }

    pub fn from_env() -> ApiResult<Self> {
        Self::new(InstanceConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    fn credentials(&self) -> ApiResult<(&str, &str)> {
        match (self.config.username.as_deref(), self.config.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Ok((user, pass)),
            _ => Err(ApiError::MissingCredentials),
        }
    }

    fn reqwest_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl TableApi for ServiceNowClient {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let (username, password) = self.credentials()?;
        let url = format!("{}{}", self.base_url, request.path);

        debug!("{} {} {:?}", request.method, url, request.params);

        let mut builder = self
            .http_client
            .request(Self::reqwest_method(request.method), &url)
            .basic_auth(username, Some(password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn instance_name(&self) -> &str {
        &self.config.instance
    }
}
