use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_INSTANCE: &str = "lastmile.service-now.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_INSTANCE: &str = "SN_INSTANCE";
pub const ENV_USERNAME: &str = "SN_USERNAME";
pub const ENV_PASSWORD: &str = "SN_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "SN_TIMEOUT_SECS";

/// Connection settings for a ServiceNow instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Hostname as given by the user, e.g. `dev1234.service-now.com`.
    pub instance: String,
    #[serde(skip_serializing)]
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl InstanceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `SN_INSTANCE`, `SN_USERNAME`, `SN_PASSWORD` and `SN_TIMEOUT_SECS`.
    ///
    /// Absent credentials are not an error here; every API call fails with
    /// [`crate::ApiError::MissingCredentials`] instead.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(instance) = non_empty_var(ENV_INSTANCE) {
            config.instance = instance;
        }
        config.username = non_empty_var(ENV_USERNAME);
        config.password = non_empty_var(ENV_PASSWORD);

        if let Some(raw) = non_empty_var(ENV_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => warn!("Ignoring invalid {}: {}", ENV_TIMEOUT_SECS, raw),
            }
        }

        config
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credentials(&self) -> bool {
        matches!(
            (self.username.as_deref(), self.password.as_deref()),
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty()
        )
    }

    /// Instance URL with a scheme; bare hostnames get `https://`.
    pub fn base_url(&self) -> String {
        let trimmed = self.instance.trim_end_matches('/');
        if trimmed.starts_with("http") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.instance.trim().is_empty() {
            return Err("Instance cannot be empty".to_string());
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [ENV_INSTANCE, ENV_USERNAME, ENV_PASSWORD, ENV_TIMEOUT_SECS] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = InstanceConfig::default();
        assert_eq!(config.instance, "lastmile.service-now.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.has_credentials());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_prefixes_https() {
        let config = InstanceConfig::new().with_instance("dev1234.service-now.com");
        assert_eq!(config.base_url(), "https://dev1234.service-now.com");

        let config = InstanceConfig::new().with_instance("http://localhost:8080/");
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_has_credentials_requires_both() {
        let mut config = InstanceConfig::new().with_credentials("admin", "secret");
        assert!(config.has_credentials());

        config.password = Some(String::new());
        assert!(!config.has_credentials());

        config.password = None;
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_config_validation() {
        let mut config = InstanceConfig::default();

        config.instance = "  ".to_string();
        assert!(config.validate().is_err());

        config.instance = DEFAULT_INSTANCE.to_string();
        config.timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_not_serialized() {
        let config = InstanceConfig::new().with_credentials("admin", "secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("lastmile.service-now.com"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var(ENV_INSTANCE, "acme.service-now.com");
        std::env::set_var(ENV_USERNAME, "integration");
        std::env::set_var(ENV_PASSWORD, "hunter2");
        std::env::set_var(ENV_TIMEOUT_SECS, "25");

        let config = InstanceConfig::from_env();
        assert_eq!(config.instance, "acme.service-now.com");
        assert_eq!(config.username.as_deref(), Some("integration"));
        assert!(config.has_credentials());
        assert_eq!(config.timeout, Duration::from_secs(25));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_without_credentials() {
        clear_env();
        std::env::set_var(ENV_USERNAME, "");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let config = InstanceConfig::from_env();
        assert_eq!(config.instance, DEFAULT_INSTANCE);
        assert!(config.username.is_none());
        assert!(!config.has_credentials());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        clear_env();
    }
}
