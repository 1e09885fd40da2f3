//! Descriptor of the application package under test.
//!
//! The built-in descriptor covers the Siveillance Intrusion package. A TOML
//! file with the same (snake_case) keys can replace it at runtime.

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    String,
    Integer,
    Boolean,
    Password,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VarType::String => "string",
            VarType::Integer => "integer",
            VarType::Boolean => "boolean",
            VarType::Password => "password",
        };
        f.write_str(name)
    }
}

/// A configuration variable the package is expected to create as a system
/// property under its scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigVar {
    pub key: String,
    #[serde(rename = "type")]
    pub var_type: VarType,
}

impl ConfigVar {
    pub fn new(key: impl Into<String>, var_type: VarType) -> Self {
        Self {
            key: key.into(),
            var_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AppConfig {
    pub app_name: String,
    /// Namespace prefix of every artifact the package installs.
    pub scope: String,
    pub table_name: String,
    #[serde(default)]
    pub config_vars: Vec<ConfigVar>,
    #[serde(default)]
    pub required_roles: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Siveillance_Intrusion".to_string(),
            scope: "x_ic_siveillance".to_string(),
            table_name: "cmdb_ci_ot_ic_siveillance".to_string(),
            config_vars: vec![
                ConfigVar::new("SN_INSTANCE", VarType::String),
                ConfigVar::new("SN_API_KEY", VarType::String),
                ConfigVar::new("SIVEILLANCE_API_KEY", VarType::String),
                ConfigVar::new("SIVEILLANCE_PARTITION_ID", VarType::String),
                ConfigVar::new("SYNC_INTERVAL_SECONDS", VarType::Integer),
                ConfigVar::new("ENABLE_INCIDENT_CORRELATION", VarType::Boolean),
            ],
            required_roles: vec!["admin".to_string(), "ot_admin".to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> HarnessResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| HarnessError::Config {
            message: format!("Invalid application descriptor: {}", e),
        })?;
        config
            .validate()
            .map_err(|message| HarnessError::Config { message })?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Number of system properties the package should have created.
    pub fn expected_property_count(&self) -> usize {
        self.config_vars.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.app_name.trim().is_empty() {
            return Err("Application name cannot be empty".to_string());
        }

        if self.scope.trim().is_empty() {
            return Err("Scope cannot be empty".to_string());
        }

        if self.table_name.trim().is_empty() {
            return Err("Table name cannot be empty".to_string());
        }

        if self.config_vars.iter().any(|var| var.key.trim().is_empty()) {
            return Err("Config variable keys cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let config = AppConfig::default();
        assert_eq!(config.scope, "x_ic_siveillance");
        assert_eq!(config.table_name, "cmdb_ci_ot_ic_siveillance");
        assert_eq!(config.expected_property_count(), 6);
        assert_eq!(config.required_roles, vec!["admin", "ot_admin"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AppConfig::default()).unwrap();
        assert_eq!(json["appName"], "Siveillance_Intrusion");
        assert_eq!(json["tableName"], "cmdb_ci_ot_ic_siveillance");
        assert_eq!(json["configVars"][4]["key"], "SYNC_INTERVAL_SECONDS");
        assert_eq!(json["configVars"][4]["type"], "integer");
        assert_eq!(json["requiredRoles"][1], "ot_admin");
    }

    #[test]
    fn test_from_toml() {
        let raw = r#"
            app_name = "Badge_Readers"
            scope = "x_acme_badge"
            table_name = "u_badge_reader"
            required_roles = ["admin"]

            [[config_vars]]
            key = "BADGE_API_TOKEN"
            type = "password"

            [[config_vars]]
            key = "POLL_SECONDS"
            type = "integer"
        "#;

        let config = AppConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.app_name, "Badge_Readers");
        assert_eq!(config.expected_property_count(), 2);
        assert_eq!(config.config_vars[0].var_type, VarType::Password);
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        let missing_scope = r#"
            app_name = "Badge_Readers"
            scope = ""
            table_name = "u_badge_reader"
        "#;
        assert!(matches!(
            AppConfig::from_toml_str(missing_scope),
            Err(HarnessError::Config { .. })
        ));

        assert!(AppConfig::from_toml_str("app_name = 3").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(
            &path,
            "app_name = \"Gate\"\nscope = \"x_gate\"\ntable_name = \"u_gate\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.scope, "x_gate");
        assert!(config.config_vars.is_empty());

        assert!(matches!(
            AppConfig::from_file(&dir.path().join("missing.toml")),
            Err(HarnessError::Io(_))
        ));
    }
}
