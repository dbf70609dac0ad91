//! Configuration loading and management

use crate::core::validation::EmailStorage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the YAML config file
pub const CONFIG_ENV: &str = "PATIENT_CONFIG";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// HTTP bind settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Rules fed into the patient schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Email domains accepted by the email field (compared case-insensitively)
    pub allowed_email_domains: Vec<String>,

    /// Whether the email field keeps only the domain or the whole address
    pub email_storage: EmailStorage,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            allowed_email_domains: vec!["hdfc.com".to_string(), "icici.com".to_string()],
            email_storage: EmailStorage::Domain,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub validation: ValidationRules,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `PATIENT_CONFIG`, or fall back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                tracing::info!(path = ?path, "loading configuration");
                Self::from_yaml_file(path)
            }
            None => {
                tracing::info!("{} not set, using default configuration", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        let domains = &self.validation.allowed_email_domains;
        if domains.is_empty() {
            return Err(ConfigError::Invalid {
                field: "validation.allowed_email_domains".to_string(),
                message: "at least one domain is required".to_string(),
            });
        }
        if let Some(bad) = domains.iter().find(|d| d.contains('@') || d.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "validation.allowed_email_domains".to_string(),
                message: format!("'{}' is not a bare domain", bad),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(
            config.validation.allowed_email_domains,
            vec!["hdfc.com", "icici.com"]
        );
        assert_eq!(config.validation.email_storage, EmailStorage::Domain);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = AppConfig::from_yaml_str("server:\n  port: 9090\n").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.validation, ValidationRules::default());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_empty_allowlist() {
        let err = AppConfig::from_yaml_str("validation:\n  allowed_email_domains: []\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_address_in_allowlist() {
        let err = AppConfig::from_yaml_str(
            "validation:\n  allowed_email_domains: [\"sam@hdfc.com\"]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a bare domain"));
    }

    #[test]
    fn test_rejects_port_zero() {
        let err = AppConfig::from_yaml_str("server:\n  port: 0\n").unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_parse_error() {
        let err = AppConfig::from_yaml_str("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_yaml_file("/nonexistent/patient.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
