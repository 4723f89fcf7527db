//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP listener settings
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
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Page size bounds for collection endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Cross-origin settings
///
/// An empty origin list allows any origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paging: PagingConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "paging.max_page_size".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.paging.default_page_size == 0
            || self.paging.default_page_size > self.paging.max_page_size
        {
            return Err(ConfigError::InvalidValue {
                field: "paging.default_page_size".to_string(),
                value: self.paging.default_page_size.to_string(),
                message: format!("must be between 1 and {}", self.paging.max_page_size),
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
        assert_eq!(config.paging.default_page_size, 10);
        assert_eq!(config.paging.max_page_size, 50);
        assert_eq!(config.server.address(), "127.0.0.1:5000");
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("server:\n  port: 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.paging, PagingConfig::default());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_paging_is_rejected() {
        let err = AppConfig::from_yaml_str("paging:\n  default_page_size: 80\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_yaml_file("/nonexistent/roster.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
