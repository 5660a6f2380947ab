//! Endpoint configuration and validated endpoint specifications.

use super::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw per-endpoint configuration as it appears in the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Display name used in reports. Not required to be unique.
    pub name: String,
    /// Absolute http/https URL to probe.
    pub url: String,
    /// Per-probe timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// How often this endpoint is probed, in seconds. Rounded to the
    /// nearest multiple of the scheduler tick at registration time.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_interval_seconds() -> u64 {
    30
}

/// Validated, immutable endpoint specification.
///
/// Created once at load time; read-only for the lifetime of the daemon.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub name: String,
    pub url: Url,
    pub timeout: Duration,
    pub interval: Duration,
}

impl TryFrom<&EndpointConfig> for EndpointSpec {
    type Error = ConfigError;

    fn try_from(config: &EndpointConfig) -> Result<Self, ConfigError> {
        if config.name.is_empty() {
            return Err(ConfigError::Validation {
                field: "name".to_string(),
                message: "name cannot be empty".to_string(),
            });
        }
        if config.url.is_empty() {
            return Err(ConfigError::Validation {
                field: "url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }

        let url = Url::parse(&config.url).map_err(|e| ConfigError::Validation {
            field: "url".to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "url".to_string(),
                message: format!("unsupported scheme: {}", url.scheme()),
            });
        }

        if config.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if config.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }

        Ok(EndpointSpec {
            name: config.name.clone(),
            url,
            timeout: Duration::from_secs(config.timeout_seconds),
            interval: Duration::from_secs(config.interval_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> EndpointConfig {
        EndpointConfig {
            name: "db".to_string(),
            url: "http://localhost:8081/health".to_string(),
            timeout_seconds: 5,
            interval_seconds: 30,
        }
    }

    #[test]
    fn test_spec_from_valid_config() {
        let spec = EndpointSpec::try_from(&valid_config()).unwrap();
        assert_eq!(spec.name, "db");
        assert_eq!(spec.url.as_str(), "http://localhost:8081/health");
        assert_eq!(spec.timeout, Duration::from_secs(5));
        assert_eq!(spec.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_spec_rejects_empty_name() {
        let mut config = valid_config();
        config.name = String::new();
        let result = EndpointSpec::try_from(&config);
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_spec_rejects_empty_url() {
        let mut config = valid_config();
        config.url = String::new();
        assert!(EndpointSpec::try_from(&config).is_err());
    }

    #[test]
    fn test_spec_rejects_unparseable_url() {
        let mut config = valid_config();
        config.url = "not a url".to_string();
        assert!(EndpointSpec::try_from(&config).is_err());
    }

    #[test]
    fn test_spec_rejects_non_http_scheme() {
        let mut config = valid_config();
        config.url = "ftp://example.com/health".to_string();
        let result = EndpointSpec::try_from(&config);
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref message, .. }) if message.contains("scheme")
        ));
    }

    #[test]
    fn test_spec_rejects_zero_timeout() {
        let mut config = valid_config();
        config.timeout_seconds = 0;
        assert!(EndpointSpec::try_from(&config).is_err());
    }

    #[test]
    fn test_spec_rejects_zero_interval() {
        let mut config = valid_config();
        config.interval_seconds = 0;
        assert!(EndpointSpec::try_from(&config).is_err());
    }

    #[test]
    fn test_config_toml_defaults() {
        let config: EndpointConfig = toml::from_str(
            r#"
            name = "api"
            url = "https://api.example.com/healthz"
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.interval_seconds, 30);
    }
}
