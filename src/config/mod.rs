//! Configuration module for Vigil
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`VIGIL_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! Per-endpoint problems (bad URL, zero timeout) are deliberately *not*
//! validation failures at this layer: the scheduler skips malformed entries
//! with a diagnostic at registration time, so one broken endpoint never
//! takes the daemon down. A config file that fails to parse as a whole is
//! still fatal.

pub mod endpoint;
pub mod error;
pub mod logging;
pub mod scheduler;

pub use endpoint::{EndpointConfig, EndpointSpec};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use scheduler::SchedulerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Vigil daemon.
///
/// # Example
///
/// ```rust
/// use vigil::config::VigilConfig;
///
/// let config = VigilConfig::default();
/// assert_eq!(config.scheduler.tick_seconds, 15);
///
/// let toml = r#"
/// [scheduler]
/// tick_seconds = 5
/// "#;
/// let config: VigilConfig = toml::from_str(toml).unwrap();
/// assert_eq!(config.scheduler.tick_seconds, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VigilConfig {
    /// Shared-tick scheduler settings
    pub scheduler: SchedulerConfig,
    /// Monitored endpoint definitions
    pub endpoints: Vec<EndpointConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl VigilConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports VIGIL_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(tick) = std::env::var("VIGIL_TICK_SECONDS") {
            if let Ok(t) = tick.parse() {
                self.scheduler.tick_seconds = t;
            }
        }

        if let Ok(level) = std::env::var("VIGIL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("VIGIL_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "scheduler.tick_seconds".to_string(),
                message: "tick period must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
