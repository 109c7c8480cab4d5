//! Configuration management for BioScout
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/<env>, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Bibliographic lookup service configuration
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Pipeline defaults
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// E-utilities base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact email passed to the service (requested by NCBI usage policy)
    pub email: Option<String>,

    /// API key raising the request-rate allowance
    pub api_key: Option<String>,

    /// Maximum ids returned by one author search
    #[serde(default = "default_retmax")]
    pub retmax: usize,

    /// Ids per bulk record fetch
    #[serde(default = "default_fetch_batch_size")]
    pub fetch_batch_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Total time budget for retrying one call, in seconds
    #[serde(default = "default_retry_budget")]
    pub retry_budget_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Fraction of the ranked candidates forming the similarity cohort
    #[serde(default = "default_fraction")]
    pub similarity_fraction: f64,

    /// Reading-list length when the user does not supply one
    #[serde(default = "default_reading_list_size")]
    pub reading_list_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Append-mode status log file; empty disables the file sink
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

// Default value functions
fn default_base_url() -> String {
    crate::DEFAULT_EUTILS_BASE.to_string()
}
fn default_retmax() -> usize {
    crate::DEFAULT_SEARCH_RETMAX
}
fn default_fetch_batch_size() -> usize {
    100
}
fn default_timeout() -> u64 {
    30
}
fn default_retry_budget() -> u64 {
    60
}
fn default_fraction() -> f64 {
    0.2
}
fn default_reading_list_size() -> usize {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> String {
    "bioscout.log".to_string()
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__LOOKUP__API_KEY=...
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Per-request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup.timeout_secs)
    }

    /// Retry budget as Duration
    pub fn retry_budget(&self) -> Duration {
        Duration::from_secs(self.lookup.retry_budget_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            email: None,
            api_key: None,
            retmax: default_retmax(),
            fetch_batch_size: default_fetch_batch_size(),
            timeout_secs: default_timeout(),
            retry_budget_secs: default_retry_budget(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similarity_fraction: default_fraction(),
            reading_list_size: default_reading_list_size(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            log_file: default_log_file(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lookup: LookupConfig::default(),
            pipeline: PipelineConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.lookup.retmax, 200);
        assert_eq!(config.pipeline.similarity_fraction, 0.2);
        assert!(config.lookup.base_url.contains("eutils"));
    }

    #[test]
    fn test_timeouts_as_durations() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_budget(), Duration::from_secs(60));
    }
}
