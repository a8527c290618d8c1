//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is layered with the `config` crate (later sources override
//! earlier):
//! 1. Default values
//! 2. TOML file at `REMIT_CONFIG_FILE` (default `config.toml`), if present
//! 3. Environment variables prefixed with `REMIT_`, `__` between sections
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `REMIT_REST__HOST` | REST server host | `0.0.0.0` |
//! | `REMIT_REST__PORT` | REST server port | `8080` |
//! | `REMIT_LOG__LEVEL` | Log level | `info` |
//! | `REMIT_LOG__FORMAT` | Log format (json/pretty) | `json` |
//! | `REMIT_SOURCES__PER_SOURCE_TIMEOUT_MS` | Per-source timeout | `5000` |
//! | `REMIT_SOURCES__RATE_SERVICE` | Mid-market rate endpoint | unset |
//! | `REMIT_BASELINE__REFERENCE_PROVIDER` | Reference provider key | `wise` |
//! | `REMIT_RATINGS__STATIC_MAP_PATH` | Static rating map TOML file | unset |
//!
//! # Examples
//!
//! ```
//! use remit_compare::config::AppConfig;
//!
//! let config = AppConfig::from_toml_str(r#"
//!     [rest]
//!     port = 9000
//!
//!     [[sources.aggregators]]
//!     id = "main"
//!     endpoint = "http://localhost:4000/quotes"
//! "#).unwrap();
//! assert_eq!(config.rest.port, 9000);
//! assert!(config.validate().is_ok());
//! ```

use crate::domain::services::SyntheticProviderPolicy;
use config::{Config, Environment, File, FileFormat};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_FILE_ENV: &str = "REMIT_CONFIG_FILE";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "REMIT";

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered sources could not be read or deserialized.
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// REST/HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_rest_port")]
    pub port: u16,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_rest_port(),
        }
    }
}

impl RestConfig {
    /// Returns the socket address for the REST server.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::invalid("rest.host:port", format!("{e}")))
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Source Configuration
// ============================================================================

/// A multi-provider aggregator endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorEndpoint {
    /// Source identifier used in logs and failure reports.
    pub id: String,
    /// Endpoint URL.
    pub endpoint: String,
}

/// A single provider's own live pricing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedicatedEndpoint {
    /// Provider code; becomes the provider key.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Endpoint URL.
    pub endpoint: String,
    /// Logo reference passed through to the view.
    #[serde(default)]
    pub logo_ref: Option<String>,
}

/// Quote source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Generic aggregator endpoints.
    #[serde(default)]
    pub aggregators: Vec<AggregatorEndpoint>,

    /// Dedicated provider endpoints.
    #[serde(default)]
    pub dedicated: Vec<DedicatedEndpoint>,

    /// Mid-market rate service endpoint.
    #[serde(default)]
    pub rate_service: Option<String>,

    /// Timeout applied to each source individually, in milliseconds.
    #[serde(default = "default_per_source_timeout")]
    pub per_source_timeout_ms: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            aggregators: Vec::new(),
            dedicated: Vec::new(),
            rate_service: None,
            per_source_timeout_ms: default_per_source_timeout(),
        }
    }
}

impl SourcesConfig {
    /// Returns the number of configured quote sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.aggregators.len() + self.dedicated.len()
    }
}

// ============================================================================
// Baseline Configuration
// ============================================================================

/// Baseline resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Provider whose own quote is the preferred baseline.
    #[serde(default = "default_reference_provider")]
    pub reference_provider: Option<String>,

    /// Timeout for the mid-market rate service, in milliseconds.
    #[serde(default = "default_rate_service_timeout")]
    pub rate_service_timeout_ms: u64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            reference_provider: default_reference_provider(),
            rate_service_timeout_ms: default_rate_service_timeout(),
        }
    }
}

// ============================================================================
// Rating Configuration
// ============================================================================

/// Rating cascade configuration.
///
/// `overrides` and `provider_defaults` are merged on top of the built-in
/// tables; an entry here replaces the built-in value for the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsConfig {
    /// Static rating map file; the built-in map is used when unset.
    #[serde(default)]
    pub static_map_path: Option<PathBuf>,

    /// Hardcoded overrides.
    #[serde(default)]
    pub overrides: BTreeMap<String, Decimal>,

    /// Per-provider defaults.
    #[serde(default)]
    pub provider_defaults: BTreeMap<String, Decimal>,

    /// Rating used when nothing else matches.
    #[serde(default = "default_neutral_rating")]
    pub neutral_default: Decimal,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            static_map_path: None,
            overrides: BTreeMap::new(),
            provider_defaults: BTreeMap::new(),
            neutral_default: default_neutral_rating(),
        }
    }
}

// ============================================================================
// Synthetic Configuration
// ============================================================================

/// Synthetic quote configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Whether synthetic quotes are generated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Roster replacing the built-in one.
    #[serde(default)]
    pub roster: Option<Vec<SyntheticProviderPolicy>>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            roster: None,
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// REST server configuration.
    #[serde(default)]
    pub rest: RestConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Quote sources.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Baseline resolution.
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// Rating cascade.
    #[serde(default)]
    pub ratings: RatingsConfig,

    /// Synthetic quotes.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

impl AppConfig {
    /// Loads configuration from the optional config file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| "config.toml".to_string());

        let config = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parses configuration from TOML text, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rest.socket_addr()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            ));
        }

        if self.sources.per_source_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "sources.per_source_timeout_ms",
                "must be greater than 0",
            ));
        }
        for aggregator in &self.sources.aggregators {
            check_url(&format!("sources.aggregators.{}", aggregator.id), &aggregator.endpoint)?;
        }
        for dedicated in &self.sources.dedicated {
            check_url(&format!("sources.dedicated.{}", dedicated.code), &dedicated.endpoint)?;
        }
        if let Some(endpoint) = &self.sources.rate_service {
            check_url("sources.rate_service", endpoint)?;
        }

        check_rating("ratings.neutral_default", self.ratings.neutral_default)?;
        for (key, value) in &self.ratings.overrides {
            check_rating(&format!("ratings.overrides.{key}"), *value)?;
        }
        for (key, value) in &self.ratings.provider_defaults {
            check_rating(&format!("ratings.provider_defaults.{key}"), *value)?;
        }

        if let Some(roster) = &self.synthetic.roster {
            for policy in roster {
                policy.validate().map_err(|e| {
                    ConfigError::invalid(format!("synthetic.roster.{}", policy.code), e.to_string())
                })?;
            }
        }

        Ok(())
    }
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("'{url}' is not an http(s) URL")))
    }
}

fn check_rating(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if (Decimal::ZERO..=dec!(5)).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("rating {value} outside [0, 5]")))
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rest_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_per_source_timeout() -> u64 {
    5000
}

fn default_rate_service_timeout() -> u64 {
    3000
}

fn default_reference_provider() -> Option<String> {
    Some("wise".to_string())
}

fn default_neutral_rating() -> Decimal {
    dec!(4.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.rest.port, 8080);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.sources.per_source_timeout_ms, 5000);
        assert_eq!(config.baseline.reference_provider.as_deref(), Some("wise"));
        assert_eq!(config.ratings.neutral_default, dec!(4.0));
        assert!(config.synthetic.enabled);
    }

    #[test]
    fn rest_config_socket_addr() {
        let addr = RestConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn app_config_validate_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn app_config_validate_invalid_log_level() {
        let mut config = AppConfig::default();
        config.log.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rest_config_invalid_address() {
        let config = RestConfig {
            host: "invalid host with spaces".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn toml_sections_are_read() {
        let config = AppConfig::from_toml_str(
            r#"
            [log]
            format = "pretty"

            [sources]
            per_source_timeout_ms = 1500
            rate_service = "https://rates.example.com/mid"

            [[sources.aggregators]]
            id = "compare"
            endpoint = "https://agg.example.com/quotes"

            [[sources.dedicated]]
            code = "wise"
            name = "Wise"
            endpoint = "https://wise.example.com/quote"

            [baseline]
            reference_provider = "wise"

            [ratings.overrides]
            paypal = 3.2
            "#,
        )
        .unwrap();

        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.sources.per_source_timeout_ms, 1500);
        assert_eq!(config.sources.source_count(), 2);
        assert_eq!(config.sources.dedicated[0].code, "wise");
        assert_eq!(config.ratings.overrides["paypal"], dec!(3.2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_override_is_rejected() {
        let mut config = AppConfig::default();
        config.ratings.overrides.insert("wise".to_string(), dec!(5.5));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ratings.overrides.wise"));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let mut config = AppConfig::default();
        config.sources.rate_service = Some("ftp://rates".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.sources.per_source_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
