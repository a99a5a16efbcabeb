use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project configuration file
pub const CONFIG_FILE: &str = "rickmorty.yaml";

/// Optional uncommitted overrides of [`CONFIG_FILE`]
pub const LOCAL_CONFIG_FILE: &str = "rickmorty.local.yaml";

/// Prefix of environment overrides; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "RICKMORTY_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Upstream base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid cache ttl_secs: {0}. Must be at least 1")]
    InvalidTtl(u64),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `rickmorty.yaml` in the working directory
    /// 3. `rickmorty.local.yaml` in the working directory
    /// 4. Environment variables (`RICKMORTY_*`, e.g. `RICKMORTY_CACHE__TTL_SECS`)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file in place of the project
    /// files. Environment overrides still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        let upstream = &config.upstream;
        if upstream.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if upstream.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(upstream.timeout_secs));
        }

        if !(upstream.requests_per_second.is_finite() && upstream.requests_per_second > 0.0) {
            return Err(ConfigError::InvalidRateLimit(upstream.requests_per_second));
        }

        if upstream.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(upstream.max_retries));
        }

        if upstream.initial_backoff_ms >= upstream.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                upstream.initial_backoff_ms,
                upstream.max_backoff_ms,
            ));
        }

        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl(config.cache.ttl_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
