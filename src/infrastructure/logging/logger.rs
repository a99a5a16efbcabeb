use anyhow::{Context, Result};
use std::io;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LoggingConfig;

/// Logger implementation using tracing
///
/// Output goes to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` directives take precedence over the configured level.
pub struct LoggerImpl;

impl LoggerImpl {
    /// Install the global subscriber described by `config`
    ///
    /// # Errors
    /// Returns an error for an unknown level or format, or if a global
    /// subscriber is already installed.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let default_level = parse_log_level(&config.level)?;

        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();

        match config.format.as_str() {
            "json" => {
                let stderr_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_filter(env_filter);

                tracing_subscriber::registry()
                    .with(stderr_layer)
                    .try_init()
                    .context("Failed to install log subscriber")?;
            }
            "pretty" => {
                let stderr_layer = tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_filter(env_filter);

                tracing_subscriber::registry()
                    .with(stderr_layer)
                    .try_init()
                    .context("Failed to install log subscriber")?;
            }
            other => anyhow::bail!("Invalid log format: {other}"),
        }

        tracing::debug!(level = %config.level, format = %config.format, "logger initialized");

        Ok(Self)
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
