//! Structured logging setup.
//!
//! Builds a `tracing` subscriber with an [`EnvFilter`] and either a JSON or a
//! human readable fmt layer. Events go to stderr so that command output on
//! stdout stays machine readable.
//!
//! ## Environment Variables
//!
//! - `ROUTEKIT_LOG_LEVEL` - `trace`, `debug`, `info`, `warn` or `error` (default `warn`)
//! - `ROUTEKIT_LOG_FORMAT` - `json` or `pretty` (default `json`)
//! - `ROUTEKIT_LOG_TARGET_FILTER` - extra comma separated directives, e.g. `routekit::router=debug`
//! - `RUST_LOG` - when set, replaces the level entirely
//!
//! ```no_run
//! use routekit::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env()).expect("Failed to initialize logging");
//! ```

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for collectors, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub log_level: String,
    pub format: LogFormat,
    pub target_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            format: LogFormat::Json,
            target_filter: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("ROUTEKIT_LOG_LEVEL").ok(),
            env::var("ROUTEKIT_LOG_FORMAT").ok(),
            env::var("ROUTEKIT_LOG_TARGET_FILTER").ok(),
        )
    }

    fn from_vars(
        level: Option<String>,
        format: Option<String>,
        target_filter: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            log_level: level.unwrap_or(defaults.log_level),
            format: format.as_deref().map_or(defaults.format, LogFormat::parse),
            target_filter: target_filter.filter(|f| !f.trim().is_empty()),
        }
    }

    /// Level used when `RUST_LOG` is absent; unknown names fall back to `WARN`.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',').map(str::trim) {
                if directive.is_empty() {
                    continue;
                }
                match directive.parse() {
                    Ok(d) => filter = filter.add_directive(d),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}
