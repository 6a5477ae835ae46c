//! # Runtime Configuration Module
//!
//! Environment variable based configuration for the router's runtime behaviour.
//!
//! ## Environment Variables
//!
//! ### `ROUTEKIT_SLOW_MATCH_US`
//!
//! Matches taking longer than this many microseconds are logged at `WARN`.
//! Accepts decimal (`1000`) or hexadecimal (`0x3e8`). Default: `1000` (1 ms).
//!
//! ### `ROUTEKIT_LOG_MATCHES`
//!
//! When `true`/`1`/`yes`, every successful match is logged at `INFO`; otherwise
//! at `DEBUG`. Default: `false`.
//!
//! ## Usage
//!
//! ```rust
//! use routekit::runtime_config::RouterConfig;
//! use routekit::router::RouteTable;
//!
//! let table = RouteTable::with_config(RouterConfig::from_env());
//! assert!(table.is_empty());
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Router configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Matches slower than this are reported at WARN
    pub slow_match_threshold: Duration,
    /// Log successful matches at INFO instead of DEBUG
    pub log_matches: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
            log_matches: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("ROUTEKIT_SLOW_MATCH_US").ok().as_deref(),
            env::var("ROUTEKIT_LOG_MATCHES").ok().as_deref(),
        )
    }

    fn from_vars(slow_match: Option<&str>, log_matches: Option<&str>) -> Self {
        let slow_us = slow_match
            .and_then(parse_number)
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        let log_matches = log_matches.is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        });
        Self {
            slow_match_threshold: Duration::from_micros(slow_us),
            log_matches,
        }
    }
}

fn parse_number(val: &str) -> Option<u64> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(RouterConfig::from_vars(None, None), RouterConfig::default());
    }

    #[test]
    fn parses_decimal_and_hex() {
        let cfg = RouterConfig::from_vars(Some("250"), None);
        assert_eq!(cfg.slow_match_threshold, Duration::from_micros(250));
        let cfg = RouterConfig::from_vars(Some("0x10"), None);
        assert_eq!(cfg.slow_match_threshold, Duration::from_micros(16));
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let cfg = RouterConfig::from_vars(Some("soon"), Some("maybe"));
        assert_eq!(cfg, RouterConfig::default());
    }

    #[test]
    fn log_matches_flag() {
        assert!(RouterConfig::from_vars(None, Some("TRUE")).log_matches);
        assert!(RouterConfig::from_vars(None, Some("1")).log_matches);
        assert!(!RouterConfig::from_vars(None, Some("0")).log_matches);
    }
}
