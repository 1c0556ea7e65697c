//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default period between sweeps, in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 500;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Period between background sweeps of auto-expiring entries
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 500).
    ///   Zero or unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let sweep_interval_ms = env::var("SWEEP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_MS);

        Self {
            sweep_interval: Duration::from_millis(sweep_interval_ms),
        }
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sweep_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_config_builder() {
        let config = Config::default().with_sweep_interval(Duration::from_secs(2));
        assert_eq!(config.sweep_interval, Duration::from_secs(2));
    }

    // Both env cases live in one test so they cannot race each other.
    #[test]
    fn test_config_from_env() {
        env::remove_var("SWEEP_INTERVAL_MS");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("SWEEP_INTERVAL_MS", "250");
        assert_eq!(Config::from_env().sweep_interval, Duration::from_millis(250));

        env::set_var("SWEEP_INTERVAL_MS", "0");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("SWEEP_INTERVAL_MS", "soon");
        assert_eq!(Config::from_env(), Config::default());

        env::remove_var("SWEEP_INTERVAL_MS");
    }
}
