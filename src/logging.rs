// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup for the `toastbox` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. `RUST_LOG` takes precedence over the configured filter.

use crate::config::{Config, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG`, then the config, then [`DEFAULT_LOG_FILTER`].
#[must_use]
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs a `fmt` subscriber. Returns `false` if one was already set.
pub fn init(config: &Config) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;

    #[test]
    fn invalid_filter_falls_back_to_default() {
        let config = Config {
            logging: LoggingConfig {
                filter: Some("[not a filter".to_string()),
            },
            ..Config::default()
        };
        // Must not panic whatever RUST_LOG holds.
        let _ = env_filter(&config);
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let config = Config::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
