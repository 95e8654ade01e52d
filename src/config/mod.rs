// SPDX-License-Identifier: MPL-2.0
//! Loading and saving toast settings from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[toasts]` - Visible cap and default auto-dismiss window
//! - `[logging]` - Tracing filter for the demo binary
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `TOASTBOX_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use toastbox::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.toasts.max_visible = Some(3);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::notifications::{AutoDismiss, MaxVisible, RegistrySettings};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Toast queue settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastsConfig {
    /// How many toasts may be active at once.
    #[serde(
        default = "default_max_visible",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_visible: Option<usize>,

    /// Auto-dismiss window in milliseconds for toasts shown without one.
    /// Zero or negative disables the default auto-dismiss.
    #[serde(
        default = "default_duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_duration_ms: Option<i64>,
}

impl Default for ToastsConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            default_duration_ms: default_duration_ms(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"toastbox=debug"`.
    #[serde(default = "default_log_filter", skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub toasts: ToastsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Registry settings described by this configuration.
    ///
    /// Out-of-range caps are clamped rather than rejected.
    #[must_use]
    pub fn registry_settings(&self) -> RegistrySettings {
        let max_visible = self
            .toasts
            .max_visible
            .map_or_else(MaxVisible::default, MaxVisible::new);
        let default_duration = AutoDismiss::from_millis(
            self.toasts
                .default_duration_ms
                .unwrap_or(DEFAULT_DURATION_MS),
        );
        RegistrySettings {
            max_visible,
            default_duration,
        }
    }

    /// Log filter directive, falling back to [`DEFAULT_LOG_FILTER`].
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_max_visible() -> Option<usize> {
    Some(DEFAULT_MAX_VISIBLE)
}

fn default_duration_ms() -> Option<i64> {
    Some(DEFAULT_DURATION_MS)
}

fn default_log_filter() -> Option<String> {
    Some(DEFAULT_LOG_FILTER.to_string())
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If the file exists but
/// cannot be read, returns the default config with a warning explaining why.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!("{}: {err}", path.display())),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
