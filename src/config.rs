//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pdfops/pdfops.toml`
//! 3. Environment variables: `PDFOPS_*` prefix
//! 4. Command-line flags (applied by the driver, not here)

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::sink::OutputFormat;

pub const ENV_PREFIX: &str = "PDFOPS";

/// Configuration could not be read or understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SettingsError {
    pub message: String,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub output_format: Option<OutputFormat>,
    pub verbose: Option<u8>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Output format when `--format` is not given
    pub output_format: OutputFormat,
    /// Baseline log verbosity; `-v` flags add to it
    pub verbose: u8,
}

/// Get the XDG config directory for pdfops.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pdfops").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pdfops.toml"))
}

/// Load a TOML file into RawSettings.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError {
        message: format!("parse {}: {}", path.display(), e.message()),
    })
}

impl Settings {
    /// Load from the global config file and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_layers(global_config_path().as_deref(), None)
    }

    /// Load from an explicit global file and environment.
    ///
    /// `env` replaces the process environment when given (for testing).
    /// A missing global file is skipped.
    pub fn from_layers(
        global: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(path) = global {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.apply(&raw);
            }
        }

        Self::apply_env_overrides(current, env)
    }

    /// Overlay wins where it specifies a value.
    fn apply(&self, overlay: &RawSettings) -> Self {
        Self {
            output_format: overlay.output_format.unwrap_or(self.output_format),
            verbose: overlay.verbose.unwrap_or(self.verbose),
        }
    }

    /// Apply PDFOPS_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional_string(&config, "output_format")? {
            settings.output_format =
                OutputFormat::from_str(&val, true).map_err(|_| SettingsError {
                    message: format!("{}_OUTPUT_FORMAT: unknown format '{}'", ENV_PREFIX, val),
                })?;
        }
        if let Some(val) = optional_string(&config, "verbose")? {
            settings.verbose = val.parse().map_err(|_| SettingsError {
                message: format!("{}_VERBOSE: not a small count '{}'", ENV_PREFIX, val),
            })?;
        }

        Ok(settings)
    }
}

fn optional_string(config: &Config, key: &str) -> Result<Option<String>, SettingsError> {
    match config.get_string(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nothing_specified_when_applying_then_keeps_base() {
        let base = Settings {
            output_format: OutputFormat::Json,
            verbose: 2,
        };

        let merged = base.apply(&RawSettings::default());

        assert_eq!(merged, base);
    }

    #[test]
    fn given_overlay_values_when_applying_then_overlay_wins() {
        let overlay = RawSettings {
            output_format: Some(OutputFormat::Json),
            verbose: None,
        };

        let merged = Settings::default().apply(&overlay);

        assert_eq!(merged.output_format, OutputFormat::Json);
        assert_eq!(merged.verbose, 0);
    }

    #[test]
    fn given_xdg_layout_when_resolving_global_path_then_ends_with_pdfops_toml() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("pdfops/pdfops.toml"));
        }
    }
}
