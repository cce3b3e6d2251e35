//! Configuration file support for Circulate.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/circulate/config.toml`.
//! The circulation constants are read once at startup and frozen into a
//! [`CirculationPolicy`] for the rest of the process lifetime.

use crate::policy::CirculationPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub circulation: CirculationConfig,
}

/// Circulation constants configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CirculationConfig {
    #[serde(default = "default_fine_per_day")]
    pub fine_per_day: u64,

    #[serde(default = "default_max_fine_limit")]
    pub max_fine_limit: u64,

    #[serde(default = "default_issue_days")]
    pub issue_days: i64,

    #[serde(default = "default_due_soon_window_days")]
    pub due_soon_window_days: i64,
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            fine_per_day: default_fine_per_day(),
            max_fine_limit: default_max_fine_limit(),
            issue_days: default_issue_days(),
            due_soon_window_days: default_due_soon_window_days(),
        }
    }
}

// Default value functions
fn default_fine_per_day() -> u64 {
    5
}

fn default_max_fine_limit() -> u64 {
    500
}

fn default_issue_days() -> i64 {
    14
}

fn default_due_soon_window_days() -> i64 {
    2
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("circulate").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// The frozen policy derived from this configuration
    pub fn policy(&self) -> CirculationPolicy {
        CirculationPolicy {
            fine_per_day: self.circulation.fine_per_day,
            max_fine_limit: self.circulation.max_fine_limit,
            issue_days: self.circulation.issue_days,
            due_soon_window_days: self.circulation.due_soon_window_days,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.circulation.issue_days < 1 {
            return Err(Error::Config("issue_days must be at least 1".into()));
        }
        if self.circulation.due_soon_window_days < 0 {
            return Err(Error::Config(
                "due_soon_window_days must not be negative".into(),
            ));
        }
        Ok(())
    }
}
