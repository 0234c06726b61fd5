//! Global maintainOS calendar configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ITEMS_PATH, ENV_PREFIX};
use crate::date_range::WeekStart;
use crate::error::{CoreError, CoreResult};

fn default_items_path() -> PathBuf {
    PathBuf::from(DEFAULT_ITEMS_PATH)
}

fn is_default_items_path(p: &PathBuf) -> bool {
    *p == default_items_path()
}

fn is_default_week_start(w: &WeekStart) -> bool {
    *w == WeekStart::default()
}

/// Configuration at ~/.config/maintainos/config.toml
///
/// Any key can be overridden from the environment with a `MAINTAINOS_` prefix,
/// e.g. `MAINTAINOS_WEEK_START=sunday`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MaintainConfig {
    /// Work order export the calendar reads.
    #[serde(default = "default_items_path", skip_serializing_if = "is_default_items_path")]
    pub items_path: PathBuf,

    #[serde(default, skip_serializing_if = "is_default_week_start")]
    pub week_start: WeekStart,
}

impl Default for MaintainConfig {
    fn default() -> Self {
        MaintainConfig {
            items_path: default_items_path(),
            week_start: WeekStart::default(),
        }
    }
}

impl MaintainConfig {
    pub fn config_path() -> CoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CoreError::Config("Could not determine config directory".into()))?
            .join("maintainos");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented default on first run) plus
    /// environment overrides.
    pub fn load() -> CoreResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let config: MaintainConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Parse config from TOML text, without file or environment lookups.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CoreError::Config(e.to_string()))
    }

    /// `items_path` with `~` expanded.
    pub fn items_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.items_path.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Save the current config to ~/.config/maintainos/config.toml
    pub fn save(&self) -> CoreResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| CoreError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CoreResult<()> {
        let contents = format!(
            "\
# maintainOS calendar configuration

# Work order export to read (JSON array, or {{ \"data\": [...] }}):
# items_path = \"{}\"

# First day of the week in month and week views (\"monday\" or \"sunday\"):
# week_start = \"monday\"
",
            DEFAULT_ITEMS_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CoreError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
