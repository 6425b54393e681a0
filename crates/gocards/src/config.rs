//! Configuration management for gocards.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::card::Difficulty;
use crate::error::{Error, Result};
use crate::session::Filter;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "gocards";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "progress.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GOCARDS_`)
/// 2. TOML config file at `~/.config/gocards/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deck configuration.
    pub deck: DeckConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Study session configuration.
    pub study: StudyConfig,
}

/// Deck-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Path to a deck JSON file.
    /// Defaults to the deck compiled into the binary.
    pub path: Option<PathBuf>,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the progress database file.
    /// Defaults to `~/.local/share/gocards/progress.db`
    pub database_path: Option<PathBuf>,
}

/// Defaults applied when a study session starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Difficulty filter active at startup.
    pub initial_filter: FilterSetting,
    /// Shuffle the selection before showing the first card.
    pub shuffle_on_start: bool,
    /// Start with already-studied cards hidden.
    pub study_mode_on_start: bool,
}

/// A difficulty filter as written in config files and CLI flags.
///
/// Flat so it reads naturally in TOML (`initial_filter = "intermediate"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSetting {
    /// Show every card.
    #[default]
    All,
    /// Only basic cards.
    Basic,
    /// Only intermediate cards.
    Intermediate,
    /// Only advanced cards.
    Advanced,
}

impl From<FilterSetting> for Filter {
    fn from(setting: FilterSetting) -> Self {
        match setting {
            FilterSetting::All => Filter::All,
            FilterSetting::Basic => Filter::Difficulty(Difficulty::Basic),
            FilterSetting::Intermediate => Filter::Difficulty(Difficulty::Intermediate),
            FilterSetting::Advanced => Filter::Difficulty(Difficulty::Advanced),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `GOCARDS_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("GOCARDS_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.deck.path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "deck.path must not be empty".to_string(),
                });
            }
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.database_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the deck path, or `None` for the built-in deck.
    #[must_use]
    pub fn deck_path(&self) -> Option<PathBuf> {
        self.deck.path.clone()
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the startup filter as a session filter.
    #[must_use]
    pub fn initial_filter(&self) -> Filter {
        self.study.initial_filter.into()
    }
}
