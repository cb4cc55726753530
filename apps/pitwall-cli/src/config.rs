//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PITWALL_DB_PATH=/data/pitwall.db                                   │
//! │     PITWALL_MIN_CHAMPIONSHIP_YEAR=1950                                 │
//! │     PITWALL_MAX_CHAMPIONSHIP_YEAR=2100                                 │
//! │     PITWALL_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the platform default)               │
//! │     ~/.config/pitwall/pitwall.toml (Linux)                             │
//! │     ~/Library/Application Support/dev.pitwall.pitwall/pitwall.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./pitwall.db"
//! max_connections = 5
//!
//! [championship]
//! min_year = 1990
//! max_year = 2100
//!
//! [log]
//! filter = "info,pitwall_service=debug,pitwall_db=debug,sqlx=warn"
//! ```

use std::path::PathBuf;

use pitwall_core::{ChampionshipYears, MAX_CHAMPIONSHIP_YEAR, MIN_CHAMPIONSHIP_YEAR};
use pitwall_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, created on first use.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./pitwall.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Inclusive range of championship years accepted on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionshipSettings {
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_min_year() -> i32 {
    MIN_CHAMPIONSHIP_YEAR
}

fn default_max_year() -> i32 {
    MAX_CHAMPIONSHIP_YEAR
}

impl Default for ChampionshipSettings {
    fn default() -> Self {
        ChampionshipSettings {
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` still wins.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,pitwall_service=debug,pitwall_db=debug,sqlx=warn".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitwallConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub championship: ChampionshipSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl PitwallConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`path`, or the platform default when it exists)
    /// 3. Environment variables
    ///
    /// An explicit `path` that does not exist is an error; a missing default
    /// file is not.
    pub fn load(path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_toml(&std::fs::read_to_string(path)?)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.championship.min_year > self.championship.max_year {
            return Err(ConfigError::Invalid(format!(
                "championship min_year ({}) is greater than max_year ({})",
                self.championship.min_year, self.championship.max_year
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `PITWALL_*` overrides read through `var`.
    ///
    /// Runs before logging is set up, so a malformed value is an error
    /// rather than a warning nobody would see.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(path) = var("PITWALL_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(raw) = var("PITWALL_MIN_CHAMPIONSHIP_YEAR") {
            self.championship.min_year = parse_year_override("PITWALL_MIN_CHAMPIONSHIP_YEAR", &raw)?;
        }

        if let Some(raw) = var("PITWALL_MAX_CHAMPIONSHIP_YEAR") {
            self.championship.max_year = parse_year_override("PITWALL_MAX_CHAMPIONSHIP_YEAR", &raw)?;
        }

        if let Some(filter) = var("PITWALL_LOG") {
            self.log.filter = filter;
        }

        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "pitwall", "pitwall")
            .map(|dirs| dirs.config_dir().join("pitwall.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn championship_years(&self) -> ChampionshipYears {
        ChampionshipYears::new(self.championship.min_year, self.championship.max_year)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }
}

fn parse_year_override(name: &str, raw: &str) -> ConfigResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{name} is not a year: '{raw}'")))
}
