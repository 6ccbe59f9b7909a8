use crate::core::calculator::periods::AggregateOptions;
use crate::errors::{AppError, AppResult};
use crate::utils::date::parse_weekday;
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_duration;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

pub const CONFIG_FILE_NAME: &str = "webpunch.conf";
pub const DATABASE_FILE_NAME: &str = "webpunch.sqlite";
pub const STORE_FILE_NAME: &str = "punch_store.sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Local state: pending changes, snapshot cache, internal log.
    #[serde(default = "default_database")]
    pub database: String,
    /// SQLite file standing in for the remote punch store.
    #[serde(default = "default_remote_store")]
    pub remote_store: String,
    /// `status` warns once an open session has run this long.
    #[serde(default = "default_hours_alert")]
    pub hours_alert: String,
    #[serde(default = "default_week_start")]
    pub week_start: String,
}

fn default_database() -> String {
    Config::config_dir()
        .join(DATABASE_FILE_NAME)
        .to_string_lossy()
        .to_string()
}
fn default_remote_store() -> String {
    Config::config_dir()
        .join(STORE_FILE_NAME)
        .to_string_lossy()
        .to_string()
}
pub(crate) fn default_hours_alert() -> String {
    "8h".to_string()
}
pub(crate) fn default_week_start() -> String {
    "Sun".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            remote_store: default_remote_store(),
            hours_alert: default_hours_alert(),
            week_start: default_week_start(),
        }
    }
}

impl Config {
    /// `~/.webpunch`, or `./.webpunch` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".webpunch")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    pub fn save(&self) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Create the config directory and, unless `is_test`, the config file.
    /// Relative database paths are placed in the config directory.
    pub fn init_all(
        custom_db: Option<String>,
        custom_store: Option<String>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let resolve = |name: Option<String>, default: &str| -> String {
            let p = match name {
                Some(n) => expand_tilde(&n),
                None => PathBuf::from(default),
            };
            if p.is_absolute() {
                p.to_string_lossy().to_string()
            } else {
                dir.join(p).to_string_lossy().to_string()
            }
        };

        let cfg = Config {
            database: resolve(custom_db, DATABASE_FILE_NAME),
            remote_store: resolve(custom_store, STORE_FILE_NAME),
            ..Config::default()
        };

        if !is_test {
            cfg.save()?;
        }

        Ok(cfg)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn remote_store_path(&self) -> PathBuf {
        expand_tilde(&self.remote_store)
    }

    pub fn hours_alert(&self) -> AppResult<Duration> {
        parse_duration(&self.hours_alert)
            .map_err(|_| AppError::Config(format!("invalid hours_alert '{}'", self.hours_alert)))
    }

    pub fn aggregate_options(&self) -> AppResult<AggregateOptions> {
        let week_start = parse_weekday(&self.week_start)
            .ok_or_else(|| AppError::Config(format!("invalid week_start '{}'", self.week_start)))?;
        Ok(AggregateOptions { week_start })
    }
}
