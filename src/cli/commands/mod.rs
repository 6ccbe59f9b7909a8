//! Command handlers and the state they share: the local database and a
//! punch model restored from it.

pub mod config;
pub mod del;
pub mod flag;
pub mod init;
pub mod list;
pub mod log;
pub mod punch;
pub mod reset;
pub mod status;
pub mod sync;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::model::{PunchModel, SaveStatus};
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pending::{load_pending, load_snapshot_cache, save_pending, save_snapshot_cache};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::store::{PunchStore, SqlitePunchStore, UnreachableStore};
use crate::ui::messages::warning;
use crate::utils::date::parse_datetime_in;
use chrono::{DateTime, Local};

/// The CLI's clock: the wall clock, or a pinned local time (`--now`).
#[derive(Debug, Clone, Copy)]
pub enum CliClock {
    System,
    Pinned(DateTime<Local>),
}

impl CliClock {
    pub fn from_arg(now: Option<&str>) -> AppResult<Self> {
        match now {
            None => Ok(CliClock::System),
            Some(s) => parse_datetime_in(s, &Local)
                .map(CliClock::Pinned)
                .ok_or_else(|| AppError::InvalidTime(s.to_string())),
        }
    }
}

impl Clock for CliClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        match self {
            CliClock::System => Local::now(),
            CliClock::Pinned(at) => *at,
        }
    }
}

pub type CliModel = PunchModel<Box<dyn PunchStore>, CliClock>;

pub struct Context {
    pub pool: DbPool,
    pub model: CliModel,
}

impl Context {
    /// Open the local database (creating its tables if needed), connect the
    /// punch store and restore the model from the persisted local state.
    pub fn open(cli: &Cli, cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::new(&cfg.database_path().to_string_lossy())?;
        init_db(&pool.conn)?;

        let store: Box<dyn PunchStore> = if cli.offline {
            Box::new(UnreachableStore::new("offline mode"))
        } else {
            Box::new(SqlitePunchStore::open(
                &cfg.remote_store_path().to_string_lossy(),
            )?)
        };

        let clock = CliClock::from_arg(cli.now.as_deref())?;
        let pending = load_pending(&pool.conn)?;
        let cached = load_snapshot_cache(&pool.conn)?;
        let model = PunchModel::restore(store, clock, cfg.aggregate_options()?, pending, cached)?;

        Ok(Self { pool, model })
    }

    /// Write pending changes and the snapshot cache back to disk.
    pub fn persist(&mut self) -> AppResult<()> {
        save_pending(&mut self.pool.conn, self.model.pending())?;
        save_snapshot_cache(&mut self.pool.conn, self.model.last_snapshot())?;
        Ok(())
    }

    /// Internal log write; a failure is reported but never fatal.
    pub fn log(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
}

/// One line describing what the store said about a change.
pub fn describe_status(status: &SaveStatus) -> String {
    match status {
        SaveStatus::Confirmed => "saved to punch store".to_string(),
        SaveStatus::Unconfirmed => "punch store did not confirm, kept locally".to_string(),
        SaveStatus::Failed(reason) => format!("kept locally ({})", reason),
    }
}
