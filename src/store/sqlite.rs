//! Punch store kept in its own SQLite file, standing in for the punch-clock
//! backend.

use super::PunchStore;
use crate::db::migrate::{PunchTable, ensure_store_schema};
use crate::db::pool::DbPool;
use crate::db::queries::{delete_punch, load_raw_punches, update_punch, upsert_punch};
use crate::errors::{AppError, AppResult};
use crate::models::punch::{PunchId, PunchRecord, RawPunch};

pub struct SqlitePunchStore {
    pool: DbPool,
}

impl SqlitePunchStore {
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        ensure_store_schema(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        ensure_store_schema(&pool.conn)?;
        Ok(Self { pool })
    }
}

impl PunchStore for SqlitePunchStore {
    fn fetch_all(&self) -> AppResult<Vec<RawPunch>> {
        load_raw_punches(&self.pool.conn, PunchTable::Punches)
            .map_err(|e| AppError::Fetch(e.to_string()))
    }

    fn save(&self, record: &PunchRecord) -> AppResult<bool> {
        Ok(upsert_punch(&self.pool.conn, PunchTable::Punches, record)? > 0)
    }

    fn update(&self, record: &PunchRecord) -> AppResult<bool> {
        Ok(update_punch(&self.pool.conn, PunchTable::Punches, record)? > 0)
    }

    fn delete(&self, id: &PunchId) -> AppResult<bool> {
        Ok(delete_punch(&self.pool.conn, PunchTable::Punches, id)? > 0)
    }
}
