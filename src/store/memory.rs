use super::PunchStore;
use crate::errors::{AppError, AppResult};
use crate::models::punch::{PunchId, PunchRecord, RawPunch};
use std::sync::Mutex;

/// In-process punch store. Can be switched offline to exercise the
/// optimistic paths.
#[derive(Debug, Default)]
pub struct MemoryPunchStore {
    rows: Mutex<Vec<RawPunch>>,
    offline: Mutex<bool>,
}

impl MemoryPunchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<RawPunch>) -> Self {
        Self {
            rows: Mutex::new(rows),
            offline: Mutex::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap_or_else(|p| p.into_inner()) = offline;
    }

    /// Append a row behind the client's back, as another device would.
    pub fn push_raw(&self, row: RawPunch) {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> AppResult<()> {
        if *self.offline.lock().unwrap_or_else(|p| p.into_inner()) {
            Err(AppError::Store("punch store is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl PunchStore for MemoryPunchStore {
    fn fetch_all(&self) -> AppResult<Vec<RawPunch>> {
        self.check_online()
            .map_err(|e| AppError::Fetch(e.to_string()))?;
        Ok(self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn save(&self, record: &PunchRecord) -> AppResult<bool> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        let raw = RawPunch::from(record);
        rows.retain(|r| r.id != raw.id);
        rows.push(raw);
        Ok(true)
    }

    fn update(&self, record: &PunchRecord) -> AppResult<bool> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        let id = record.id.as_str();

        match rows.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
            Some(row) => {
                row.flagged = Some(if record.is_flagged { 1 } else { 0 });
                row.paired_id = record.paired_id.as_ref().map(|p| p.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &PunchId) -> AppResult<bool> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        let before = rows.len();
        rows.retain(|r| r.id.as_deref() != Some(id.as_str()));
        Ok(rows.len() != before)
    }
}
