//! Punch store adapters.
//!
//! The store is the remote source of truth: append-only, polled on demand,
//! always answering with a full snapshot. Fetches are never retried here;
//! a failure is handed back to the caller as is.

pub mod memory;
pub mod sqlite;

use crate::errors::{AppError, AppResult};
use crate::models::punch::{PunchId, PunchRecord, RawPunch};

pub use memory::MemoryPunchStore;
pub use sqlite::SqlitePunchStore;

pub trait PunchStore {
    /// Every punch the store knows, unvalidated.
    fn fetch_all(&self) -> AppResult<Vec<RawPunch>>;

    /// Persist a new punch. `Ok(true)` once the store confirmed it.
    fn save(&self, record: &PunchRecord) -> AppResult<bool>;

    /// Persist the mutable fields of a known punch.
    fn update(&self, record: &PunchRecord) -> AppResult<bool>;

    /// Remove a punch. `Ok(false)` when the store did not know it.
    fn delete(&self, id: &PunchId) -> AppResult<bool>;
}

macro_rules! forward_store {
    ($($wrapper:ty),*) => {$(
        impl<S: PunchStore + ?Sized> PunchStore for $wrapper {
            fn fetch_all(&self) -> AppResult<Vec<RawPunch>> {
                (**self).fetch_all()
            }

            fn save(&self, record: &PunchRecord) -> AppResult<bool> {
                (**self).save(record)
            }

            fn update(&self, record: &PunchRecord) -> AppResult<bool> {
                (**self).update(record)
            }

            fn delete(&self, id: &PunchId) -> AppResult<bool> {
                (**self).delete(id)
            }
        }
    )*};
}

forward_store!(Box<S>, std::sync::Arc<S>, &S);

/// Stand-in used when the connectivity layer reports the store as
/// unreachable: every call fails, so local changes stay pending.
#[derive(Debug, Clone, Default)]
pub struct UnreachableStore {
    pub reason: String,
}

impl UnreachableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PunchStore for UnreachableStore {
    fn fetch_all(&self) -> AppResult<Vec<RawPunch>> {
        Err(AppError::Fetch(self.reason.clone()))
    }

    fn save(&self, _record: &PunchRecord) -> AppResult<bool> {
        Err(AppError::Store(self.reason.clone()))
    }

    fn update(&self, _record: &PunchRecord) -> AppResult<bool> {
        Err(AppError::Store(self.reason.clone()))
    }

    fn delete(&self, _id: &PunchId) -> AppResult<bool> {
        Err(AppError::Store(self.reason.clone()))
    }
}
