//! Changes between two keyed snapshots, for list views that update rows in
//! place instead of reloading.
//!
//! Every key of `new` is exactly one of unchanged / inserted / updated;
//! every key found only in `old` is deleted. Change lists are sorted by key.

use crate::models::periods::{DayPeriod, PayPeriod, WeekPeriod};
use crate::models::punch::{PunchId, PunchRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Items with a stable identity across snapshots.
pub trait Keyed {
    type Key: Ord + Clone;

    fn key(&self) -> Self::Key;
}

impl Keyed for PunchRecord {
    type Key = PunchId;

    fn key(&self) -> PunchId {
        self.id.clone()
    }
}

impl Keyed for DayPeriod {
    type Key = NaiveDate;

    fn key(&self) -> NaiveDate {
        self.day
    }
}

impl Keyed for WeekPeriod {
    type Key = NaiveDate;

    fn key(&self) -> NaiveDate {
        self.week_of
    }
}

impl Keyed for PayPeriod {
    type Key = NaiveDate;

    fn key(&self) -> NaiveDate {
        self.start()
    }
}

/// A key and its row: index in `new` for inserts and updates, index in
/// `old` for deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change<K> {
    pub key: K,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet<K> {
    pub inserted: Vec<Change<K>>,
    pub deleted: Vec<Change<K>>,
    pub updated: Vec<Change<K>>,
    pub unchanged: usize,
}

impl<K> Default for ChangeSet<K> {
    fn default() -> Self {
        Self {
            inserted: Vec::new(),
            deleted: Vec::new(),
            updated: Vec::new(),
            unchanged: 0,
        }
    }
}

impl<K> ChangeSet<K> {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }

    pub fn inserted_keys(&self) -> impl Iterator<Item = &K> {
        self.inserted.iter().map(|c| &c.key)
    }

    pub fn deleted_keys(&self) -> impl Iterator<Item = &K> {
        self.deleted.iter().map(|c| &c.key)
    }

    pub fn updated_keys(&self) -> impl Iterator<Item = &K> {
        self.updated.iter().map(|c| &c.key)
    }
}

/// Index the items by key. A repeated key keeps its first occurrence.
fn index_by_key<T: Keyed>(items: &[T]) -> BTreeMap<T::Key, usize> {
    let mut map = BTreeMap::new();
    for (i, item) in items.iter().enumerate() {
        map.entry(item.key()).or_insert(i);
    }
    map
}

pub fn diff<T: Keyed + PartialEq>(old: &[T], new: &[T]) -> ChangeSet<T::Key> {
    let old_index = index_by_key(old);
    let new_index = index_by_key(new);
    let mut changes = ChangeSet::default();

    for (key, &ni) in &new_index {
        match old_index.get(key) {
            None => changes.inserted.push(Change {
                key: key.clone(),
                index: ni,
            }),
            Some(&oi) if old[oi] != new[ni] => changes.updated.push(Change {
                key: key.clone(),
                index: ni,
            }),
            Some(_) => changes.unchanged += 1,
        }
    }

    for (key, &oi) in &old_index {
        if !new_index.contains_key(key) {
            changes.deleted.push(Change {
                key: key.clone(),
                index: oi,
            });
        }
    }

    changes
}
