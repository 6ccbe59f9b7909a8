//! Merge a remote snapshot with the punches this device inserted or deleted
//! but the remote store has not confirmed yet.
//!
//! Steps, in order:
//! 1. ids known remotely = ids in the snapshot
//! 2. pending inserts the snapshot already reports are dropped (the remote
//!    copy is authoritative)
//! 3. surviving pending inserts join the known ids
//! 4. pending deletes for ids nobody knows any more are dropped
//! 5. snapshot + pending inserts, minus pending deletes
//! 6. newest first, ties by id
//!
//! The surviving pending sets stay in [`PendingChanges`] for the next pass.

use crate::models::punch::{PunchId, PunchRecord, RawPunch};
use crate::ui::messages::warning;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Deref;

/// Local changes not yet confirmed by the remote store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChanges {
    pub inserted: Vec<PunchRecord>,
    pub deleted: BTreeSet<PunchId>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty()
    }

    /// Queue a local record, replacing an older local copy with the same id.
    pub fn insert(&mut self, record: PunchRecord) {
        self.inserted.retain(|r| r.id != record.id);
        self.inserted.push(record);
    }

    pub fn mark_deleted(&mut self, id: PunchId) {
        self.deleted.insert(id);
    }

    /// Drop local inserts that were deleted before any snapshot reported
    /// them, together with their pending deletes. Only meaningful right
    /// after reconciling against a fresh snapshot.
    pub fn settle_discarded(&mut self) {
        let gone: BTreeSet<PunchId> = self
            .inserted
            .iter()
            .filter(|p| self.deleted.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();

        self.inserted.retain(|p| !gone.contains(&p.id));
        self.deleted.retain(|id| !gone.contains(id));
    }

    pub fn clear(&mut self) {
        self.inserted.clear();
        self.deleted.clear();
    }
}

/// The authoritative current view: unique ids, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciledPunchSet {
    punches: Vec<PunchRecord>,
}

impl ReconciledPunchSet {
    pub fn punches(&self) -> &[PunchRecord] {
        &self.punches
    }

    pub fn get(&self, id: &PunchId) -> Option<&PunchRecord> {
        self.punches.iter().find(|p| &p.id == id)
    }
}

impl Deref for ReconciledPunchSet {
    type Target = [PunchRecord];

    fn deref(&self) -> &Self::Target {
        &self.punches
    }
}

/// Validate raw rows coming from the store. Rows that fail validation are
/// skipped and counted.
pub fn parse_snapshot(rows: Vec<RawPunch>) -> (Vec<PunchRecord>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = 0;

    for row in rows {
        match PunchRecord::try_from(row) {
            Ok(r) => records.push(r),
            Err(e) => {
                warning(format!("Skipping punch from store: {}", e));
                rejected += 1;
            }
        }
    }

    (records, rejected)
}

pub fn reconcile(snapshot: Vec<PunchRecord>, pending: &mut PendingChanges) -> ReconciledPunchSet {
    let remote = dedupe_by_id(snapshot);
    let mut known_ids: HashSet<PunchId> = remote.iter().map(|p| p.id.clone()).collect();

    pending.inserted.retain(|p| !known_ids.contains(&p.id));

    known_ids.extend(pending.inserted.iter().map(|p| p.id.clone()));

    pending.deleted.retain(|id| known_ids.contains(id));

    let mut punches = remote;
    punches.extend(pending.inserted.iter().cloned());
    punches.retain(|p| !pending.deleted.contains(&p.id));

    ReconciledPunchSet {
        punches: sort_punches(dedupe_by_id(punches)),
    }
}

/// One record per id. Among duplicates the greatest by content wins, so the
/// choice does not depend on arrival order.
fn dedupe_by_id(records: Vec<PunchRecord>) -> Vec<PunchRecord> {
    let mut by_id: BTreeMap<PunchId, PunchRecord> = BTreeMap::new();

    for record in records {
        match by_id.get(&record.id) {
            Some(existing) if existing.content_cmp(&record).is_ge() => {}
            _ => {
                by_id.insert(record.id.clone(), record);
            }
        }
    }

    by_id.into_values().collect()
}

fn sort_punches(mut punches: Vec<PunchRecord>) -> Vec<PunchRecord> {
    punches.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| a.id.cmp(&b.id)));
    punches
}
