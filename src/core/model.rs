//! The punch model: the caller-owned context that ties the store, the clock
//! and the local pending changes together.
//!
//! Every mutation takes `&mut self`, so one reconciliation pass or punch
//! operation runs at a time. Readers work on [`PunchModel::snapshot`], an
//! immutable `Arc` that later passes never touch.

use crate::core::calculator::periods::{self, AggregateOptions};
use crate::core::clock::Clock;
use crate::core::diff::{ChangeSet, diff};
use crate::core::reconcile::{PendingChanges, ReconciledPunchSet, parse_snapshot, reconcile};
use crate::errors::{AppError, AppResult};
use crate::models::location::GeoLocation;
use crate::models::periods::Aggregates;
use crate::models::punch::{PunchId, PunchRecord, RawPunch};
use crate::models::punch_kind::PunchKind;
use crate::models::session::WorkSession;
use crate::store::PunchStore;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// Outcome of handing a record to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Confirmed,
    /// The store answered but did not take the write.
    Unconfirmed,
    /// The store could not be reached; the change stays local.
    Failed(String),
}

impl SaveStatus {
    fn from_result(res: AppResult<bool>) -> Self {
        match res {
            Ok(true) => SaveStatus::Confirmed,
            Ok(false) => SaveStatus::Unconfirmed,
            Err(e) => SaveStatus::Failed(e.to_string()),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, SaveStatus::Confirmed)
    }
}

/// Outcome of pushing an edit (flag, link, delete) to the store.
pub type UpdateStatus = SaveStatus;

#[derive(Debug, Clone)]
pub struct PunchReceipt {
    pub record: PunchRecord,
    pub status: SaveStatus,
    /// The In this Out was linked to, with the outcome of updating it.
    pub linked: Option<(PunchId, UpdateStatus)>,
    pub changes: ChangeSet<PunchId>,
}

/// Handed out before a fetch starts. A snapshot arriving with a ticket older
/// than the last one applied is stale and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket {
    generation: u64,
}

/// Everything a consumer needs after a reconciliation pass.
#[derive(Debug, Clone)]
pub struct ModelUpdate {
    pub set: Arc<ReconciledPunchSet>,
    pub aggregates: Arc<Aggregates>,
    pub punches: ChangeSet<PunchId>,
    pub days: ChangeSet<NaiveDate>,
    pub weeks: ChangeSet<NaiveDate>,
    pub pay_periods: ChangeSet<NaiveDate>,
    /// Store rows that failed validation and were skipped.
    pub rejected: usize,
}

pub struct PunchModel<S: PunchStore, C: Clock> {
    store: S,
    clock: C,
    options: AggregateOptions,
    pending: PendingChanges,
    last_snapshot: Vec<PunchRecord>,
    current: Arc<ReconciledPunchSet>,
    aggregates: Arc<Aggregates>,
    issued: u64,
    applied: u64,
}

impl<S: PunchStore, C: Clock> PunchModel<S, C> {
    pub fn new(store: S, clock: C, options: AggregateOptions) -> Self {
        let as_of = clock.now().with_timezone(&Utc);
        Self {
            store,
            clock,
            options,
            pending: PendingChanges::default(),
            last_snapshot: Vec::new(),
            current: Arc::new(ReconciledPunchSet::default()),
            aggregates: Arc::new(Aggregates::empty(as_of)),
            issued: 0,
            applied: 0,
        }
    }

    /// Rebuild a model from persisted local state: the pending changes and
    /// the last snapshot fetched from the store.
    pub fn restore(
        store: S,
        clock: C,
        options: AggregateOptions,
        pending: PendingChanges,
        cached_snapshot: Vec<PunchRecord>,
    ) -> AppResult<Self> {
        let mut model = Self::new(store, clock, options);
        model.pending = pending;
        model.last_snapshot = cached_snapshot;
        model.rebuild();
        model.aggregates = Arc::new(model.aggregate()?);
        Ok(model)
    }

    // -----------------------------
    // Accessors
    // -----------------------------
    pub fn snapshot(&self) -> Arc<ReconciledPunchSet> {
        Arc::clone(&self.current)
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    pub fn last_snapshot(&self) -> &[PunchRecord] {
        &self.last_snapshot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    pub fn now(&self) -> DateTime<C::Tz> {
        self.clock.now()
    }

    // -----------------------------
    // Punching
    // -----------------------------
    pub fn punch_in(&mut self, location: Option<GeoLocation>) -> AppResult<PunchReceipt> {
        let at = self.clock.now().with_timezone(&Utc);
        self.punch_in_at(at, location)
    }

    /// Record an In. It shows up in the current set right away, whatever the
    /// store answers.
    pub fn punch_in_at(
        &mut self,
        at: DateTime<Utc>,
        location: Option<GeoLocation>,
    ) -> AppResult<PunchReceipt> {
        let record = PunchRecord::new(PunchKind::In, at, location);
        self.pending.insert(record.clone());
        let status = SaveStatus::from_result(self.store.save(&record));
        let changes = self.rebuild();

        Ok(PunchReceipt {
            record,
            status,
            linked: None,
            changes,
        })
    }

    pub fn punch_out(&mut self, location: Option<GeoLocation>) -> AppResult<PunchReceipt> {
        let at = self.clock.now().with_timezone(&Utc);
        self.punch_out_at(at, location)
    }

    /// Record an Out, linked to the most recent session still open at `at`.
    /// Without an open session the Out is kept unmatched.
    pub fn punch_out_at(
        &mut self,
        at: DateTime<Utc>,
        location: Option<GeoLocation>,
    ) -> AppResult<PunchReceipt> {
        let since = at.with_timezone(&self.clock.now().timezone());
        let open_in = periods::sessions_open_since(self.current.punches(), &since)?
            .into_iter()
            .next()
            .map(|s| s.in_record);

        let mut record = PunchRecord::new(PunchKind::Out, at, location);
        record.paired_id = open_in.as_ref().map(|r| r.id.clone());
        self.pending.insert(record.clone());
        let status = SaveStatus::from_result(self.store.save(&record));

        let linked = open_in.map(|mut punch_in| {
            punch_in.paired_id = Some(record.id.clone());
            self.apply_local_edit(&punch_in);
            let link_status = SaveStatus::from_result(self.store.update(&punch_in));
            (punch_in.id, link_status)
        });

        let changes = self.rebuild();

        Ok(PunchReceipt {
            record,
            status,
            linked,
            changes,
        })
    }

    /// Flag or unflag a punch. The local copy keeps the new value even when
    /// the store rejects the update; surfacing (or reverting) is up to the
    /// caller.
    pub fn set_flagged(&mut self, id: &PunchId, flagged: bool) -> AppResult<UpdateStatus> {
        let mut record = self
            .current
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::PunchNotFound(id.to_string()))?;

        record.is_flagged = flagged;
        self.apply_local_edit(&record);
        let status = SaveStatus::from_result(self.store.update(&record));
        self.rebuild();

        Ok(status)
    }

    /// Hide a punch now and ask the store to drop it. The id stays pending
    /// deletion until a snapshot no longer reports it. A local insert is
    /// kept next to its delete: the store may already hold it.
    pub fn discard(&mut self, id: &PunchId) -> AppResult<UpdateStatus> {
        if self.current.get(id).is_none() {
            return Err(AppError::PunchNotFound(id.to_string()));
        }

        self.pending.mark_deleted(id.clone());
        let status = SaveStatus::from_result(self.store.delete(id));
        self.rebuild();

        Ok(status)
    }

    // -----------------------------
    // Reconciliation
    // -----------------------------
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            generation: self.issued,
        }
    }

    /// Apply the outcome of a fetch started with `ticket`.
    ///
    /// - stale ticket → `Ok(None)`, nothing changes
    /// - failed fetch → the error, the current set stays valid
    /// - aggregation failure → the error, nothing changes
    pub fn apply_snapshot(
        &mut self,
        ticket: FetchTicket,
        fetched: AppResult<Vec<RawPunch>>,
    ) -> AppResult<Option<ModelUpdate>> {
        if ticket.generation <= self.applied {
            return Ok(None);
        }

        let (records, rejected) = parse_snapshot(fetched?);

        let mut pending = self.pending.clone();
        let set = Arc::new(reconcile(records.clone(), &mut pending));
        pending.settle_discarded();
        let aggregates = Arc::new(periods::aggregate(
            set.punches(),
            &self.clock.now(),
            &self.options,
        )?);

        let update = ModelUpdate {
            punches: diff(self.current.punches(), set.punches()),
            days: diff(&self.aggregates.days, &aggregates.days),
            weeks: diff(&self.aggregates.weeks, &aggregates.weeks),
            pay_periods: diff(&self.aggregates.pay_periods, &aggregates.pay_periods),
            set: Arc::clone(&set),
            aggregates: Arc::clone(&aggregates),
            rejected,
        };

        self.pending = pending;
        self.last_snapshot = records;
        self.current = set;
        self.aggregates = aggregates;
        self.applied = ticket.generation;

        Ok(Some(update))
    }

    /// Hand every pending change to the store again. Nothing leaves the
    /// pending sets here: only a later snapshot confirms them. Inserts
    /// already discarded are not saved again.
    pub fn push_pending(&self) -> Vec<(PunchId, SaveStatus)> {
        let saves = self
            .pending
            .inserted
            .iter()
            .filter(|p| !self.pending.deleted.contains(&p.id))
            .map(|p| (p.id.clone(), SaveStatus::from_result(self.store.save(p))));
        let deletes = self
            .pending
            .deleted
            .iter()
            .map(|id| (id.clone(), SaveStatus::from_result(self.store.delete(id))));

        saves.chain(deletes).collect()
    }

    /// Fetch from the store and reconcile. No retry on failure.
    pub fn refresh(&mut self) -> AppResult<Option<ModelUpdate>> {
        let ticket = self.begin_refresh();
        let fetched = self.store.fetch_all();
        self.apply_snapshot(ticket, fetched)
    }

    // -----------------------------
    // Queries
    // -----------------------------
    /// Aggregates of the current set, open sessions measured now.
    pub fn aggregate(&self) -> AppResult<Aggregates> {
        periods::aggregate(self.current.punches(), &self.clock.now(), &self.options)
    }

    pub fn sessions_open_since(&self, since: &DateTime<C::Tz>) -> AppResult<Vec<WorkSession>> {
        periods::sessions_open_since(self.current.punches(), since)
    }

    /// Forget every local change and the cached snapshot (logout).
    pub fn reset(&mut self) -> ChangeSet<PunchId> {
        self.pending.clear();
        self.last_snapshot.clear();
        let as_of = self.clock.now().with_timezone(&Utc);
        self.aggregates = Arc::new(Aggregates::empty(as_of));
        self.rebuild()
    }

    // -----------------------------
    // Internals
    // -----------------------------

    /// Re-run reconciliation against the last snapshot after a local change.
    fn rebuild(&mut self) -> ChangeSet<PunchId> {
        let set = reconcile(self.last_snapshot.clone(), &mut self.pending);
        let changes = diff(self.current.punches(), set.punches());
        self.current = Arc::new(set);
        changes
    }

    /// Write an edited record wherever its local copy lives.
    fn apply_local_edit(&mut self, edited: &PunchRecord) {
        if let Some(p) = self.pending.inserted.iter_mut().find(|p| p.id == edited.id) {
            *p = edited.clone();
        }
        if let Some(p) = self.last_snapshot.iter_mut().find(|p| p.id == edited.id) {
            *p = edited.clone();
        }
    }
}
