//! Durable local state: pending inserts, pending deletes and the last
//! snapshot fetched from the store. Survives restarts until the store
//! confirms the changes (or `reset` clears them).

use crate::core::reconcile::{PendingChanges, parse_snapshot};
use crate::db::migrate::PunchTable;
use crate::db::queries::{clear_table, load_pending_deletes, load_raw_punches, upsert_punch};
use crate::errors::AppResult;
use crate::models::punch::PunchRecord;
use rusqlite::Connection;

pub fn load_pending(conn: &Connection) -> AppResult<PendingChanges> {
    let (inserted, _rejected) = parse_snapshot(load_raw_punches(conn, PunchTable::PendingInserts)?);
    let deleted = load_pending_deletes(conn)?.into_iter().collect();

    Ok(PendingChanges { inserted, deleted })
}

pub fn save_pending(conn: &mut Connection, pending: &PendingChanges) -> AppResult<()> {
    let tx = conn.transaction()?;

    clear_table(&tx, PunchTable::PendingInserts)?;
    for p in &pending.inserted {
        upsert_punch(&tx, PunchTable::PendingInserts, p)?;
    }

    tx.execute("DELETE FROM pending_deletes", [])?;
    for id in &pending.deleted {
        tx.execute(
            "INSERT OR IGNORE INTO pending_deletes (id) VALUES (?1)",
            [id.as_str()],
        )?;
    }

    tx.commit()?;
    Ok(())
}

pub fn load_snapshot_cache(conn: &Connection) -> AppResult<Vec<PunchRecord>> {
    let (records, _rejected) = parse_snapshot(load_raw_punches(conn, PunchTable::SnapshotCache)?);
    Ok(records)
}

pub fn save_snapshot_cache(conn: &mut Connection, records: &[PunchRecord]) -> AppResult<()> {
    let tx = conn.transaction()?;

    clear_table(&tx, PunchTable::SnapshotCache)?;
    for p in records {
        upsert_punch(&tx, PunchTable::SnapshotCache, p)?;
    }

    tx.commit()?;
    Ok(())
}

/// Forget every local change and the cached snapshot (logout).
pub fn clear_local_state(conn: &mut Connection) -> AppResult<()> {
    let tx = conn.transaction()?;
    clear_table(&tx, PunchTable::PendingInserts)?;
    clear_table(&tx, PunchTable::SnapshotCache)?;
    tx.execute("DELETE FROM pending_deletes", [])?;
    tx.commit()?;
    Ok(())
}
