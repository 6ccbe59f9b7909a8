use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Tables holding punch rows. They share one column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchTable {
    /// Store side: every punch the backend knows.
    Punches,
    /// Local side: punches inserted here and not confirmed yet.
    PendingInserts,
    /// Local side: last snapshot fetched from the store.
    SnapshotCache,
}

impl PunchTable {
    pub fn name(&self) -> &'static str {
        match self {
            PunchTable::Punches => "punches",
            PunchTable::PendingInserts => "pending_inserts",
            PunchTable::SnapshotCache => "snapshot_cache",
        }
    }
}

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create a punch table. Columns stay loosely typed: rows are validated
/// when read back, not when written.
pub fn create_punch_table(conn: &Connection, table: PunchTable) -> Result<()> {
    let name = table.name();
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {name} (
            id         TEXT PRIMARY KEY,
            kind       TEXT,
            at         TEXT,
            latitude   REAL,
            longitude  REAL,
            flagged    INTEGER NOT NULL DEFAULT 0,
            paired_id  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_{name}_at ON {name}(at);
        "#
    ))?;
    Ok(())
}

fn create_pending_deletes_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS pending_deletes (
            id TEXT PRIMARY KEY
        );
        "#,
    )?;
    Ok(())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    success(format!("Migration applied: {} → {}", version, message));
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point for the local database: pending sets, snapshot cache
/// and the internal log.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    let version = "20250601_0001_local_state";
    if !is_applied(conn, version)? {
        let fresh = !table_exists(conn, PunchTable::PendingInserts.name())?;

        create_punch_table(conn, PunchTable::PendingInserts)?;
        create_punch_table(conn, PunchTable::SnapshotCache)?;
        create_pending_deletes_table(conn)?;

        let message = if fresh {
            "created pending_inserts, pending_deletes, snapshot_cache"
        } else {
            "verified local state tables"
        };
        mark_applied(conn, version, message)?;
    }

    Ok(())
}

/// Schema of the SQLite-backed punch store.
pub fn ensure_store_schema(conn: &Connection) -> Result<()> {
    create_punch_table(conn, PunchTable::Punches)
}
