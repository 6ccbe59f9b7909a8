use crate::db::migrate::PunchTable;
use crate::errors::AppResult;
use crate::models::punch::{PunchId, PunchRecord, RawPunch};
use rusqlite::{Connection, Result, Row, params};

/// Read a punch row as-is. Validation happens at the reconciliation
/// boundary, so nothing here rejects a row.
pub fn map_row(row: &Row) -> Result<RawPunch> {
    Ok(RawPunch {
        id: row.get("id")?,
        kind: row.get("kind")?,
        at: row.get("at")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        flagged: row.get("flagged")?,
        paired_id: row.get("paired_id")?,
    })
}

pub fn load_raw_punches(conn: &Connection, table: PunchTable) -> AppResult<Vec<RawPunch>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, kind, at, latitude, longitude, flagged, paired_id
         FROM {} ORDER BY at DESC",
        table.name()
    ))?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_raw_punch(conn: &Connection, table: PunchTable, raw: &RawPunch) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (id, kind, at, latitude, longitude, flagged, paired_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            table.name()
        ),
        params![
            raw.id,
            raw.kind,
            raw.at,
            raw.latitude,
            raw.longitude,
            raw.flagged.unwrap_or(0),
            raw.paired_id,
        ],
    )?;
    Ok(())
}

/// Insert or replace a punch. Returns the number of rows written.
pub fn upsert_punch(conn: &Connection, table: PunchTable, p: &PunchRecord) -> AppResult<usize> {
    let n = conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} (id, kind, at, latitude, longitude, flagged, paired_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            table.name()
        ),
        params![
            p.id.as_str(),
            p.kind.to_db_str(),
            p.at.to_rfc3339(),
            p.location.map(|l| l.latitude),
            p.location.map(|l| l.longitude),
            if p.is_flagged { 1 } else { 0 },
            p.paired_id.as_ref().map(|id| id.as_str()),
        ],
    )?;
    Ok(n)
}

/// Update the mutable fields of an existing punch (flag and pairing).
/// Returns the number of rows touched: 0 when the id is unknown.
pub fn update_punch(conn: &Connection, table: PunchTable, p: &PunchRecord) -> AppResult<usize> {
    let n = conn.execute(
        &format!(
            "UPDATE {} SET flagged = ?1, paired_id = ?2 WHERE id = ?3",
            table.name()
        ),
        params![
            if p.is_flagged { 1 } else { 0 },
            p.paired_id.as_ref().map(|id| id.as_str()),
            p.id.as_str(),
        ],
    )?;
    Ok(n)
}

pub fn delete_punch(conn: &Connection, table: PunchTable, id: &PunchId) -> AppResult<usize> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", table.name()),
        [id.as_str()],
    )?;
    Ok(n)
}

pub fn clear_table(conn: &Connection, table: PunchTable) -> AppResult<()> {
    conn.execute(&format!("DELETE FROM {}", table.name()), [])?;
    Ok(())
}

pub fn load_pending_deletes(conn: &Connection) -> AppResult<Vec<PunchId>> {
    let mut stmt = conn.prepare("SELECT id FROM pending_deletes ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(PunchId::new(r?));
    }
    Ok(out)
}
