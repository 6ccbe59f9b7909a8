use super::{location::GeoLocation, punch_kind::PunchKind};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque, stable punch identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PunchId(String);

impl PunchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id for a record created on this device.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PunchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PunchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchRecord {
    pub id: PunchId,
    pub kind: PunchKind,
    pub at: DateTime<Utc>,
    pub location: Option<GeoLocation>,
    pub is_flagged: bool,
    pub paired_id: Option<PunchId>,
}

impl PunchRecord {
    /// New record created locally, with a generated id.
    /// - `is_flagged = false`
    /// - `paired_id = None` (set later by punch-out linkage)
    pub fn new(kind: PunchKind, at: DateTime<Utc>, location: Option<GeoLocation>) -> Self {
        Self::with_id(PunchId::generate(), kind, at, location)
    }

    pub fn with_id(
        id: PunchId,
        kind: PunchKind,
        at: DateTime<Utc>,
        location: Option<GeoLocation>,
    ) -> Self {
        Self {
            id,
            kind,
            at,
            location,
            is_flagged: false,
            paired_id: None,
        }
    }

    pub fn local_at(&self) -> DateTime<Local> {
        self.at.with_timezone(&Local)
    }

    pub fn date_str(&self) -> String {
        self.local_at().format("%m/%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.local_at().format("%-I:%M %p").to_string()
    }

    /// Total order over the record content, id excluded.
    /// Used to pick one record among duplicates sharing an id, whatever the
    /// order they arrived in.
    pub fn content_cmp(&self, other: &Self) -> Ordering {
        self.at
            .cmp(&other.at)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.is_flagged.cmp(&other.is_flagged))
            .then_with(|| self.paired_id.cmp(&other.paired_id))
            .then_with(|| cmp_location(&self.location, &other.location))
    }
}

fn cmp_location(a: &Option<GeoLocation>, b: &Option<GeoLocation>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .latitude
            .total_cmp(&b.latitude)
            .then_with(|| a.longitude.total_cmp(&b.longitude)),
    }
}

impl fmt::Display for PunchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Punched {} on {} at {}",
            self.kind,
            self.date_str(),
            self.time_str()
        )
    }
}

/// A punch as the remote store hands it over: every field optional and
/// untyped. Turned into a [`PunchRecord`] with `TryFrom`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPunch {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub at: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub flagged: Option<i64>,
    pub paired_id: Option<String>,
}

impl From<&PunchRecord> for RawPunch {
    fn from(r: &PunchRecord) -> Self {
        Self {
            id: Some(r.id.to_string()),
            kind: Some(r.kind.to_db_str().to_string()),
            at: Some(r.at.to_rfc3339()),
            latitude: r.location.map(|l| l.latitude),
            longitude: r.location.map(|l| l.longitude),
            flagged: Some(if r.is_flagged { 1 } else { 0 }),
            paired_id: r.paired_id.as_ref().map(|p| p.to_string()),
        }
    }
}

impl TryFrom<RawPunch> for PunchRecord {
    type Error = AppError;

    fn try_from(raw: RawPunch) -> AppResult<Self> {
        let id = raw
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::InvalidRecord("missing id".into()))?;

        let kind_str = raw
            .kind
            .ok_or_else(|| AppError::InvalidRecord(format!("{}: missing kind", id)))?;
        let kind = PunchKind::pk_from_str(&kind_str).ok_or_else(|| {
            AppError::InvalidRecord(format!("{}: invalid kind '{}'", id, kind_str))
        })?;

        let at_str = raw
            .at
            .ok_or_else(|| AppError::InvalidRecord(format!("{}: missing timestamp", id)))?;
        let at = DateTime::parse_from_rfc3339(&at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                AppError::InvalidRecord(format!("{}: invalid timestamp '{}'", id, at_str))
            })?;

        let location = GeoLocation::from_parts(raw.latitude, raw.longitude)
            .map_err(|e| AppError::InvalidRecord(format!("{}: {}", id, e)))?;

        let paired_id = raw
            .paired_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if paired_id.as_deref() == Some(id.as_str()) {
            return Err(AppError::InvalidRecord(format!(
                "{}: record is paired with itself",
                id
            )));
        }

        Ok(Self {
            id: PunchId(id),
            kind,
            at,
            location,
            is_flagged: raw.flagged.unwrap_or(0) != 0,
            paired_id: paired_id.map(PunchId),
        })
    }
}
