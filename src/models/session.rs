use super::punch::PunchRecord;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

/// How the In and the Out of a session were matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pairing {
    /// Matched through `paired_id`.
    Linked,
    /// Degraded mode: matched by position within the day.
    Positional,
    /// No Out yet.
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSession {
    pub in_record: PunchRecord,
    pub out_record: Option<PunchRecord>,
    pub pairing: Pairing,
}

impl WorkSession {
    pub fn closed(in_record: PunchRecord, out_record: PunchRecord, pairing: Pairing) -> Self {
        Self {
            in_record,
            out_record: Some(out_record),
            pairing,
        }
    }

    pub fn open(in_record: PunchRecord) -> Self {
        Self {
            in_record,
            out_record: None,
            pairing: Pairing::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.out_record.is_none()
    }

    /// Worked time. Open sessions are measured against `now` on every call.
    pub fn duration<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        let end = match &self.out_record {
            Some(out) => out.at,
            None => now.with_timezone(&Utc),
        };
        let worked = end - self.in_record.at;
        // an In stamped after `now` (clock skew) has not accrued anything yet
        if self.is_open() && worked < Duration::zero() {
            Duration::zero()
        } else {
            worked
        }
    }
}
