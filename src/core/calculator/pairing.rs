//! Match In punches with Out punches.
//!
//! 1. Linked: `paired_id` references between an In and an Out present in
//!    the set. Ins first (newest first), then Outs pointing at a free In.
//!    Same-kind and dangling references are ignored.
//! 2. Positional (degraded mode, for records without a usable link): per
//!    calendar day, walking newest first, every In takes the nearest free
//!    Out that follows it on the same day. With an In at 09:00 and Outs at
//!    12:00 and 17:00 this gives a 3h session and leaves 17:00 unmatched,
//!    where pairing by index from the newest would give 09:00-17:00 (8h).
//! 3. Ins left over are open sessions, Outs left over are unmatched.

use crate::errors::{AppError, AppResult};
use crate::models::punch::{PunchId, PunchRecord};
use crate::models::punch_kind::PunchKind;
use crate::models::session::{Pairing, WorkSession};
use crate::utils::date::calendar_day;
use chrono::{NaiveDate, TimeZone};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pairings {
    /// Newest first by In time.
    pub sessions: Vec<WorkSession>,
    /// Outs no In claimed, newest first.
    pub unmatched: Vec<PunchRecord>,
}

pub fn pair_punches<Tz: TimeZone>(punches: &[PunchRecord], tz: &Tz) -> AppResult<Pairings> {
    let mut order: Vec<usize> = (0..punches.len()).collect();
    order.sort_by(|&a, &b| {
        punches[b]
            .at
            .cmp(&punches[a].at)
            .then_with(|| punches[a].id.cmp(&punches[b].id))
    });

    let index: HashMap<&PunchId, usize> = punches.iter().enumerate().map(|(i, p)| (&p.id, i)).collect();
    let mut claimed = vec![false; punches.len()];
    let mut sessions = Vec::new();

    // -----------------------------
    // Linked pairs
    // -----------------------------
    for kind in [PunchKind::In, PunchKind::Out] {
        for &i in &order {
            let p = &punches[i];
            if p.kind != kind || claimed[i] {
                continue;
            }
            let Some(j) = p.paired_id.as_ref().and_then(|pid| index.get(pid)).copied() else {
                continue;
            };
            if claimed[j] || punches[j].kind != p.kind.opposite() {
                continue;
            }

            let (in_idx, out_idx) = if p.kind.is_in() { (i, j) } else { (j, i) };
            let (in_rec, out_rec) = (&punches[in_idx], &punches[out_idx]);

            if out_rec.at < in_rec.at {
                return Err(AppError::Invariant(format!(
                    "punch out {} ({}) is earlier than its punch in {} ({})",
                    out_rec.id,
                    out_rec.at.to_rfc3339(),
                    in_rec.id,
                    in_rec.at.to_rfc3339()
                )));
            }

            claimed[in_idx] = true;
            claimed[out_idx] = true;
            sessions.push(WorkSession::closed(
                in_rec.clone(),
                out_rec.clone(),
                Pairing::Linked,
            ));
        }
    }

    // -----------------------------
    // Positional pairs, per day
    // -----------------------------
    let mut by_day: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for &i in &order {
        if !claimed[i] {
            by_day
                .entry(calendar_day(&punches[i].at, tz))
                .or_default()
                .push(i);
        }
    }

    let mut unmatched = Vec::new();

    for indices in by_day.values() {
        // Outs seen so far (all later than the current punch), nearest last
        let mut waiting_outs: Vec<usize> = Vec::new();

        for &i in indices {
            let p = &punches[i];
            match p.kind {
                PunchKind::Out => waiting_outs.push(i),
                PunchKind::In => match waiting_outs.pop() {
                    Some(o) => sessions.push(WorkSession::closed(
                        p.clone(),
                        punches[o].clone(),
                        Pairing::Positional,
                    )),
                    None => sessions.push(WorkSession::open(p.clone())),
                },
            }
        }

        unmatched.extend(waiting_outs.into_iter().map(|o| punches[o].clone()));
    }

    sessions.sort_by(|a, b| {
        b.in_record
            .at
            .cmp(&a.in_record.at)
            .then_with(|| a.in_record.id.cmp(&b.in_record.id))
    });
    unmatched.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| a.id.cmp(&b.id)));

    Ok(Pairings {
        sessions,
        unmatched,
    })
}
