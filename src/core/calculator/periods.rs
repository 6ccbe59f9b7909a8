use crate::core::calculator::pairing::pair_punches;
use crate::errors::AppResult;
use crate::models::periods::{
    Aggregates, DayPeriod, PayPeriod, WEEKS_PER_PAY_PERIOD, WeekPeriod,
};
use crate::models::punch::PunchRecord;
use crate::models::session::WorkSession;
use crate::utils::date::{calendar_day, start_of_week};
use crate::utils::formatting::should_display;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc, Weekday};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub week_start: Weekday,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
        }
    }
}

/// Pair the punches and bucket the sessions into days, weeks and pay
/// periods. The time zone of `now` is the calendar used for bucketing.
pub fn aggregate<Tz: TimeZone>(
    punches: &[PunchRecord],
    now: &DateTime<Tz>,
    opts: &AggregateOptions,
) -> AppResult<Aggregates> {
    let tz = now.timezone();
    let pairings = pair_punches(punches, &tz)?;

    let days = bucket_days(punches, &pairings.sessions, &tz);
    let weeks = bucket_weeks(days.clone(), opts.week_start);
    let pay_periods = chunk_pay_periods(weeks.clone());

    Ok(Aggregates {
        as_of: now.with_timezone(&Utc),
        sessions: pairings.sessions,
        unmatched: pairings.unmatched,
        days: days
            .into_iter()
            .filter(|d| should_display(d.total_worked(now)))
            .collect(),
        weeks: weeks
            .into_iter()
            .rev()
            .filter(|w| should_display(w.total_worked(now)))
            .collect(),
        pay_periods: pay_periods
            .into_iter()
            .rev()
            .filter(|p| should_display(p.total_worked(now)))
            .collect(),
    })
}

/// Open sessions whose In is at or before `since`.
pub fn sessions_open_since<Tz: TimeZone>(
    punches: &[PunchRecord],
    since: &DateTime<Tz>,
) -> AppResult<Vec<WorkSession>> {
    let since_utc = since.with_timezone(&Utc);
    let pairings = pair_punches(punches, &since.timezone())?;

    Ok(pairings
        .sessions
        .into_iter()
        .filter(|s| s.is_open() && s.in_record.at <= since_utc)
        .collect())
}

/// One period per calendar day with punches, newest first. Sessions go to
/// the day of their In.
fn bucket_days<Tz: TimeZone>(
    punches: &[PunchRecord],
    sessions: &[WorkSession],
    tz: &Tz,
) -> Vec<DayPeriod> {
    let mut days: BTreeMap<NaiveDate, DayPeriod> = BTreeMap::new();

    for p in punches {
        let day = calendar_day(&p.at, tz);
        days.entry(day)
            .or_insert_with(|| DayPeriod::new(day))
            .punches
            .push(p.clone());
    }

    for s in sessions {
        let day = calendar_day(&s.in_record.at, tz);
        days.entry(day)
            .or_insert_with(|| DayPeriod::new(day))
            .sessions
            .push(s.clone());
    }

    for d in days.values_mut() {
        d.punches
            .sort_by(|a, b| b.at.cmp(&a.at).then_with(|| a.id.cmp(&b.id)));
    }

    days.into_values().rev().collect()
}

/// Weeks oldest first; each week keeps its days newest first. Weeks without
/// punches between the oldest and the newest one are filled in empty, so
/// consecutive entries are always seven days apart.
fn bucket_weeks(days_newest_first: Vec<DayPeriod>, week_start: Weekday) -> Vec<WeekPeriod> {
    let mut weeks: BTreeMap<NaiveDate, WeekPeriod> = BTreeMap::new();

    for day in days_newest_first {
        let week_of = start_of_week(day.day, week_start);
        weeks
            .entry(week_of)
            .or_insert_with(|| WeekPeriod::new(week_of))
            .days
            .push(day);
    }

    if let (Some(&first), Some(&last)) = (weeks.keys().next(), weeks.keys().next_back()) {
        let mut week_of = first;
        while week_of < last {
            weeks
                .entry(week_of)
                .or_insert_with(|| WeekPeriod::new(week_of));
            week_of += Duration::days(7);
        }
    }

    weeks.into_values().collect()
}

/// Chunk weeks (oldest first, no gaps) two at a time. A trailing odd week,
/// the newest one, becomes a one-week pay period.
pub fn chunk_pay_periods(weeks_oldest_first: Vec<WeekPeriod>) -> Vec<PayPeriod> {
    weeks_oldest_first
        .chunks(WEEKS_PER_PAY_PERIOD)
        .map(|chunk| PayPeriod::from_weeks(chunk.to_vec()))
        .collect()
}
