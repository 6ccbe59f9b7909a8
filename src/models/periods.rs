//! Day, week and pay-period aggregates.
//!
//! Totals and the "incomplete" flag are computed on read against the `now`
//! the caller passes in; nothing time-dependent is stored.

use super::punch::PunchRecord;
use super::session::WorkSession;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Number of weeks in a full pay period.
pub const WEEKS_PER_PAY_PERIOD: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPeriod {
    pub day: NaiveDate,
    /// Every punch stamped on this calendar day, newest first.
    pub punches: Vec<PunchRecord>,
    /// Sessions whose In falls on this day, newest first.
    pub sessions: Vec<WorkSession>,
}

impl DayPeriod {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            punches: Vec::new(),
            sessions: Vec::new(),
        }
    }

    pub fn end(&self) -> NaiveDate {
        self.day + Duration::days(1)
    }

    pub fn total_worked<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        self.sessions
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration(now))
    }

    pub fn has_open_session(&self) -> bool {
        self.sessions.iter().any(WorkSession::is_open)
    }

    pub fn is_incomplete<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.date_naive() < self.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPeriod {
    pub week_of: NaiveDate,
    /// Days of the week that have punches, newest first.
    pub days: Vec<DayPeriod>,
}

impl WeekPeriod {
    pub fn new(week_of: NaiveDate) -> Self {
        Self {
            week_of,
            days: Vec::new(),
        }
    }

    pub fn one_week_ahead(&self) -> NaiveDate {
        self.week_of + Duration::days(7)
    }

    pub fn total_worked<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        self.days
            .iter()
            .fold(Duration::zero(), |acc, d| acc + d.total_worked(now))
    }

    pub fn has_open_session(&self) -> bool {
        self.days.iter().any(DayPeriod::has_open_session)
    }

    pub fn is_incomplete<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        now.date_naive() < self.one_week_ahead()
    }

    pub fn label<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        range_label(self.week_of, self.one_week_ahead(), self.is_incomplete(now))
    }
}

/// One or two consecutive weeks, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayPeriod {
    weeks: Vec<WeekPeriod>,
}

impl PayPeriod {
    /// Panics unless `weeks` holds one or two weeks: any other count means
    /// the chunking upstream is broken.
    pub fn from_weeks(weeks: Vec<WeekPeriod>) -> Self {
        assert!(
            !weeks.is_empty() && weeks.len() <= WEEKS_PER_PAY_PERIOD,
            "a pay period holds one or two weeks, got {}",
            weeks.len()
        );
        Self { weeks }
    }

    pub fn weeks(&self) -> &[WeekPeriod] {
        &self.weeks
    }

    pub fn start(&self) -> NaiveDate {
        self.weeks[0].week_of
    }

    pub fn two_weeks_ahead(&self) -> NaiveDate {
        self.start() + Duration::days(14)
    }

    /// A one-week pay period is still waiting for its second week.
    pub fn is_partial(&self) -> bool {
        self.weeks.len() < WEEKS_PER_PAY_PERIOD
    }

    pub fn total_worked<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        self.weeks
            .iter()
            .fold(Duration::zero(), |acc, w| acc + w.total_worked(now))
    }

    pub fn has_open_session(&self) -> bool {
        self.weeks.iter().any(WeekPeriod::has_open_session)
    }

    pub fn is_incomplete<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.is_partial() || now.date_naive() < self.two_weeks_ahead()
    }

    pub fn label<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        range_label(self.start(), self.two_weeks_ahead(), self.is_incomplete(now))
    }
}

fn range_label(start: NaiveDate, end: NaiveDate, incomplete: bool) -> String {
    if incomplete {
        format!("{} - (current)", start.format("%m/%d"))
    } else {
        format!("{} - {}", start.format("%m/%d"), end.format("%m/%d"))
    }
}

/// Everything the aggregation pass produces for one reconciled set.
/// `days`, `weeks` and `pay_periods` are newest first and already exclude
/// periods with nothing worked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub as_of: DateTime<Utc>,
    pub sessions: Vec<WorkSession>,
    /// Outs that no In claimed.
    pub unmatched: Vec<PunchRecord>,
    pub days: Vec<DayPeriod>,
    pub weeks: Vec<WeekPeriod>,
    pub pay_periods: Vec<PayPeriod>,
}

impl Aggregates {
    pub fn empty(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            sessions: Vec::new(),
            unmatched: Vec::new(),
            days: Vec::new(),
            weeks: Vec::new(),
            pay_periods: Vec::new(),
        }
    }

    pub fn open_sessions(&self) -> impl Iterator<Item = &WorkSession> {
        self.sessions.iter().filter(|s| s.is_open())
    }
}
