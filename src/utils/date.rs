use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Weekday};

/// First day of the week containing `date`, weeks starting on `first`.
pub fn start_of_week(date: NaiveDate, first: Weekday) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_sunday() - first.num_days_from_sunday()) % 7;
    date - Duration::days(back as i64)
}

/// Calendar day of `at` in the time zone `tz`.
pub fn calendar_day<Tz: TimeZone>(at: &DateTime<chrono::Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// "YYYY-MM-DD HH:MM" (or with seconds) read as wall-clock time in `tz`.
/// Ambiguous times (DST fold) resolve to the earlier instant.
pub fn parse_datetime_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    tz.from_local_datetime(&naive).earliest()
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}
