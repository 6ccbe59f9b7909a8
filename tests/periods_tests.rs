use chrono::{Duration, NaiveDate, Utc, Weekday};
use webpunch::core::calculator::periods::{
    AggregateOptions, aggregate, chunk_pay_periods, sessions_open_since,
};
use webpunch::models::periods::{PayPeriod, WeekPeriod};

mod common;
use common::{fixed, linked, punch_in, punch_out, utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_full_day_gives_eight_hour_session_and_day() {
    let i = punch_in("i", utc(2025, 6, 2, 9, 0));
    let o = punch_out("o", utc(2025, 6, 2, 17, 0));
    let now = utc(2025, 6, 2, 18, 0);

    let agg = aggregate(&[o, i], &now, &AggregateOptions::default()).unwrap();

    assert_eq!(agg.sessions.len(), 1);
    assert_eq!(agg.sessions[0].duration(&now), Duration::hours(8));
    assert_eq!(agg.days.len(), 1);
    assert_eq!(agg.days[0].day, date(2025, 6, 2));
    assert_eq!(agg.days[0].total_worked(&now), Duration::hours(8));
}

#[test]
fn test_open_session_counts_up_to_now() {
    let punches = [punch_in("i", utc(2025, 6, 2, 9, 0))];
    let opts = AggregateOptions::default();

    let at_11 = utc(2025, 6, 2, 11, 0);
    let agg = aggregate(&punches, &at_11, &opts).unwrap();
    assert_eq!(agg.days[0].total_worked(&at_11), Duration::hours(2));
    assert!(agg.days[0].has_open_session());

    let at_13 = utc(2025, 6, 2, 13, 0);
    let agg = aggregate(&punches, &at_13, &opts).unwrap();
    assert_eq!(agg.days[0].total_worked(&at_13), Duration::hours(4));
}

#[test]
fn test_week_total_is_sum_of_day_totals() {
    // Mon 2 June .. Wed 4 June 2025, week starting Sunday 1 June
    let mut punches = Vec::new();
    for (n, day) in [2u32, 3, 4].iter().enumerate() {
        punches.push(punch_in(&format!("i{n}"), utc(2025, 6, *day, 9, 0)));
        punches.push(punch_out(&format!("o{n}"), utc(2025, 6, *day, 12 + n as u32, 30)));
    }
    let now = utc(2025, 6, 5, 8, 0);

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();

    assert_eq!(agg.weeks.len(), 1);
    let week = &agg.weeks[0];
    assert_eq!(week.week_of, date(2025, 6, 1));
    let sum = week
        .days
        .iter()
        .fold(Duration::zero(), |acc, d| acc + d.total_worked(&now));
    assert_eq!(week.total_worked(&now), sum);
    assert_eq!(sum, Duration::minutes(3 * 210 + 60 + 120));
}

#[test]
fn test_week_start_is_configurable() {
    // Sunday 8 June 2025
    let punches = [
        punch_in("i", utc(2025, 6, 8, 9, 0)),
        punch_out("o", utc(2025, 6, 8, 10, 0)),
    ];
    let now = utc(2025, 6, 9, 0, 0);

    let sunday = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();
    let monday = aggregate(
        &punches,
        &now,
        &AggregateOptions {
            week_start: Weekday::Mon,
        },
    )
    .unwrap();

    assert_eq!(sunday.weeks[0].week_of, date(2025, 6, 8));
    assert_eq!(monday.weeks[0].week_of, date(2025, 6, 2));
}

#[test]
fn test_days_follow_the_calendar_of_now() {
    // 23:30 UTC on 2 June is 01:30 on 3 June at UTC+2
    let punches = [
        punch_in("i", utc(2025, 6, 2, 23, 30)),
        punch_out("o", utc(2025, 6, 3, 0, 30)),
    ];
    let now = fixed(2025, 6, 4, 0, 0).with_timezone(&chrono::FixedOffset::east_opt(7200).unwrap());

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();

    assert_eq!(agg.days.len(), 1);
    assert_eq!(agg.days[0].day, date(2025, 6, 3));
    assert_eq!(agg.days[0].total_worked(&now), Duration::hours(1));
}

#[test]
fn test_periods_with_nothing_worked_are_hidden() {
    // an unmatched Out alone: a day with punches but no worked time
    let punches = [
        punch_out("stray", utc(2025, 6, 2, 17, 0)),
        punch_in("i", utc(2025, 6, 10, 9, 0)),
        punch_out("o", utc(2025, 6, 10, 10, 0)),
    ];
    let now = utc(2025, 6, 11, 0, 0);

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();

    assert_eq!(agg.unmatched.len(), 1);
    assert_eq!(agg.days.len(), 1);
    assert_eq!(agg.days[0].day, date(2025, 6, 10));
    assert_eq!(agg.weeks.len(), 1);
    assert_eq!(agg.pay_periods.len(), 1);
}

#[test]
fn test_pay_periods_pair_weeks_oldest_first() {
    // three worked weeks: 1 June, 8 June, 15 June (Sunday starts)
    let mut punches = Vec::new();
    for (n, day) in [2u32, 9, 16].iter().enumerate() {
        punches.push(punch_in(&format!("i{n}"), utc(2025, 6, *day, 9, 0)));
        punches.push(punch_out(&format!("o{n}"), utc(2025, 6, *day, 17, 0)));
    }
    let now = utc(2025, 7, 15, 0, 0);

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();

    assert_eq!(agg.weeks.len(), 3);
    assert_eq!(agg.weeks[0].week_of, date(2025, 6, 15));
    assert_eq!(agg.pay_periods.len(), 2);

    // newest first: the odd week out is the newest one, still partial
    let newest = &agg.pay_periods[0];
    assert_eq!(newest.start(), date(2025, 6, 15));
    assert!(newest.is_partial());
    assert!(newest.is_incomplete(&now));
    assert_eq!(newest.label(&now), "06/15 - (current)");

    let oldest = &agg.pay_periods[1];
    assert_eq!(oldest.start(), date(2025, 6, 1));
    assert_eq!(oldest.weeks().len(), 2);
    assert!(!oldest.is_incomplete(&now));
    assert_eq!(oldest.label(&now), "06/01 - 06/15");
    assert_eq!(oldest.total_worked(&now), Duration::hours(16));
}

#[test]
fn test_week_without_punches_still_counts_toward_pay_periods() {
    // worked 2 June and 16 June; nothing in the week of 8 June
    let punches = [
        punch_in("i1", utc(2025, 6, 2, 9, 0)),
        punch_out("o1", utc(2025, 6, 2, 17, 0)),
        punch_in("i2", utc(2025, 6, 16, 9, 0)),
        punch_out("o2", utc(2025, 6, 16, 12, 0)),
    ];
    let now = utc(2025, 6, 17, 10, 0);

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();

    assert_eq!(agg.weeks.len(), 2);
    assert_eq!(agg.pay_periods.len(), 2);

    let current = &agg.pay_periods[0];
    assert_eq!(current.start(), date(2025, 6, 15));
    assert!(current.is_incomplete(&now));
    assert_eq!(current.label(&now), "06/15 - (current)");
    assert_eq!(current.total_worked(&now), Duration::hours(3));

    let previous = &agg.pay_periods[1];
    assert_eq!(previous.start(), date(2025, 6, 1));
    let starts: Vec<NaiveDate> = previous.weeks().iter().map(|w| w.week_of).collect();
    assert_eq!(starts, vec![date(2025, 6, 1), date(2025, 6, 8)]);
    assert!(!previous.is_incomplete(&now));
    assert_eq!(previous.label(&now), "06/01 - 06/15");
}

#[test]
fn test_current_week_and_day_are_incomplete() {
    let punches = [
        punch_in("i", utc(2025, 6, 2, 9, 0)),
        punch_out("o", utc(2025, 6, 2, 17, 0)),
    ];
    let now = utc(2025, 6, 2, 18, 0);

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();

    assert!(agg.days[0].is_incomplete(&now));
    assert!(agg.weeks[0].is_incomplete(&now));
    assert_eq!(agg.weeks[0].label(&now), "06/01 - (current)");

    let later = utc(2025, 6, 20, 0, 0);
    assert!(!agg.days[0].is_incomplete(&later));
    assert!(!agg.weeks[0].is_incomplete(&later));
    assert_eq!(agg.weeks[0].label(&later), "06/01 - 06/08");
}

#[test]
fn test_past_period_with_open_session_is_not_incomplete() {
    let punches = [punch_in("forgot", utc(2025, 5, 5, 9, 0))];
    let now = utc(2025, 6, 20, 0, 0);

    let agg = aggregate(&punches, &now, &AggregateOptions::default()).unwrap();
    let week = &agg.weeks[0];

    assert!(week.has_open_session());
    assert!(!week.is_incomplete(&now));
}

#[test]
fn test_sessions_open_since_filters_on_in_time() {
    let early = punch_in("early", utc(2025, 6, 2, 8, 0));
    let late = punch_in("late", utc(2025, 6, 3, 9, 0));
    let i = punch_in("done", utc(2025, 6, 1, 9, 0));
    let o = punch_out("done-out", utc(2025, 6, 1, 17, 0));
    let i = linked(i, &o);

    let open = sessions_open_since(&[early, late, i, o], &utc(2025, 6, 2, 12, 0)).unwrap();

    assert_eq!(open.len(), 1);
    assert_eq!(open[0].in_record.id.as_str(), "early");
}

#[test]
fn test_chunking_keeps_weeks_in_order() {
    let weeks: Vec<WeekPeriod> = [1u32, 8, 15, 22]
        .iter()
        .map(|d| WeekPeriod::new(date(2025, 6, *d)))
        .collect();

    let periods = chunk_pay_periods(weeks);

    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].start(), date(2025, 6, 1));
    assert_eq!(periods[1].start(), date(2025, 6, 15));
    assert!(periods.iter().all(|p| !p.is_partial()));
}

#[test]
#[should_panic]
fn test_pay_period_without_weeks_panics() {
    PayPeriod::from_weeks(Vec::new());
}

#[test]
#[should_panic]
fn test_pay_period_with_three_weeks_panics() {
    PayPeriod::from_weeks(vec![
        WeekPeriod::new(date(2025, 6, 1)),
        WeekPeriod::new(date(2025, 6, 8)),
        WeekPeriod::new(date(2025, 6, 15)),
    ]);
}

#[test]
fn test_one_week_pay_period_is_always_incomplete() {
    let p = PayPeriod::from_weeks(vec![WeekPeriod::new(date(2020, 1, 5))]);

    assert!(p.is_incomplete(&Utc::now()));
}
