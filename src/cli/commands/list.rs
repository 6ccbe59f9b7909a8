use super::Context;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::periods::Aggregates;
use crate::models::punch::PunchRecord;
use crate::models::session::{Pairing, WorkSession};
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_flag, colorize_in_out, colorize_optional};
use crate::utils::readable_duration;
use crate::utils::table::Table;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Punches,
    Sessions,
    Days,
    Weeks,
    PayPeriods,
}

#[derive(Serialize)]
struct SessionRow {
    in_id: String,
    out_id: Option<String>,
    start: DateTime<Local>,
    end: Option<DateTime<Local>>,
    minutes: i64,
    pairing: Pairing,
}

#[derive(Serialize)]
struct PeriodRow {
    start: NaiveDate,
    end: NaiveDate,
    label: String,
    total_minutes: i64,
    incomplete: bool,
    open_session: bool,
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        punches,
        sessions,
        days,
        weeks,
        pay_periods: _,
        json,
    } = &cli.command
    {
        let view = if *punches {
            View::Punches
        } else if *sessions {
            View::Sessions
        } else if *days {
            View::Days
        } else if *weeks {
            View::Weeks
        } else {
            View::PayPeriods
        };

        let ctx = Context::open(cli, cfg)?;
        let now = ctx.model.now();

        if view == View::Punches {
            let set = ctx.model.snapshot();
            if *json {
                println!("{}", serde_json::to_string_pretty(set.punches())?);
            } else {
                print_punches(set.punches());
            }
            return Ok(());
        }

        let agg = ctx.model.aggregate()?;

        match view {
            View::Sessions => {
                let rows: Vec<SessionRow> =
                    agg.sessions.iter().map(|s| session_row(s, &now)).collect();
                if *json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    print_sessions(&agg, &now);
                }
            }
            _ => {
                let rows = period_rows(view, &agg, &now);
                if *json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    print_periods(view, &rows);
                }
            }
        }
    }
    Ok(())
}

fn session_row(s: &WorkSession, now: &DateTime<Local>) -> SessionRow {
    SessionRow {
        in_id: s.in_record.id.to_string(),
        out_id: s.out_record.as_ref().map(|o| o.id.to_string()),
        start: s.in_record.local_at(),
        end: s.out_record.as_ref().map(PunchRecord::local_at),
        minutes: s.duration(now).num_minutes(),
        pairing: s.pairing,
    }
}

fn period_rows(view: View, agg: &Aggregates, now: &DateTime<Local>) -> Vec<PeriodRow> {
    match view {
        View::Days => agg
            .days
            .iter()
            .map(|d| PeriodRow {
                start: d.day,
                end: d.end(),
                label: d.day.format("%a %m/%d").to_string(),
                total_minutes: d.total_worked(now).num_minutes(),
                incomplete: d.is_incomplete(now),
                open_session: d.has_open_session(),
            })
            .collect(),
        View::Weeks => agg
            .weeks
            .iter()
            .map(|w| PeriodRow {
                start: w.week_of,
                end: w.one_week_ahead(),
                label: w.label(now),
                total_minutes: w.total_worked(now).num_minutes(),
                incomplete: w.is_incomplete(now),
                open_session: w.has_open_session(),
            })
            .collect(),
        _ => agg
            .pay_periods
            .iter()
            .map(|p| PeriodRow {
                start: p.start(),
                end: p.two_weeks_ahead(),
                label: p.label(now),
                total_minutes: p.total_worked(now).num_minutes(),
                incomplete: p.is_incomplete(now),
                open_session: p.has_open_session(),
            })
            .collect(),
    }
}

fn print_punches(punches: &[PunchRecord]) {
    if punches.is_empty() {
        info("No punches.");
        return;
    }

    header("Punches");
    let mut table = Table::new(vec!["ID", "DATE", "TIME", "KIND", "F", "PAIRED", "LOCATION"]);
    for p in punches {
        table.add_row(vec![
            p.id.to_string(),
            p.date_str(),
            p.time_str(),
            colorize_in_out(&p.kind.to_string(), p.kind.is_in()),
            colorize_flag(p.is_flagged),
            colorize_optional(&p.paired_id.as_ref().map(|id| id.to_string()).unwrap_or_default()),
            colorize_optional(&p.location.map(|l| l.to_string()).unwrap_or_default()),
        ]);
    }
    print!("{}", table.render());
}

fn print_sessions(agg: &Aggregates, now: &DateTime<Local>) {
    if agg.sessions.is_empty() && agg.unmatched.is_empty() {
        info("No sessions.");
        return;
    }

    header("Sessions");
    let mut table = Table::new(vec!["DATE", "IN", "OUT", "WORKED", "MATCH"]);
    for s in &agg.sessions {
        let out = s
            .out_record
            .as_ref()
            .map(PunchRecord::time_str)
            .unwrap_or_else(|| "--:--".to_string());
        let pairing = match s.pairing {
            Pairing::Linked => "linked",
            Pairing::Positional => "by position",
            Pairing::Open => "open",
        };
        table.add_row(vec![
            s.in_record.date_str(),
            colorize_in_out(&s.in_record.time_str(), true),
            colorize_in_out(&out, false),
            readable_duration(s.duration(now)),
            pairing.to_string(),
        ]);
    }
    print!("{}", table.render());

    if !agg.unmatched.is_empty() {
        println!();
        header("Unmatched Out punches");
        for p in &agg.unmatched {
            println!("  {} ({})", p, p.id);
        }
    }
}

fn print_periods(view: View, rows: &[PeriodRow]) {
    let title = match view {
        View::Days => "Days",
        View::Weeks => "Weeks",
        _ => "Pay periods",
    };

    if rows.is_empty() {
        info(format!("{}: nothing worked yet.", title));
        return;
    }

    header(title);
    let mut table = Table::new(vec!["PERIOD", "WORKED", ""]);
    for r in rows {
        let marker = if r.open_session {
            "punched in"
        } else if r.incomplete {
            "in progress"
        } else {
            ""
        };
        table.add_row(vec![
            r.label.clone(),
            readable_duration(chrono::Duration::minutes(r.total_minutes)),
            colorize_optional(marker),
        ]);
    }
    print!("{}", table.render());
}
