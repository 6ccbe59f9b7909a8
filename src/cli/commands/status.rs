use super::Context;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::readable_duration;

/// Open sessions, today's and the current pay period's totals.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let ctx = Context::open(cli, cfg)?;
    let now = ctx.model.now();
    let alert = cfg.hours_alert()?;
    let agg = ctx.model.aggregate()?;

    header("Status");

    let open: Vec<_> = agg.open_sessions().collect();
    if open.is_empty() {
        info("Not punched in.");
    }
    for s in &open {
        let worked = s.duration(&now);
        let line = format!(
            "Punched In since {} {} ({})",
            s.in_record.date_str(),
            s.in_record.time_str(),
            readable_duration(worked)
        );
        if worked >= alert {
            warning(format!("{}: over {}", line, readable_duration(alert)));
        } else {
            info(line);
        }
    }

    let today = now.date_naive();
    let today_total = agg
        .days
        .iter()
        .find(|d| d.day == today)
        .map(|d| d.total_worked(&now))
        .unwrap_or_else(chrono::Duration::zero);
    info(format!("Today: {}", readable_duration(today_total)));

    if let Some(p) = agg.pay_periods.first() {
        info(format!(
            "Pay period {}: {}",
            p.label(&now),
            readable_duration(p.total_worked(&now))
        ));
    }

    let pending = ctx.model.pending();
    if !pending.is_empty() {
        warning(format!(
            "{} insert(s) and {} delete(s) not confirmed by the punch store",
            pending.inserted.len(),
            pending.deleted.len()
        ));
    }

    Ok(())
}
