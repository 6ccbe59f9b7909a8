use super::{Context, describe_status};
use crate::cli::parser::{Cli, PunchArgs};
use crate::config::Config;
use crate::core::model::{PunchReceipt, SaveStatus};
use crate::errors::{AppError, AppResult};
use crate::models::location::GeoLocation;
use crate::models::punch_kind::PunchKind;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_datetime_in;
use chrono::{DateTime, Local, Utc};

/// Handle `in` and `out`.
pub fn handle(cli: &Cli, cfg: &Config, kind: PunchKind, args: &PunchArgs) -> AppResult<()> {
    let mut ctx = Context::open(cli, cfg)?;

    let location = GeoLocation::from_parts(args.lat, args.lon)?;
    let at = match &args.at {
        Some(s) => parse_at(s)?,
        None => ctx.model.now().with_timezone(&Utc),
    };

    let receipt = match kind {
        PunchKind::In => ctx.model.punch_in_at(at, location)?,
        PunchKind::Out => ctx.model.punch_out_at(at, location)?,
    };

    ctx.persist()?;
    report(&receipt);

    ctx.log(
        kind.to_db_str(),
        receipt.record.id.as_str(),
        &format!("{} ({})", receipt.record, describe_status(&receipt.status)),
    );

    Ok(())
}

fn parse_at(s: &str) -> AppResult<DateTime<Utc>> {
    parse_datetime_in(s, &Local)
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

fn report(receipt: &PunchReceipt) {
    success(format!("{} (id {})", receipt.record, receipt.record.id));

    match &receipt.status {
        SaveStatus::Confirmed => info(describe_status(&receipt.status)),
        other => warning(describe_status(other)),
    }

    if receipt.record.kind.is_out() {
        match &receipt.linked {
            Some((in_id, status)) if status.is_confirmed() => {
                info(format!("Closed session started by {}", in_id))
            }
            Some((in_id, status)) => warning(format!(
                "Closed session started by {}, link {}",
                in_id,
                describe_status(status)
            )),
            None => warning("No open session: this Out stays unmatched"),
        }
    }
}
