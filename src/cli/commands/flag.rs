use super::{Context, describe_status};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::model::SaveStatus;
use crate::errors::AppResult;
use crate::models::punch::PunchId;
use crate::ui::messages::{success, warning};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Flag { id, unset } = &cli.command {
        let mut ctx = Context::open(cli, cfg)?;
        let id = PunchId::new(id.trim());
        let flagged = !*unset;

        let status = ctx.model.set_flagged(&id, flagged)?;
        ctx.persist()?;

        let verb = if flagged { "flagged" } else { "unflagged" };
        match &status {
            SaveStatus::Confirmed => success(format!("Punch {} {}", id, verb)),
            // the local copy keeps the new value
            other => warning(format!(
                "Punch {} {} locally, {}",
                id,
                verb,
                describe_status(other)
            )),
        }

        ctx.log(
            if flagged { "flag" } else { "unflag" },
            id.as_str(),
            &format!("Punch {} ({})", verb, describe_status(&status)),
        );
    }
    Ok(())
}
