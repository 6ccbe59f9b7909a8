use super::{Context, describe_status};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::model::SaveStatus;
use crate::errors::AppResult;
use crate::models::punch::PunchId;
use crate::ui::messages::{success, warning};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id } = &cli.command {
        let mut ctx = Context::open(cli, cfg)?;
        let id = PunchId::new(id.trim());

        let status = ctx.model.discard(&id)?;
        ctx.persist()?;

        match &status {
            SaveStatus::Confirmed => success(format!("Punch {} deleted", id)),
            other => warning(format!(
                "Punch {} hidden locally, {}",
                id,
                describe_status(other)
            )),
        }

        ctx.log(
            "del",
            id.as_str(),
            &format!("Punch deleted ({})", describe_status(&status)),
        );
    }
    Ok(())
}
