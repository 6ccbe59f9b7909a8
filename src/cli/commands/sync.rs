use super::Context;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::diff::ChangeSet;
use crate::core::model::SaveStatus;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let mut ctx = Context::open(cli, cfg)?;

    let pushed = ctx.model.push_pending();
    let failed = pushed
        .iter()
        .filter(|(_, s)| matches!(s, SaveStatus::Failed(_)))
        .count();
    if !pushed.is_empty() {
        info(format!(
            "Pushed {} pending change(s), {} failed",
            pushed.len(),
            failed
        ));
    }

    let result = ctx.model.refresh();
    // pending changes survive a failed fetch
    ctx.persist()?;

    let update = match result? {
        Some(u) => u,
        None => {
            info("A newer snapshot was already applied");
            return Ok(());
        }
    };

    if update.rejected > 0 {
        warning(format!(
            "{} punch(es) from the store failed validation and were skipped",
            update.rejected
        ));
    }

    let summary = format!(
        "{} punches: {}; days: {}; pay periods: {}",
        update.set.len(),
        describe(&update.punches),
        describe(&update.days),
        describe(&update.pay_periods)
    );

    let pending = ctx.model.pending();
    if !pending.is_empty() {
        warning(format!(
            "{} insert(s) and {} delete(s) still waiting for the punch store",
            pending.inserted.len(),
            pending.deleted.len()
        ));
    }

    success(format!("Synced, {}", summary));
    ctx.log("sync", "", &summary);

    Ok(())
}

fn describe<K>(changes: &ChangeSet<K>) -> String {
    if changes.is_empty() {
        return "no changes".to_string();
    }
    format!(
        "+{} -{} ~{}",
        changes.inserted.len(),
        changes.deleted.len(),
        changes.updated.len()
    )
}
