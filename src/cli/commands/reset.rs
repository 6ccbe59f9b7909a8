use super::Context;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::pending::clear_local_state;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Logout: drop pending changes and the cached snapshot. The punch store
/// is left alone.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let mut ctx = Context::open(cli, cfg)?;

    let dropped = ctx.model.pending().inserted.len() + ctx.model.pending().deleted.len();
    ctx.model.reset();
    clear_local_state(&mut ctx.pool.conn)?;

    let msg = format!("Local state cleared, {} pending change(s) dropped", dropped);
    success(&msg);
    ctx.log("reset", "", &msg);

    Ok(())
}
