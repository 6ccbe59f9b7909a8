use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::store::SqlitePunchStore;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (the file is skipped in test mode)
///  - the local database with all pending migrations
///  - the SQLite punch store
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.store.clone(), cli.test)?;

    println!("⚙️  Initializing webpunch…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", cfg.database);
    println!("🕒 Punch store: {}", cfg.remote_store);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    SqlitePunchStore::open(&cfg.remote_store)?;

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success("webpunch initialization completed!");
    Ok(())
}
