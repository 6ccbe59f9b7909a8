//! webpunch library root.
//! Exposes the punch model, the reconciliation and aggregation engines, the
//! CLI parser and the high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use models::punch_kind::PunchKind;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::In(args) => cli::commands::punch::handle(cli, cfg, PunchKind::In, args),
        Commands::Out(args) => cli::commands::punch::handle(cli, cfg, PunchKind::Out, args),
        Commands::Sync => cli::commands::sync::handle(cli, cfg),
        Commands::List { .. } => cli::commands::list::handle(cli, cfg),
        Commands::Flag { .. } => cli::commands::flag::handle(cli, cfg),
        Commands::Del { .. } => cli::commands::del::handle(cli, cfg),
        Commands::Status => cli::commands::status::handle(cli, cfg),
        Commands::Reset => cli::commands::reset::handle(cli, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(custom_store) = &cli.store {
        cfg.remote_store = custom_store.clone();
    }

    dispatch(&cli, &cfg)
}
