mod cli;
mod commands;
mod output;

use clap::Parser;
use sengi::{config, db, error::Result, utils};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logger
    env_logger::init();

    let db_path = if let Some(path) = &args.db {
        path.clone()
    } else {
        utils::get_default_dbdir().join("engines.db")
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = db::EngineDb::init(&db_path)?;

    // Load configuration
    let cfg = if let Some(config_path) = &args.config {
        config::Config::load_from_path(config_path)
            .map_err(|e| sengi::SengiError::Config(e.to_string()))?
    } else {
        config::Config::load()
    };

    cli::handle_args(args, &db, &cfg)?;

    Ok(())
}
