use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use newsdb::cli::{self, Cli};
use newsdb::{utils, AppConfig, NewsDb};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Set up logging; RUST_LOG wins over NEWSDB_LOG
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    let args = Cli::parse();
    let database_path = args.db.clone().unwrap_or_else(|| config.database_path.clone());

    // Ensure the data directory exists before trying to open the database file
    utils::ensure_directory_exists(&database_path)?;

    info!("Opening database at {}", database_path.display());
    let db = NewsDb::open(&database_path, config.pool_size)
        .with_context(|| format!("Failed to open database {}", database_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::execute(&db, args.command, &mut out)
}
