use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use nird_schema::config::Config;
use nird_schema::init::{prompt_overwrite, remove_database, SchemaInitializer};
use nird_schema::logger::{self, LogLevel};
use nird_schema::report;

/// Create the NIRD catalog database and seed its reference rows.
#[derive(Parser, Debug)]
#[command(name = "nird-init", version)]
struct Cli {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deployment root that relative paths resolve against
    #[arg(long)]
    root: Option<PathBuf>,

    /// Overwrite an existing database without asking
    #[arg(short, long)]
    yes: bool,

    /// error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }
    let level: LogLevel = cli
        .log_level
        .as_deref()
        .unwrap_or(config.log_level.as_str())
        .parse()?;
    logger::init(level, config.log_file_path().as_deref())?;

    let path = config.database_path();
    info!(path = %path.display(), exists = path.exists(), "target database");

    if path.exists() {
        if !cli.yes && !prompt_overwrite(&path) {
            println!("Operation cancelled, {} left untouched", path.display());
            return Ok(());
        }
        remove_database(&path).with_context(|| format!("failed to remove {}", path.display()))?;
    }

    match SchemaInitializer::new(&path).run() {
        Ok(summary) => {
            println!("{}", report::init_summary(&summary));
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "database initialization failed");
            Err(err).with_context(|| format!("failed to initialize {}", path.display()))
        }
    }
}
