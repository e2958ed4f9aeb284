use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use nird_schema::codegen::{GenerateOutcome, ModelGenerator};
use nird_schema::config::Config;
use nird_schema::logger::{self, LogLevel};
use nird_schema::report;

/// Generate one Rust model per table of an existing NIRD database.
#[derive(Parser, Debug)]
#[command(name = "nird-models", version)]
struct Cli {
    /// Database to read; defaults to the configured one
    database: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deployment root that relative paths resolve against
    #[arg(long)]
    root: Option<PathBuf>,

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
    if let Some(database) = cli.database {
        config = config.with_database(database);
    }
    let level: LogLevel = cli
        .log_level
        .as_deref()
        .unwrap_or(config.log_level.as_str())
        .parse()?;
    logger::init(level, config.log_file_path().as_deref())?;

    let database = config.database_path();
    let generator = ModelGenerator::new(&database, config.models_path())
        .with_connection_target(config.model_connection_target());

    match generator.run() {
        Ok(GenerateOutcome::Generated(models)) => {
            println!("{}", report::models_summary(&models));
        }
        Ok(GenerateOutcome::MissingDatabase(path)) => {
            println!("Database not found: {}", path.display());
        }
        Ok(GenerateOutcome::NoTables) => {
            println!("No tables found in {}", database.display());
        }
        Err(err) => {
            error!(error = %err, "model generation failed");
            return Err(err).with_context(|| {
                format!("failed to generate models from {}", database.display())
            });
        }
    }
    Ok(())
}
