use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cider_data::{ScenarioCsvLoader, TemplateCsvLoader};
use cider_db_sqlite::SqliteRepository;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Load cost templates and scenarios from CSV files into the database.
///
/// Column headers are the field names of the template or scenario, preceded
/// by `name` and an optional `description`. Rows whose name already exists
/// replace the stored values.
#[derive(Parser, Debug)]
#[command(name = "cider-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file with cost templates
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// CSV file with cost scenarios
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// SQLite database URL (e.g., sqlite:cider.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:cider.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database).await?;

    if args.migrate {
        info!("running migrations");
        repo.run_migrations().await?;
    }

    if let Some(seeds_dir) = &args.seeds {
        info!(dir = %seeds_dir.display(), "running seeds");
        repo.run_seeds(seeds_dir).await?;
    }

    if let Some(path) = &args.templates {
        let records = TemplateCsvLoader::parse(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        info!(file = %path.display(), records = records.len(), "parsed templates");

        let written = TemplateCsvLoader::load(&repo, &records)
            .await
            .context("Failed to load templates into database")?;
        println!("Loaded {} templates from {}", written, path.display());
    }

    if let Some(path) = &args.scenarios {
        let records = ScenarioCsvLoader::parse(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        info!(file = %path.display(), records = records.len(), "parsed scenarios");

        let written = ScenarioCsvLoader::load(&repo, &records)
            .await
            .context("Failed to load scenarios into database")?;
        println!("Loaded {} scenarios from {}", written, path.display());
    }

    if args.templates.is_none() && args.scenarios.is_none() {
        println!("Nothing to load; pass --templates and/or --scenarios.");
    }

    Ok(())
}
