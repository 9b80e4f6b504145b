use clap::Parser;
use tracing::debug;

use cider_cli::cli::{Cli, Command};
use cider_cli::commands;
use cider_cli::logging::init_logging;
use cider_core::{SimulationCache, SimulationRepository};

async fn open_repository(cli: &Cli) -> anyhow::Result<Box<dyn SimulationRepository>> {
    let db_config = cli.db_config();
    debug!("connecting to {} backend", db_config.backend);
    Ok(commands::build_registry().create(&db_config).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let fmt = cli.number_format();

    let output = match &cli.command {
        // Works from a file; never opens the database.
        Command::Run(args) => commands::run_inputs(args, &fmt)?,
        Command::Stored(args) => {
            let repo = open_repository(&cli).await?;
            commands::run_stored(&*repo, args, &fmt).await?
        }
        Command::Compare(args) => {
            let repo = open_repository(&cli).await?;
            let mut cache = SimulationCache::new();
            commands::compare(&*repo, args, &mut cache, &fmt).await?
        }
        Command::Results(args) => {
            let repo = open_repository(&cli).await?;
            commands::list_results(&*repo, args, &fmt).await?
        }
    };
    println!("{output}");

    Ok(())
}
