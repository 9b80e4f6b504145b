use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cider_core::db::DbConfig;
use cider_core::format::NumberFormat;
use rust_decimal::Decimal;

/// Multi-year financial projections for a cider operation.
///
/// Runs a template and scenario through the projection engine and prints
/// a year-by-year P&L, summary metrics and recommendations.
#[derive(Debug, Parser)]
#[command(name = "cider-sim", version, about)]
pub struct Cli {
    /// Database backend to use.
    #[arg(long, global = true, default_value = "sqlite")]
    pub backend: String,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `cider.db`) or `:memory:`.
    #[arg(long, global = true, default_value = "cider.db")]
    pub db: String,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Render numbers as 1,234.5 with a leading $ instead of 1 234,5 kr.
    #[arg(long, global = true, default_value_t = false)]
    pub us_format: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.backend, &self.db)
    }

    pub fn number_format(&self) -> NumberFormat {
        if self.us_format {
            NumberFormat::en_us()
        } else {
            NumberFormat::default()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate inputs from a TOML file. No database is needed.
    Run(RunArgs),

    /// Simulate a stored template and scenario.
    Stored(StoredArgs),

    /// Run one template against several stored scenarios.
    Compare(CompareArgs),

    /// List saved results, newest first.
    Results(ResultsArgs),
}

/// Horizon overrides shared by the simulating commands.
#[derive(Debug, Clone, Default, Args)]
pub struct HorizonArgs {
    /// Number of years to project [default: 11, or the inputs file]
    #[arg(long)]
    pub years: Option<u32>,

    /// First-year production in liters [default: 1000, or the inputs file]
    #[arg(long)]
    pub base_volume: Option<Decimal>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// TOML file with [template], [scenario] and [simulation] tables
    #[arg(short, long)]
    pub inputs: PathBuf,

    #[command(flatten)]
    pub horizon: HorizonArgs,

    /// Write the yearly projections to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the full result to this JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Skip input validation and simulate whatever is given
    #[arg(long, default_value_t = false)]
    pub no_validate: bool,
}

#[derive(Debug, Clone, Args)]
pub struct StoredArgs {
    /// Template id
    #[arg(long)]
    pub template: i64,

    /// Scenario id
    #[arg(long)]
    pub scenario: i64,

    #[command(flatten)]
    pub horizon: HorizonArgs,

    /// Save the result under this name
    #[arg(long)]
    pub save: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    /// Template id
    #[arg(long)]
    pub template: i64,

    /// Scenario ids, in display order
    #[arg(long, required = true, num_args = 1..)]
    pub scenario: Vec<i64>,

    #[command(flatten)]
    pub horizon: HorizonArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ResultsArgs {
    /// Only results for this template id
    #[arg(long)]
    pub template: Option<i64>,
}
