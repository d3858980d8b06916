//! Command-line parsing for the usage/cost forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SamplePolicy;

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "kwh",
    version,
    about = "Forecast electricity usage and cost from billing history and climate data"
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a provider and month repeatedly and print the projection.
    Interactive(DataArgs),
    /// Print a projection for one provider (one month, or all twelve).
    Project(ProjectArgs),
    /// Print the fitted model, provider rates and diagnostics.
    Fit(FitArgs),
}

/// Input tables and fit options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Daily climate CSV (dates, highs, lows).
    #[arg(long, env = "KWH_DAILY_CSV", default_value = "dfw.csv")]
    pub daily: PathBuf,

    /// Monthly climate CSV (Month, Average, StDev, 25th Pct, 75th Pct).
    #[arg(long, env = "KWH_MONTHLY_CSV", default_value = "dfw_monthly.csv")]
    pub monthly: PathBuf,

    /// Billing history CSV (Start Date, End Date, Usage, Bill, Provider).
    #[arg(long, env = "KWH_BILLING_CSV", default_value = "kwhhistory.csv")]
    pub billing: PathBuf,

    /// What to do with billing periods that have no overlapping climate data.
    #[arg(long, value_enum, default_value_t = SamplePolicy::Skip)]
    pub sample_policy: SamplePolicy,

    /// Reject a concave (hill-shaped) fit instead of warning about it.
    #[arg(long)]
    pub require_convex: bool,
}

/// Options for a one-shot projection.
#[derive(Debug, Args, Clone)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Provider id exactly as it appears in the billing CSV.
    #[arg(short, long)]
    pub provider: String,

    /// Month (1-12). Omit to print all twelve months.
    #[arg(short, long)]
    pub month: Option<u32>,
}

/// Options for the fit summary.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Render an ASCII plot of the samples and fitted curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export cycle samples (with fitted values) to CSV.
    #[arg(long)]
    pub export_samples: Option<PathBuf>,

    /// Export the fitted curve to JSON.
    #[arg(long)]
    pub export_model: Option<PathBuf>,
}
