//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - runs the forecasting pipeline
//! - prints reports/plots, runs the prompt loop, writes optional exports

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DataArgs, FitArgs, ProjectArgs};
use crate::domain::{ForecastConfig, ProviderId};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `kwh` binary.
pub fn run() -> Result<(), AppError> {
    // Optional; CSV paths can come from KWH_*_CSV variables in a local .env.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Interactive(args) => handle_interactive(args),
        Command::Project(args) => handle_project(args),
        Command::Fit(args) => handle_fit(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "kwh_forecast=debug" } else { "kwh_forecast=warn" };
    // A second init (e.g. in tests) is not an error worth reporting.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .try_init()
        .ok();
}

fn handle_interactive(args: DataArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args);
    let run = pipeline::run_pipeline(&config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    crate::cli::prompt::run_session(&run.forecaster, &mut input, &mut out)
}

fn handle_project(args: ProjectArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args.data);
    let run = pipeline::run_pipeline(&config)?;
    let forecaster = &run.forecaster;

    let provider = ProviderId::new(args.provider.trim());
    let rate = forecaster.get_provider_rate(&provider)?;

    match args.month {
        Some(month) => {
            let stat = forecaster.month_stat(month)?;
            let projection = forecaster.project_for_month(&provider, month)?;
            println!("{}", crate::report::format_rate_line(&provider, rate));
            print!("{}", crate::report::format_projection(stat, &projection));
        }
        None => {
            let year = forecaster.project_year(&provider)?;
            print!("{}", crate::report::format_year_table(&provider, rate, &year));
        }
    }

    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args.data);
    let run = pipeline::run_pipeline(&config)?;

    println!("{}", crate::report::format_fit_summary(&run));

    if args.plot {
        let residuals = crate::report::compute_residuals(&run.cycles.samples, &run.fitted.model);
        let plot = crate::plot::render_ascii_plot(&residuals, &run.fitted.model, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export_samples {
        crate::io::export::write_samples_csv(path, &run.cycles.samples, &run.fitted.model)?;
    }
    if let Some(path) = &args.export_model {
        let (t_min, t_max) = run
            .cycles
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.avg_temp), hi.max(s.avg_temp))
            });
        crate::io::curve::write_curve_json(path, &run.fitted, t_min, t_max)?;
    }

    Ok(())
}

pub fn forecast_config_from_args(args: &DataArgs) -> ForecastConfig {
    ForecastConfig {
        daily_csv: args.daily.clone(),
        monthly_csv: args.monthly.clone(),
        billing_csv: args.billing.clone(),
        sample_policy: args.sample_policy,
        require_convex: args.require_convex,
    }
}

/// Rewrite argv so `kwh` defaults to `kwh interactive`.
///
/// Rules:
/// - `kwh`                          -> `kwh interactive`
/// - `kwh --billing x.csv ...`      -> `kwh interactive --billing x.csv ...`
/// - `kwh --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("interactive".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "interactive" | "project" | "fit");
    if is_subcommand {
        return argv;
    }

    // A leading flag means "interactive with these flags".
    if arg1.starts_with('-') {
        argv.insert(1, "interactive".to_string());
        return argv;
    }

    argv
}
