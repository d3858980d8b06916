//! Shared forecasting pipeline used by every subcommand.
//!
//! load CSVs -> cycle samples -> fit (once) -> provider rates (once) -> Forecaster
//!
//! The subcommands then only differ in presentation (summary, one-shot
//! projection, interactive prompt).

use tracing::{info, warn};

use crate::billing::{CycleSamples, build_cycle_samples, compute_provider_rates};
use crate::climate::DailyTemperatures;
use crate::domain::ForecastConfig;
use crate::error::AppError;
use crate::forecast::Forecaster;
use crate::io::ingest::{InputTables, load_input_tables};
use crate::models::{FittedModel, QuadraticModel};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub tables: InputTables,
    pub temps: DailyTemperatures,
    pub cycles: CycleSamples,
    pub fitted: FittedModel,
    pub forecaster: Forecaster,
}

/// Load the configured CSVs and run the pipeline.
pub fn run_pipeline(config: &ForecastConfig) -> Result<RunOutput, AppError> {
    let tables = load_input_tables(&config.daily_csv, &config.monthly_csv, &config.billing_csv)?;
    run_with_tables(config, tables)
}

/// Run the pipeline over already-loaded tables.
pub fn run_with_tables(config: &ForecastConfig, tables: InputTables) -> Result<RunOutput, AppError> {
    let temps = DailyTemperatures::from_records(&tables.daily.records);
    info!(days = temps.len(), "daily temperatures aggregated");

    let cycles = build_cycle_samples(&tables.billing.records, &temps, config.sample_policy)?;
    info!(
        samples = cycles.samples.len(),
        skipped = cycles.skipped.len(),
        "cycle samples built"
    );

    let fitted = QuadraticModel::fit(&cycles.samples)?;
    let (a, b, c) = fitted.model.coefficients();
    info!(a, b, c, rmse = fitted.quality.rmse, "usage curve fitted");

    if config.require_convex {
        fitted.model.ensure_convex()?;
    } else if !fitted.model.is_convex() {
        warn!(a, "fitted curve is not convex; cheap/expensive labels may be inverted");
    }

    let rates = compute_provider_rates(&tables.billing.records)?;
    info!(providers = rates.len(), "provider rates computed");

    let forecaster = Forecaster::new(fitted.model, rates, tables.monthly.clone());

    Ok(RunOutput {
        tables,
        temps,
        cycles,
        fitted,
        forecaster,
    })
}
