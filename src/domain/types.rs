//! Shared domain types.
//!
//! These types are kept small and plain so they can be:
//!
//! - produced by the CSV loaders
//! - consumed by the core without any I/O concerns
//! - exported to JSON/CSV for inspection

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One day of climate observations (°F).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClimateRecord {
    pub date: NaiveDate,
    pub high_temp: f64,
    pub low_temp: f64,
}

/// Climatology for one calendar month (°F).
///
/// `month` is 1-based. The percentile fields bound the historical monthly
/// mean temperature and drive the cheap/expensive range of a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyClimateStat {
    pub month: u32,
    pub label: String,
    pub mean_temp: f64,
    pub std_dev: Option<f64>,
    pub p25_temp: f64,
    pub p75_temp: f64,
}

/// Identifier of an electricity provider (or plan).
///
/// Grouping is by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One utility bill.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub usage_kwh: f64,
    pub billed_usd: f64,
    pub provider: ProviderId,
}

impl BillingPeriod {
    /// Whole days between start and end (end exclusive).
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// A billing period paired with its window temperature and 30-day usage.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSample {
    pub period: BillingPeriod,
    pub avg_temp: f64,
    pub normalized_usage: f64,
}

/// Expected usage/cost for one (provider, month) query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub expected_usage: f64,
    pub cheap_usage: f64,
    pub expensive_usage: f64,
    pub expected_cost: f64,
    pub cheap_cost: f64,
    pub expensive_cost: f64,
}

/// What to do with a billing period whose sample cannot be built
/// (no overlapping climate data, or a non-positive duration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SamplePolicy {
    /// Exclude the period and log a warning.
    Skip,
    /// Abort the run with the first error.
    Fail,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and environment).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub daily_csv: PathBuf,
    pub monthly_csv: PathBuf,
    pub billing_csv: PathBuf,

    pub sample_policy: SamplePolicy,
    /// Reject concave fits instead of warning about them.
    pub require_convex: bool,
}
