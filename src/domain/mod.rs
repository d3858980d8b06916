//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records (`DailyClimateRecord`, `MonthlyClimateStat`, `BillingPeriod`)
//! - derived values (`CycleSample`, `ProjectionResult`)
//! - run configuration (`ForecastConfig`, `SamplePolicy`)

pub mod types;

pub use types::*;
