//! Usage normalization and cycle sample construction.
//!
//! Bills cover anywhere from ~25 to ~35 days, so raw kWh are not comparable
//! across periods. Usage is rescaled to a 30-day basis and paired with the
//! mean temperature of the same window.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::climate::DailyTemperatures;
use crate::domain::{BillingPeriod, CycleSample, SamplePolicy};
use crate::error::ForecastError;

/// Length of the normalized billing period.
pub const NORMALIZED_DAYS: f64 = 30.0;

/// A billing period that was excluded from the sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPeriod {
    /// Position of the period in the input slice.
    pub index: usize,
    pub period: BillingPeriod,
    pub error: ForecastError,
}

/// Samples ready for fitting, plus whatever was excluded on the way.
#[derive(Debug, Clone, Default)]
pub struct CycleSamples {
    pub samples: Vec<CycleSample>,
    pub skipped: Vec<SkippedPeriod>,
}

/// Rescale `usage` over `start..end` to a 30-day period.
pub fn normalize_usage(usage: f64, start: NaiveDate, end: NaiveDate) -> Result<f64, ForecastError> {
    let days = (end - start).num_days();
    if days <= 0 {
        return Err(ForecastError::InvalidPeriod { start, end, days });
    }
    Ok(usage / (days as f64 / NORMALIZED_DAYS))
}

fn build_sample(period: &BillingPeriod, temps: &DailyTemperatures) -> Result<CycleSample, ForecastError> {
    let normalized_usage = normalize_usage(period.usage_kwh, period.start_date, period.end_date)?;
    let avg_temp = temps.window_average(period.start_date, period.end_date)?;
    Ok(CycleSample {
        period: period.clone(),
        avg_temp,
        normalized_usage,
    })
}

/// Pair every billing period with its window temperature and 30-day usage.
///
/// With `SamplePolicy::Skip`, periods that fail are logged and reported in
/// `CycleSamples::skipped`; with `SamplePolicy::Fail` the first failure is
/// returned.
pub fn build_cycle_samples(
    periods: &[BillingPeriod],
    temps: &DailyTemperatures,
    policy: SamplePolicy,
) -> Result<CycleSamples, ForecastError> {
    let mut out = CycleSamples {
        samples: Vec::with_capacity(periods.len()),
        skipped: Vec::new(),
    };

    for (index, period) in periods.iter().enumerate() {
        match build_sample(period, temps) {
            Ok(sample) => {
                debug!(
                    start = %period.start_date,
                    end = %period.end_date,
                    avg_temp = sample.avg_temp,
                    usage_per_30d = sample.normalized_usage,
                    "cycle sample"
                );
                out.samples.push(sample);
            }
            Err(error) => match policy {
                SamplePolicy::Fail => return Err(error),
                SamplePolicy::Skip => {
                    warn!(index, %error, "skipping billing period");
                    out.skipped.push(SkippedPeriod {
                        index,
                        period: period.clone(),
                        error,
                    });
                }
            },
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyClimateRecord, ProviderId};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(start: NaiveDate, end: NaiveDate, usage: f64) -> BillingPeriod {
        BillingPeriod {
            start_date: start,
            end_date: end,
            usage_kwh: usage,
            billed_usd: usage * 0.1,
            provider: ProviderId::from("TXU"),
        }
    }

    fn january_temps() -> DailyTemperatures {
        let records: Vec<DailyClimateRecord> = (1..=31)
            .map(|d| DailyClimateRecord {
                date: day(2020, 1, d),
                high_temp: 60.0,
                low_temp: 40.0,
            })
            .collect();
        DailyTemperatures::from_records(&records)
    }

    #[test]
    fn thirty_day_period_is_unchanged() {
        let v = normalize_usage(900.0, day(2020, 1, 1), day(2020, 1, 31)).unwrap();
        assert_eq!(v, 900.0);
    }

    #[test]
    fn doubling_duration_halves_normalized_usage() {
        let short = normalize_usage(600.0, day(2020, 3, 1), day(2020, 3, 16)).unwrap();
        let long = normalize_usage(600.0, day(2020, 3, 1), day(2020, 3, 31)).unwrap();
        assert!((short - 2.0 * long).abs() < 1e-9);

        let doubled_usage = normalize_usage(1200.0, day(2020, 3, 1), day(2020, 3, 31)).unwrap();
        assert!((doubled_usage - 2.0 * long).abs() < 1e-9);
    }

    #[test]
    fn zero_length_period_is_rejected() {
        let err = normalize_usage(100.0, day(2020, 1, 5), day(2020, 1, 5)).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidPeriod { days: 0, .. }));
    }

    #[test]
    fn reversed_period_is_rejected() {
        let err = normalize_usage(100.0, day(2020, 1, 10), day(2020, 1, 5)).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InvalidPeriod {
                start: day(2020, 1, 10),
                end: day(2020, 1, 5),
                days: -5,
            }
        );
    }

    #[test]
    fn skip_policy_excludes_periods_without_climate_data() {
        let periods = vec![
            period(day(2020, 1, 1), day(2020, 1, 31), 900.0),
            period(day(2021, 6, 1), day(2021, 6, 30), 1500.0),
        ];
        let out = build_cycle_samples(&periods, &january_temps(), SamplePolicy::Skip).unwrap();

        assert_eq!(out.samples.len(), 1);
        assert_eq!(out.samples[0].avg_temp, 50.0);
        assert_eq!(out.samples[0].normalized_usage, 900.0);

        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].index, 1);
        assert!(matches!(out.skipped[0].error, ForecastError::EmptyWindow { .. }));
    }

    #[test]
    fn fail_policy_returns_first_error() {
        let periods = vec![
            period(day(2020, 1, 10), day(2020, 1, 10), 10.0),
            period(day(2021, 6, 1), day(2021, 6, 30), 1500.0),
        ];
        let err = build_cycle_samples(&periods, &january_temps(), SamplePolicy::Fail).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidPeriod { .. }));
    }
}
