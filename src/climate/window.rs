//! Daily mean temperatures and billing-cycle window averages.
//!
//! Billing periods rarely line up with calendar months, so each period's
//! temperature is the mean of the daily means that fall inside it
//! (both ends inclusive). The table is sorted once on construction and the
//! window is located by binary search.

use chrono::NaiveDate;

use crate::domain::DailyClimateRecord;
use crate::error::ForecastError;

/// Mean of the daily high and low.
pub fn daily_mean(record: &DailyClimateRecord) -> f64 {
    (record.high_temp + record.low_temp) / 2.0
}

/// Date-ordered table of daily mean temperatures.
#[derive(Debug, Clone, Default)]
pub struct DailyTemperatures {
    dates: Vec<NaiveDate>,
    means: Vec<f64>,
}

impl DailyTemperatures {
    /// Build the table from raw records.
    ///
    /// Records are sorted by date with a stable sort; duplicate dates are kept
    /// as separate entries.
    pub fn from_records(records: &[DailyClimateRecord]) -> Self {
        let mut rows: Vec<(NaiveDate, f64)> = records.iter().map(|r| (r.date, daily_mean(r))).collect();
        rows.sort_by_key(|(date, _)| *date);

        let (dates, means) = rows.into_iter().unzip();
        Self { dates, means }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First and last date covered, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Mean of the daily means with `start <= date <= end`.
    pub fn window_average(&self, start: NaiveDate, end: NaiveDate) -> Result<f64, ForecastError> {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end);

        if hi <= lo {
            return Err(ForecastError::EmptyWindow { start, end });
        }

        let window = &self.means[lo..hi];
        Ok(window.iter().sum::<f64>() / window.len() as f64)
    }
}
