//! Query surface for the presentation layer.
//!
//! A `Forecaster` is assembled once (model fitted, rates computed, monthly
//! climatology loaded) and then answers any number of independent queries
//! through `&self`. It holds no session state.

use crate::billing::ProviderRates;
use crate::domain::{MonthlyClimateStat, ProjectionResult, ProviderId};
use crate::error::ForecastError;
use crate::forecast::project;
use crate::models::QuadraticModel;

/// Immutable fitted model + rate table + monthly climatology.
#[derive(Debug, Clone)]
pub struct Forecaster {
    model: QuadraticModel,
    rates: ProviderRates,
    months: Vec<MonthlyClimateStat>,
}

impl Forecaster {
    /// `months[i]` must describe calendar month `i + 1`.
    pub fn new(model: QuadraticModel, rates: ProviderRates, months: Vec<MonthlyClimateStat>) -> Self {
        Self { model, rates, months }
    }

    pub fn model(&self) -> &QuadraticModel {
        &self.model
    }

    pub fn rates(&self) -> &ProviderRates {
        &self.rates
    }

    pub fn list_providers(&self) -> &[ProviderId] {
        self.rates.providers()
    }

    pub fn get_provider_rate(&self, provider: &ProviderId) -> Result<f64, ForecastError> {
        self.rates.rate(provider)
    }

    /// Climatology for `month` (1-12).
    pub fn month_stat(&self, month: u32) -> Result<&MonthlyClimateStat, ForecastError> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidMonth(month));
        }
        self.months
            .get(month as usize - 1)
            .ok_or(ForecastError::InvalidMonth(month))
    }

    pub fn project_for_month(&self, provider: &ProviderId, month: u32) -> Result<ProjectionResult, ForecastError> {
        let stat = self.month_stat(month)?;
        let rate = self.get_provider_rate(provider)?;
        project(&self.model, rate, stat.mean_temp, stat.p25_temp, stat.p75_temp)
    }

    /// Projections for every month, in calendar order.
    pub fn project_year(
        &self,
        provider: &ProviderId,
    ) -> Result<Vec<(&MonthlyClimateStat, ProjectionResult)>, ForecastError> {
        (1..=12)
            .map(|month| Ok((self.month_stat(month)?, self.project_for_month(provider, month)?)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::billing::compute_provider_rates;
    use crate::domain::BillingPeriod;
    use chrono::NaiveDate;

    const LABELS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    pub(crate) fn sample_months() -> Vec<MonthlyClimateStat> {
        // Roughly North Texas: cold January, hot August.
        let means = [46.0, 50.0, 58.0, 66.0, 74.0, 82.0, 86.0, 86.0, 79.0, 68.0, 56.0, 47.0];
        means
            .iter()
            .enumerate()
            .map(|(i, &mean)| MonthlyClimateStat {
                month: i as u32 + 1,
                label: LABELS[i].to_string(),
                mean_temp: mean,
                std_dev: Some(3.0),
                p25_temp: mean - 2.0,
                p75_temp: mean + 2.0,
            })
            .collect()
    }

    pub(crate) fn sample_forecaster() -> Forecaster {
        let bill = |provider: &str, usage: f64, billed: f64| BillingPeriod {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
            usage_kwh: usage,
            billed_usd: billed,
            provider: ProviderId::from(provider),
        };
        let rates = compute_provider_rates(&[bill("TXU", 100.0, 10.0), bill("TXU", 200.0, 20.0)]).unwrap();
        // Vertex at 65°F, 600 kWh.
        let model = QuadraticModel::from_coefficients(1.0, -130.0, 4825.0);
        Forecaster::new(model, rates, sample_months())
    }

    #[test]
    fn lists_providers_and_rates() {
        let f = sample_forecaster();
        assert_eq!(f.list_providers(), &[ProviderId::from("TXU")]);
        assert_eq!(f.get_provider_rate(&ProviderId::from("TXU")).unwrap(), 0.10);
    }

    #[test]
    fn unknown_provider_fails() {
        let f = sample_forecaster();
        let err = f.get_provider_rate(&ProviderId::from("Ambit")).unwrap_err();
        assert_eq!(err, ForecastError::UnknownProvider(ProviderId::from("Ambit")));

        let err = f.project_for_month(&ProviderId::from("Ambit"), 7).unwrap_err();
        assert!(matches!(err, ForecastError::UnknownProvider(_)));
    }

    #[test]
    fn month_outside_range_fails() {
        let f = sample_forecaster();
        let txu = ProviderId::from("TXU");
        assert_eq!(f.project_for_month(&txu, 0).unwrap_err(), ForecastError::InvalidMonth(0));
        assert_eq!(f.project_for_month(&txu, 13).unwrap_err(), ForecastError::InvalidMonth(13));
    }

    #[test]
    fn projects_month_from_its_climatology() {
        let f = sample_forecaster();
        let p = f.project_for_month(&ProviderId::from("TXU"), 8).unwrap();

        // August: mean 86 -> (86-65)² + 600 = 1041.
        assert!((p.expected_usage - 1041.0).abs() < 1e-9);
        // Bounds 84/88: 88 is farther from 65, so it is the expensive side.
        assert!((p.expensive_usage - 1129.0).abs() < 1e-9);
        assert!((p.cheap_usage - 961.0).abs() < 1e-9);
        assert!((p.expected_cost - 104.1).abs() < 1e-9);
    }

    #[test]
    fn year_table_covers_every_month() {
        let f = sample_forecaster();
        let year = f.project_year(&ProviderId::from("TXU")).unwrap();
        assert_eq!(year.len(), 12);
        assert_eq!(year[0].0.label, "January");
        assert_eq!(year[11].0.month, 12);
        assert!(std::ptr::eq(year[6].0, f.month_stat(7).unwrap()));
    }
}
