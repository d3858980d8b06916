//! Effective $/kWh per provider.
//!
//! The rate is the historical average price actually paid: total billed
//! divided by total usage over every period billed by that provider. This
//! assumes a fixed-rate plan; variable or spot-priced plans are not modeled.

use std::collections::BTreeMap;

use crate::domain::{BillingPeriod, ProviderId};
use crate::error::ForecastError;

/// Accumulated history for one provider.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProviderTotals {
    pub usage_kwh: f64,
    pub billed_usd: f64,
    pub periods: usize,
}

/// Provider rate table, ordered by provider id.
#[derive(Debug, Clone, Default)]
pub struct ProviderRates {
    providers: Vec<ProviderId>,
    entries: BTreeMap<ProviderId, (ProviderTotals, f64)>,
}

impl ProviderRates {
    /// Providers in listing order (stable, suitable for numbered menus).
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    pub fn rate(&self, provider: &ProviderId) -> Result<f64, ForecastError> {
        self.entries
            .get(provider)
            .map(|(_, rate)| *rate)
            .ok_or_else(|| ForecastError::UnknownProvider(provider.clone()))
    }

    pub fn totals(&self, provider: &ProviderId) -> Option<&ProviderTotals> {
        self.entries.get(provider).map(|(totals, _)| totals)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Accumulate usage/billed per provider in one pass and derive each rate.
pub fn compute_provider_rates(periods: &[BillingPeriod]) -> Result<ProviderRates, ForecastError> {
    let mut totals: BTreeMap<ProviderId, ProviderTotals> = BTreeMap::new();
    for p in periods {
        let t = totals.entry(p.provider.clone()).or_default();
        t.usage_kwh += p.usage_kwh;
        t.billed_usd += p.billed_usd;
        t.periods += 1;
    }

    let mut entries = BTreeMap::new();
    for (provider, t) in totals {
        if t.usage_kwh == 0.0 {
            return Err(ForecastError::ZeroUsage(provider));
        }
        let rate = t.billed_usd / t.usage_kwh;
        entries.insert(provider, (t, rate));
    }

    Ok(ProviderRates {
        providers: entries.keys().cloned().collect(),
        entries,
    })
}
