//! Formatted terminal output.
//!
//! All console text lives here so the core stays free of presentation and
//! output changes are localized.

use crate::app::pipeline::RunOutput;
use crate::domain::{MonthlyClimateStat, ProjectionResult, ProviderId};
use crate::report::{SampleResidual, compute_residuals, largest_misses};

const RULE: &str = "----------------------------";

/// Format the fit summary (dataset stats, model, quality, rates).
pub fn format_fit_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== kwh - usage vs. temperature fit ===\n");
    match run.temps.date_range() {
        Some((first, last)) => out.push_str(&format!(
            "Daily climate: {} day(s) | {first} .. {last}\n",
            run.temps.len()
        )),
        None => out.push_str("Daily climate: none\n"),
    }
    out.push_str(&format!(
        "Billing periods: {} read | {} used | {} skipped\n",
        run.tables.billing.rows_read,
        run.cycles.samples.len(),
        run.cycles.skipped.len() + run.tables.billing.row_errors.len(),
    ));

    let row_errors = run
        .tables
        .daily
        .row_errors
        .iter()
        .map(|e| ("daily", e))
        .chain(run.tables.billing.row_errors.iter().map(|e| ("billing", e)));
    for (table, e) in row_errors {
        out.push_str(&format!("  ({table} CSV line {}) {}\n", e.line, e.message));
    }
    for s in &run.cycles.skipped {
        out.push_str(&format!(
            "  (skipped {}..{}) {}\n",
            s.period.start_date, s.period.end_date, s.error
        ));
    }

    let (a, b, c) = run.fitted.model.coefficients();
    out.push_str("\nModel: usage/30d = a*T^2 + b*T + c\n");
    out.push_str(&format!("- a = {a:.6}\n- b = {b:.6}\n- c = {c:.6}\n"));
    match run.fitted.model.critical_point() {
        Ok(t) => out.push_str(&format!(
            "- critical point: {t:.1} F ({:.0} kWh/30d){}\n",
            run.fitted.model.evaluate(t),
            if run.fitted.model.is_convex() { "" } else { " [maximum: curve is concave]" },
        )),
        Err(e) => out.push_str(&format!("- critical point: none ({e})\n")),
    }
    let q = &run.fitted.quality;
    out.push_str(&format!(
        "- fit: n={} SSE={:.1} RMSE={:.1} kWh R^2={:.4}\n",
        q.n, q.sse, q.rmse, q.r_squared
    ));

    let misses = largest_misses(&compute_residuals(&run.cycles.samples, &run.fitted.model), 3);
    if !misses.is_empty() {
        out.push_str("\nLargest misses:\n");
        out.push_str(&format_residual_table(&misses));
    }

    out.push_str("\nProvider rates:\n");
    let rates = run.forecaster.rates();
    for provider in rates.providers() {
        if let (Ok(rate), Some(t)) = (rates.rate(provider), rates.totals(provider)) {
            out.push_str(&format!(
                "- {:<24} ${rate:.3}/kWh ({} bill(s), {:.0} kWh, ${:.2})\n",
                truncate(provider.as_str(), 24),
                t.periods,
                t.usage_kwh,
                t.billed_usd
            ));
        }
    }

    out
}

fn format_residual_table(rows: &[SampleResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<10} {:>8} {:>10} {:>10} {:>10}\n",
        "start", "end", "temp", "usage", "fitted", "residual"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<10} {:-<8} {:-<10} {:-<10} {:-<10}\n",
        "", "", "", "", "", ""
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<10} {:<10} {:>8.1} {:>10.0} {:>10.0} {:>10.0}\n",
            r.sample.period.start_date,
            r.sample.period.end_date,
            r.sample.avg_temp,
            r.sample.normalized_usage,
            r.fitted,
            r.residual,
        ));
    }
    out
}

/// Numbered provider menu (1-based).
pub fn format_provider_menu(providers: &[ProviderId]) -> String {
    let mut out = String::new();
    for (idx, provider) in providers.iter().enumerate() {
        out.push_str(&format!("{:>3}) {provider}\n", idx + 1));
    }
    out
}

pub fn format_rate_line(provider: &ProviderId, rate: f64) -> String {
    format!("{provider}, Rate: ${rate:.3} per kWh")
}

/// Format a single month's projection.
pub fn format_projection(stat: &MonthlyClimateStat, p: &ProjectionResult) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Month: {}\n", stat.label));
    out.push_str(&format!(
        "\tExpected usage, cost: {:.0} kWh, ${:.2}\n",
        p.expected_usage, p.expected_cost
    ));
    out.push_str(&format!(
        "\tInner quartile usage, cost: {:.0}-{:.0} kWh, ${:.2}-${:.2}\n",
        p.cheap_usage, p.expensive_usage, p.cheap_cost, p.expensive_cost
    ));
    out
}

/// Format a 12-month projection table.
pub fn format_year_table(
    provider: &ProviderId,
    rate: f64,
    rows: &[(&MonthlyClimateStat, ProjectionResult)],
) -> String {
    let mut out = String::new();
    out.push_str(&format_rate_line(provider, rate));
    out.push('\n');
    out.push_str(&format!(
        "{:<10} {:>6} {:>8} {:>10} {:>17} {:>19}\n",
        "month", "temp", "kWh", "cost", "kWh range", "cost range"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<6} {:-<8} {:-<10} {:-<17} {:-<19}\n",
        "", "", "", "", "", ""
    ));

    let mut total_usage = 0.0;
    let mut total_cost = 0.0;
    for (stat, p) in rows {
        total_usage += p.expected_usage;
        total_cost += p.expected_cost;
        out.push_str(&format!(
            "{:<10} {:>6.1} {:>8.0} {:>10} {:>17} {:>19}\n",
            truncate(&stat.label, 10),
            stat.mean_temp,
            p.expected_usage,
            format!("${:.2}", p.expected_cost),
            format!("{:.0}-{:.0}", p.cheap_usage, p.expensive_usage),
            format!("${:.2}-${:.2}", p.cheap_cost, p.expensive_cost),
        ));
    }
    out.push_str(&format!(
        "{:<10} {:>6} {:>8.0} {:>10}\n",
        "total",
        "",
        total_usage,
        format!("${total_cost:.2}")
    ));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn january() -> MonthlyClimateStat {
        MonthlyClimateStat {
            month: 1,
            label: "January".to_string(),
            mean_temp: 46.0,
            std_dev: None,
            p25_temp: 44.0,
            p75_temp: 48.0,
        }
    }

    #[test]
    fn projection_block_matches_layout() {
        let p = ProjectionResult {
            expected_usage: 961.0,
            cheap_usage: 889.4,
            expensive_usage: 1041.2,
            expected_cost: 96.1,
            cheap_cost: 88.94,
            expensive_cost: 104.12,
        };
        let txt = format_projection(&january(), &p);
        let expected = concat!(
            "----------------------------\n",
            "Month: January\n",
            "\tExpected usage, cost: 961 kWh, $96.10\n",
            "\tInner quartile usage, cost: 889-1041 kWh, $88.94-$104.12\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn provider_menu_is_numbered_from_one() {
        let menu = format_provider_menu(&[ProviderId::from("Reliant"), ProviderId::from("TXU")]);
        assert_eq!(menu, "  1) Reliant\n  2) TXU\n");
    }

    #[test]
    fn rate_line() {
        assert_eq!(
            format_rate_line(&ProviderId::from("TXU"), 0.1234),
            "TXU, Rate: $0.123 per kWh"
        );
    }

    #[test]
    fn year_table_has_a_row_per_month_and_total() {
        let stat = january();
        let p = ProjectionResult {
            expected_usage: 1000.0,
            cheap_usage: 900.0,
            expensive_usage: 1100.0,
            expected_cost: 100.0,
            cheap_cost: 90.0,
            expensive_cost: 110.0,
        };
        let rows = vec![(&stat, p), (&stat, p)];
        let txt = format_year_table(&ProviderId::from("TXU"), 0.1, &rows);
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[3].starts_with("January"));
        assert!(lines[5].starts_with("total"));
        assert!(lines[5].ends_with("$200.00"));
    }
}
