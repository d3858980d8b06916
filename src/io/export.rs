//! Export per-cycle samples to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets: one row per
//! billing period that made it into the fit, with the model's fitted value.

use std::io::Write;
use std::path::Path;

use crate::domain::CycleSample;
use crate::error::AppError;
use crate::models::QuadraticModel;

const HEADER: [&str; 9] = [
    "start_date",
    "end_date",
    "provider",
    "days",
    "usage_kwh",
    "avg_temp_f",
    "usage_per_30d",
    "fitted",
    "residual",
];

/// Write cycle samples (and fitted values) to a CSV file.
pub fn write_samples_csv(path: &Path, samples: &[CycleSample], model: &QuadraticModel) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_samples(file, samples, model)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_samples<W: Write>(out: W, samples: &[CycleSample], model: &QuadraticModel) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;

    for s in samples {
        let p = &s.period;
        let fitted = model.evaluate(s.avg_temp);
        wtr.write_record([
            p.start_date.to_string(),
            p.end_date.to_string(),
            p.provider.as_str().to_string(),
            p.duration_days().to_string(),
            format!("{:.3}", p.usage_kwh),
            format!("{:.3}", s.avg_temp),
            format!("{:.3}", s.normalized_usage),
            format!("{fitted:.3}"),
            format!("{:.3}", s.normalized_usage - fitted),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillingPeriod, ProviderId};
    use chrono::NaiveDate;

    fn sample(provider: &str) -> CycleSample {
        CycleSample {
            period: BillingPeriod {
                start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
                usage_kwh: 900.0,
                billed_usd: 90.0,
                provider: ProviderId::from(provider),
            },
            avg_temp: 50.0,
            normalized_usage: 900.0,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let model = QuadraticModel::from_coefficients(0.0, 0.0, 850.0);

        let mut buf = Vec::new();
        write_samples(&mut buf, &[sample("Reliant, 12mo")], &model).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(
            lines[1],
            "2020-01-01,2020-01-31,\"Reliant, 12mo\",30,900.000,50.000,900.000,850.000,50.000"
        );
    }

    #[test]
    fn awkward_provider_names_read_back_intact() {
        let model = QuadraticModel::from_coefficients(0.0, 0.0, 850.0);
        let names = ["TXU\rEnergy", "Say \"hi\"", "line\nbreak", "plain"];
        let samples: Vec<CycleSample> = names.iter().map(|n| sample(n)).collect();

        let mut buf = Vec::new();
        write_samples(&mut buf, &samples, &model).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), names.len());
        for (row, name) in rows.iter().zip(names) {
            assert_eq!(row.len(), HEADER.len());
            assert_eq!(&row[2], name);
        }
    }
}
