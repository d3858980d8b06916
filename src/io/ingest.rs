//! CSV ingest and validation for the three input tables.
//!
//! - daily climate (`dates, highs, lows[, precip]`)
//! - monthly climatology (`Month, Average, StDev, 25th Pct, 75th Pct`)
//! - billing history (`Start Date, End Date, Usage, Bill, Provider`)
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No modeling logic here**: rows come out as plain domain records

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{BillingPeriod, DailyClimateRecord, MonthlyClimateStat, ProviderId};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed rows of one table plus whatever was rejected.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// All three input tables.
#[derive(Debug, Clone)]
pub struct InputTables {
    pub daily: Ingested<DailyClimateRecord>,
    pub monthly: Vec<MonthlyClimateStat>,
    pub billing: Ingested<BillingPeriod>,
}

const DAILY_DATE: &[&str] = &["dates", "date"];
const DAILY_HIGH: &[&str] = &["highs", "high"];
const DAILY_LOW: &[&str] = &["lows", "low"];

const MONTH_LABEL: &[&str] = &["month"];
const MONTH_MEAN: &[&str] = &["average", "mean"];
const MONTH_STDEV: &[&str] = &["stdev", "std_dev"];
const MONTH_P25: &[&str] = &["25th pct", "p25"];
const MONTH_P75: &[&str] = &["75th pct", "p75"];

const BILL_START: &[&str] = &["start date", "start_date"];
const BILL_END: &[&str] = &["end date", "end_date"];
const BILL_USAGE: &[&str] = &["usage"];
const BILL_AMOUNT: &[&str] = &["bill"];
const BILL_PROVIDER: &[&str] = &["provider"];

/// Load all three tables from disk.
pub fn load_input_tables(daily: &Path, monthly: &Path, billing: &Path) -> Result<InputTables, AppError> {
    Ok(InputTables {
        daily: read_daily_climate(open(daily)?)?,
        monthly: read_monthly_climate(open(monthly)?)?,
        billing: read_billing_history(open(billing)?)?,
    })
}

fn open(path: &Path) -> Result<File, AppError> {
    debug!(path = %path.display(), "opening CSV");
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

/// Parse the daily climate table.
pub fn read_daily_climate<R: Read>(reader: R) -> Result<Ingested<DailyClimateRecord>, AppError> {
    let table = Table::new(reader, "daily climate")?;
    let date_idx = table.require(DAILY_DATE)?;
    let high_idx = table.require(DAILY_HIGH)?;
    let low_idx = table.require(DAILY_LOW)?;

    table.parse_rows(|record| {
        Ok(DailyClimateRecord {
            date: parse_date(get_required(record, date_idx, "dates")?)?,
            high_temp: parse_f64(get_required(record, high_idx, "highs")?, "highs")?,
            low_temp: parse_f64(get_required(record, low_idx, "lows")?, "lows")?,
        })
    })
}

/// Parse the monthly climatology table. Exactly 12 rows, January first.
pub fn read_monthly_climate<R: Read>(reader: R) -> Result<Vec<MonthlyClimateStat>, AppError> {
    let table = Table::new(reader, "monthly climate")?;
    let label_idx = table.require(MONTH_LABEL)?;
    let mean_idx = table.require(MONTH_MEAN)?;
    let stdev_idx = table.find(MONTH_STDEV);
    let p25_idx = table.require(MONTH_P25)?;
    let p75_idx = table.require(MONTH_P75)?;

    let mut month = 0u32;
    let ingested = table.parse_rows(|record| {
        month += 1;
        Ok(MonthlyClimateStat {
            month,
            label: get_required(record, label_idx, "month")?.to_string(),
            mean_temp: parse_f64(get_required(record, mean_idx, "average")?, "average")?,
            std_dev: stdev_idx
                .and_then(|idx| get_optional(record, idx))
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite()),
            p25_temp: parse_f64(get_required(record, p25_idx, "25th pct")?, "25th pct")?,
            p75_temp: parse_f64(get_required(record, p75_idx, "75th pct")?, "75th pct")?,
        })
    })?;

    // Month numbers come from row position, so a bad row would shift every
    // following month. Treat any rejected row as fatal here.
    if let Some(first) = ingested.row_errors.first() {
        return Err(AppError::new(
            2,
            format!("Monthly climate CSV line {}: {}", first.line, first.message),
        ));
    }
    if ingested.records.len() != 12 {
        return Err(AppError::new(
            2,
            format!(
                "Monthly climate CSV must have exactly 12 rows (one per month), found {}.",
                ingested.records.len()
            ),
        ));
    }

    Ok(ingested.records)
}

/// Parse the billing history table.
pub fn read_billing_history<R: Read>(reader: R) -> Result<Ingested<BillingPeriod>, AppError> {
    let table = Table::new(reader, "billing history")?;
    let start_idx = table.require(BILL_START)?;
    let end_idx = table.require(BILL_END)?;
    let usage_idx = table.require(BILL_USAGE)?;
    let bill_idx = table.require(BILL_AMOUNT)?;
    let provider_idx = table.require(BILL_PROVIDER)?;

    table.parse_rows(|record| {
        let start_date = parse_date(get_required(record, start_idx, "start date")?)?;
        let end_date = parse_date(get_required(record, end_idx, "end date")?)?;
        if end_date < start_date {
            return Err(format!("End date {end_date} is before start date {start_date}."));
        }

        let usage_kwh = parse_f64(get_required(record, usage_idx, "usage")?, "usage")?;
        if usage_kwh < 0.0 {
            return Err("Negative `usage`.".to_string());
        }

        Ok(BillingPeriod {
            start_date,
            end_date,
            usage_kwh,
            billed_usd: parse_f64(get_required(record, bill_idx, "bill")?, "bill")?,
            provider: ProviderId::new(get_required(record, provider_idx, "provider")?),
        })
    })
}

/// A CSV reader with its normalized header map.
struct Table<R: Read> {
    name: &'static str,
    reader: csv::Reader<R>,
    header_map: HashMap<String, usize>,
}

impl<R: Read> Table<R> {
    fn new(reader: R, name: &'static str) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::new(2, format!("Failed to read {name} CSV headers: {e}")))?
            .clone();

        Ok(Self {
            name,
            reader,
            header_map: build_header_map(&headers),
        })
    }

    fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|a| self.header_map.get(*a).copied())
    }

    fn require(&self, aliases: &[&str]) -> Result<usize, AppError> {
        self.find(aliases).ok_or_else(|| {
            AppError::new(
                2,
                format!("Missing required column in {} CSV: `{}`", self.name, aliases[0]),
            )
        })
    }

    fn parse_rows<T>(
        mut self,
        mut parse: impl FnMut(&StringRecord) -> Result<T, String>,
    ) -> Result<Ingested<T>, AppError> {
        let mut records = Vec::new();
        let mut row_errors = Vec::new();
        let mut rows_read = 0usize;

        for (idx, result) in self.reader.records().enumerate() {
            // +2: records() starts after the header line, and lines are 1-based.
            let line = idx + 2;
            rows_read += 1;

            let parsed = result
                .map_err(|e| format!("CSV parse error: {e}"))
                .and_then(|record| parse(&record));

            match parsed {
                Ok(rec) => records.push(rec),
                Err(message) => {
                    warn!(table = self.name, line, %message, "skipping row");
                    row_errors.push(RowError { line, message });
                }
            }
        }

        if records.is_empty() {
            return Err(AppError::new(
                3,
                format!("No valid rows in {} CSV ({rows_read} read).", self.name),
            ));
        }

        debug!(table = self.name, rows_read, rows_used = records.len(), "ingested");
        Ok(Ingested {
            records,
            row_errors,
            rows_read,
        })
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    get_optional(record, idx).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // US month-first is what the utility and NOAA exports use; ISO forms are
    // accepted as well. Day-first formats are not, since they are ambiguous
    // with month-first.
    const FMTS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: MM/DD/YYYY, YYYY-MM-DD, YYYY/MM/DD."
    ))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{s}'.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_rows_parse_and_bad_rows_are_reported() {
        let csv = "\u{feff}dates,highs,lows,precip\n\
                   01/01/2020,55,35,0.00\n\
                   01/02/2020,M,36,T\n\
                   2020-01-03,60,40,\n";
        let out = read_daily_climate(csv.as_bytes()).unwrap();

        assert_eq!(out.rows_read, 3);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].date, day(2020, 1, 1));
        assert_eq!(out.records[1].date, day(2020, 1, 3));
        assert_eq!(out.row_errors.len(), 1);
        assert_eq!(out.row_errors[0].line, 3);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let err = read_daily_climate("dates,highs\n01/01/2020,55\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`lows`"));
    }

    #[test]
    fn table_without_valid_rows_fails() {
        let err = read_daily_climate("dates,highs,lows\nbad,1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn billing_rows_parse() {
        let csv = "Start Date,End Date,Usage,Bill,Provider\n\
                   01/01/2020,01/31/2020,900,81.50, TXU Energy \n\
                   02/15/2020,02/01/2020,800,70.00,TXU Energy\n";
        let out = read_billing_history(csv.as_bytes()).unwrap();

        assert_eq!(out.records.len(), 1);
        let p = &out.records[0];
        assert_eq!(p.duration_days(), 30);
        assert_eq!(p.usage_kwh, 900.0);
        assert_eq!(p.billed_usd, 81.5);
        assert_eq!(p.provider, ProviderId::from("TXU Energy"));

        assert_eq!(out.row_errors.len(), 1);
        assert!(out.row_errors[0].message.contains("before start date"));
    }

    #[test]
    fn negative_usage_is_a_row_error() {
        let csv = "Start Date,End Date,Usage,Bill,Provider\n\
                   01/01/2020,01/31/2020,-5,10.00,TXU\n\
                   02/01/2020,03/02/2020,0,0.00,TXU\n";
        let out = read_billing_history(csv.as_bytes()).unwrap();

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].usage_kwh, 0.0);
        assert_eq!(out.row_errors.len(), 1);
        assert_eq!(out.row_errors[0].line, 2);
        assert!(out.row_errors[0].message.contains("Negative `usage`"));
    }

    fn monthly_csv(rows: usize) -> String {
        let mut csv = String::from("Month,Average,StDev,25th Pct,75th Pct\n");
        for m in 1..=rows {
            csv.push_str(&format!("M{m},{},2.5,{},{}\n", 40 + m, 38 + m, 42 + m));
        }
        csv
    }

    #[test]
    fn monthly_table_needs_twelve_rows() {
        let months = read_monthly_climate(monthly_csv(12).as_bytes()).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].label, "M1");
        assert_eq!(months[11].mean_temp, 52.0);
        assert_eq!(months[11].p25_temp, 50.0);
        assert_eq!(months[11].std_dev, Some(2.5));

        let err = read_monthly_climate(monthly_csv(11).as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn monthly_stdev_column_is_optional() {
        let mut csv = String::from("month,mean,p25,p75\n");
        for m in 1..=12 {
            csv.push_str(&format!("M{m},50,48,52\n"));
        }
        let months = read_monthly_climate(csv.as_bytes()).unwrap();
        assert_eq!(months[3].std_dev, None);
        assert_eq!(months[3].month, 4);
    }
}
