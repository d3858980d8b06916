//! Write the fitted usage curve to JSON.
//!
//! The file carries the coefficients, vertex, fit quality and a precomputed
//! grid over the observed temperature range, so the curve can be plotted or
//! compared without re-running the fit.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::models::{FitQuality, FittedModel};

const GRID_POINTS: usize = 101;

#[derive(Debug, Clone, Serialize)]
pub struct CurveFile {
    pub tool: String,
    pub coefficients: Coefficients,
    /// `None` when the fit has no quadratic term.
    pub critical_point_f: Option<f64>,
    pub fit_quality: FitQuality,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveGrid {
    pub temp_f: Vec<f64>,
    pub usage_per_30d: Vec<f64>,
}

/// Assemble the JSON document for a fitted model over `temp_min..=temp_max`.
pub fn build_curve_file(fitted: &FittedModel, temp_min: f64, temp_max: f64) -> CurveFile {
    let (a, b, c) = fitted.model.coefficients();
    let (temp_f, usage_per_30d) = build_grid(fitted, temp_min, temp_max, GRID_POINTS);

    CurveFile {
        tool: "kwh".to_string(),
        coefficients: Coefficients { a, b, c },
        critical_point_f: fitted.model.critical_point().ok(),
        fit_quality: fitted.quality,
        grid: CurveGrid { temp_f, usage_per_30d },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, fitted: &FittedModel, temp_min: f64, temp_max: f64) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = build_curve_file(fitted, temp_min, temp_max);
    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

fn build_grid(fitted: &FittedModel, temp_min: f64, temp_max: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
    let n = n.max(2);
    let mut t0 = temp_min;
    let mut t1 = temp_max;
    if !(t0.is_finite() && t1.is_finite()) || t1 < t0 {
        t0 = 20.0;
        t1 = 100.0;
    }
    if (t1 - t0).abs() < 1e-9 {
        t0 -= 5.0;
        t1 += 5.0;
    }

    let mut temps = Vec::with_capacity(n);
    let mut usage = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = t0 + u * (t1 - t0);
        temps.push(t);
        usage.push(fitted.model.evaluate(t));
    }

    (temps, usage)
}
