//! Quadratic usage-vs-temperature model.
//!
//! Residential usage is roughly U-shaped in outdoor temperature: heating load
//! on the cold side, cooling load on the hot side, a minimum somewhere in
//! between. We fit
//!
//! ```text
//! usage(T) = a·T² + b·T + c
//! ```
//!
//! by least squares over the cycle samples. The fit is carried out in a
//! rescaled variable (see `math::scale`); the model keeps that form for
//! evaluation and reports `(a, b, c)` in raw °F units.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::domain::CycleSample;
use crate::error::ForecastError;
use crate::math::{AxisScale, solve_least_squares};

/// Minimum number of distinct temperatures for a degree-2 fit.
pub const MIN_DISTINCT_TEMPS: usize = 3;

/// Temperatures closer than this are counted as the same point.
const DISTINCT_EPS: f64 = 1e-9;

/// For fitted models, `a` is treated as zero when `|a|` is below this
/// fraction of `|b|, |c|` in the scaled variable.
const DEGENERATE_REL: f64 = 1e-12;

/// Fitted (or explicitly constructed) quadratic curve. Immutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticModel {
    axis: AxisScale,
    /// Coefficients of `q2·u² + q1·u + q0` with `u = axis.forward(T)`.
    q2: f64,
    q1: f64,
    q0: f64,
    /// Set by `fit`; the relative zero test on `q2` only makes sense when the
    /// coefficients are on a comparable scale.
    fitted: bool,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitQuality {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
}

/// Output of a fit: the model plus how well it explains the samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedModel {
    pub model: QuadraticModel,
    pub quality: FitQuality,
}

impl QuadraticModel {
    /// Build a model from raw-unit coefficients.
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Self {
        Self {
            axis: AxisScale::IDENTITY,
            q2: a,
            q1: b,
            q0: c,
            fitted: false,
        }
    }

    /// Least-squares fit over cycle samples (`avg_temp` → `normalized_usage`).
    pub fn fit(samples: &[CycleSample]) -> Result<FittedModel, ForecastError> {
        let points: Vec<(f64, f64)> = samples.iter().map(|s| (s.avg_temp, s.normalized_usage)).collect();
        Self::fit_points(&points)
    }

    /// Least-squares fit over `(temperature, usage)` pairs.
    pub fn fit_points(points: &[(f64, f64)]) -> Result<FittedModel, ForecastError> {
        let distinct = count_distinct(points.iter().map(|&(t, _)| t));
        if points.len() < MIN_DISTINCT_TEMPS || distinct < MIN_DISTINCT_TEMPS {
            return Err(ForecastError::InsufficientData {
                samples: points.len(),
                distinct,
            });
        }

        let temps: Vec<f64> = points.iter().map(|&(t, _)| t).collect();
        let axis = AxisScale::from_values(&temps);

        let n = points.len();
        let mut x = DMatrix::<f64>::zeros(n, 3);
        let mut y = DVector::<f64>::zeros(n);
        for (i, &(t, usage)) in points.iter().enumerate() {
            let u = axis.forward(t);
            x[(i, 0)] = u * u;
            x[(i, 1)] = u;
            x[(i, 2)] = 1.0;
            y[i] = usage;
        }

        let beta = solve_least_squares(&x, &y).ok_or(ForecastError::InsufficientData {
            samples: n,
            distinct,
        })?;

        let model = Self {
            axis,
            q2: beta[0],
            q1: beta[1],
            q0: beta[2],
            fitted: true,
        };
        let quality = model.quality(points);
        Ok(FittedModel { model, quality })
    }

    /// Raw-unit coefficients `(a, b, c)` of `a·T² + b·T + c`.
    pub fn coefficients(&self) -> (f64, f64, f64) {
        let m = self.axis.center;
        let s = self.axis.scale;
        let a = self.q2 / (s * s);
        let b = self.q1 / s - 2.0 * self.q2 * m / (s * s);
        let c = self.q2 * m * m / (s * s) - self.q1 * m / s + self.q0;
        (a, b, c)
    }

    /// Predicted 30-day usage at temperature `temp`.
    pub fn evaluate(&self, temp: f64) -> f64 {
        let u = self.axis.forward(temp);
        (self.q2 * u + self.q1) * u + self.q0
    }

    /// Temperature of the parabola's vertex, `-b / 2a`.
    pub fn critical_point(&self) -> Result<f64, ForecastError> {
        if self.is_degenerate() {
            let (a, _, _) = self.coefficients();
            return Err(ForecastError::DegenerateModel { a });
        }
        Ok(self.axis.inverse(-self.q1 / (2.0 * self.q2)))
    }

    /// True when the vertex is a minimum (`a > 0`).
    pub fn is_convex(&self) -> bool {
        !self.is_degenerate() && self.q2 > 0.0
    }

    /// Fail unless the curve opens upward.
    pub fn ensure_convex(&self) -> Result<(), ForecastError> {
        let (a, _, _) = self.coefficients();
        if self.is_degenerate() {
            return Err(ForecastError::DegenerateModel { a });
        }
        if self.q2 < 0.0 {
            return Err(ForecastError::NonConvexModel { a });
        }
        Ok(())
    }

    fn is_degenerate(&self) -> bool {
        if self.q2 == 0.0 {
            return true;
        }
        if !self.fitted {
            return false;
        }
        let reference = self.q1.abs().max(self.q0.abs());
        self.q2.abs() <= DEGENERATE_REL * reference
    }

    fn quality(&self, points: &[(f64, f64)]) -> FitQuality {
        let n = points.len();
        let mean = points.iter().map(|&(_, y)| y).sum::<f64>() / n as f64;

        let mut sse = 0.0;
        let mut sst = 0.0;
        for &(t, y) in points {
            let r = y - self.evaluate(t);
            sse += r * r;
            sst += (y - mean) * (y - mean);
        }

        FitQuality {
            n,
            sse,
            rmse: (sse / n as f64).sqrt(),
            r_squared: if sst > 0.0 { 1.0 - sse / sst } else { 1.0 },
        }
    }
}

fn count_distinct(temps: impl Iterator<Item = f64>) -> usize {
    let mut sorted: Vec<f64> = temps.collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| (*a - *b).abs() <= DISTINCT_EPS);
    sorted.len()
}
