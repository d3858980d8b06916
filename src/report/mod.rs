//! Reporting utilities: sample residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::CycleSample;
use crate::models::QuadraticModel;

/// A cycle sample with the model's fitted value.
#[derive(Debug, Clone)]
pub struct SampleResidual {
    pub sample: CycleSample,
    pub fitted: f64,
    pub residual: f64,
}

/// Fitted values and residuals for each cycle sample.
pub fn compute_residuals(samples: &[CycleSample], model: &QuadraticModel) -> Vec<SampleResidual> {
    samples
        .iter()
        .map(|s| {
            let fitted = model.evaluate(s.avg_temp);
            SampleResidual {
                sample: s.clone(),
                fitted,
                residual: s.normalized_usage - fitted,
            }
        })
        .collect()
}

/// The `top_n` samples the model misses by the most (absolute residual).
pub fn largest_misses(residuals: &[SampleResidual], top_n: usize) -> Vec<SampleResidual> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| b.residual.abs().total_cmp(&a.residual.abs()));
    sorted.truncate(top_n);
    sorted
}
