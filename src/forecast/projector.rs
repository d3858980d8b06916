//! Usage/cost projection for one month's temperature profile.
//!
//! Given a month's mean temperature and its 25th/75th percentile bounds, the
//! expected figure comes from the mean. For the range, whichever bound lies
//! farther from the curve's vertex is labeled expensive and the nearer one
//! cheap; ties label the upper bound expensive.
//!
//! The labeling assumes a convex fit (vertex is a minimum). On a concave fit
//! the two labels swap meaning; the fit stage warns about that (or rejects it
//! with `--require-convex`).

use crate::domain::ProjectionResult;
use crate::error::ForecastError;
use crate::models::QuadraticModel;

/// Project usage and cost at `avg_temp`, bounded by `lower_temp`/`upper_temp`.
pub fn project(
    model: &QuadraticModel,
    rate: f64,
    avg_temp: f64,
    lower_temp: f64,
    upper_temp: f64,
) -> Result<ProjectionResult, ForecastError> {
    let critical = model.critical_point()?;

    let (expensive_temp, cheap_temp) = if (lower_temp - critical).abs() > (upper_temp - critical).abs() {
        (lower_temp, upper_temp)
    } else {
        (upper_temp, lower_temp)
    };

    let expected_usage = model.evaluate(avg_temp);
    let expensive_usage = model.evaluate(expensive_temp);
    let cheap_usage = model.evaluate(cheap_temp);

    Ok(ProjectionResult {
        expected_usage,
        cheap_usage,
        expensive_usage,
        expected_cost: expected_usage * rate,
        cheap_cost: cheap_usage * rate,
        expensive_cost: expensive_usage * rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (T - 10)² + 100, vertex at 10.
    fn vertex_at_ten() -> QuadraticModel {
        QuadraticModel::from_coefficients(1.0, -20.0, 200.0)
    }

    #[test]
    fn tie_resolves_upper_bound_to_expensive() {
        let model = vertex_at_ten();
        let p = project(&model, 0.1, 10.0, 5.0, 15.0).unwrap();

        assert_eq!(p.expensive_usage, model.evaluate(15.0));
        assert_eq!(p.cheap_usage, model.evaluate(5.0));
        assert_eq!(p.expected_usage, 100.0);
    }

    #[test]
    fn farther_bound_is_expensive() {
        let model = vertex_at_ten();

        // Lower bound is farther from the vertex.
        let p = project(&model, 0.1, 8.0, 0.0, 14.0).unwrap();
        assert_eq!(p.expensive_usage, model.evaluate(0.0));
        assert_eq!(p.cheap_usage, model.evaluate(14.0));
        assert!(p.expensive_usage > p.cheap_usage);

        // Upper bound is farther from the vertex.
        let p = project(&model, 0.1, 20.0, 12.0, 30.0).unwrap();
        assert_eq!(p.expensive_usage, model.evaluate(30.0));
        assert_eq!(p.cheap_usage, model.evaluate(12.0));
    }

    #[test]
    fn costs_scale_usage_by_rate() {
        let model = vertex_at_ten();
        let p = project(&model, 0.125, 12.0, 6.0, 18.0).unwrap();

        assert_eq!(p.expected_cost, p.expected_usage * 0.125);
        assert_eq!(p.cheap_cost, p.cheap_usage * 0.125);
        assert_eq!(p.expensive_cost, p.expensive_usage * 0.125);
    }

    #[test]
    fn concave_fit_keeps_distance_labels() {
        // -(T - 10)² + 100: the vertex is a maximum, so the "expensive" bound
        // (farther from the vertex) ends up with the lower usage.
        let model = QuadraticModel::from_coefficients(-1.0, 20.0, 0.0);
        let p = project(&model, 0.1, 10.0, 0.0, 14.0).unwrap();

        assert_eq!(p.expensive_usage, model.evaluate(0.0));
        assert_eq!(p.cheap_usage, model.evaluate(14.0));
        assert!(p.expensive_usage < p.cheap_usage);
    }

    #[test]
    fn degenerate_model_propagates() {
        let model = QuadraticModel::from_coefficients(0.0, 3.0, 10.0);
        let err = project(&model, 0.1, 50.0, 45.0, 55.0).unwrap_err();
        assert!(matches!(err, ForecastError::DegenerateModel { .. }));
    }
}
