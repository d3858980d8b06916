//! Affine rescaling of the regressor.
//!
//! Temperatures in °F sit around 30–90, so a raw `[T², T, 1]` design has
//! columns that differ by three orders of magnitude and are strongly
//! collinear. Fitting on `u = (T - center) / scale` keeps the design well
//! conditioned; coefficients are mapped back to raw units afterwards.

/// Maps `t` to `(t - center) / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub center: f64,
    pub scale: f64,
}

impl AxisScale {
    pub const IDENTITY: AxisScale = AxisScale {
        center: 0.0,
        scale: 1.0,
    };

    /// Center on the mean and scale by the half-range of `xs`.
    ///
    /// Falls back to a unit scale when the values are all equal (or empty).
    pub fn from_values(xs: &[f64]) -> Self {
        if xs.is_empty() {
            return Self::IDENTITY;
        }
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let (lo, hi) = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let half = (hi - lo) / 2.0;
        let scale = if half.is_finite() && half > 0.0 { half } else { 1.0 };
        Self { center: mean, scale }
    }

    pub fn forward(&self, t: f64) -> f64 {
        (t - self.center) / self.scale
    }

    pub fn inverse(&self, u: f64) -> f64 {
        self.center + u * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_inverse_agree() {
        let s = AxisScale::from_values(&[40.0, 60.0, 80.0]);
        assert_eq!(s.center, 60.0);
        assert_eq!(s.scale, 20.0);
        assert_eq!(s.forward(80.0), 1.0);
        assert!((s.inverse(s.forward(71.3)) - 71.3).abs() < 1e-12);
    }

    #[test]
    fn constant_values_use_unit_scale() {
        let s = AxisScale::from_values(&[55.0, 55.0]);
        assert_eq!(s.scale, 1.0);
    }
}
