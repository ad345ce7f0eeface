//! Natural cubic spline, the curve primitive behind curve-fit interpolation.
//!
//! [`CubicSpline::fit`] consumes an ordered sample set once and returns a
//! continuous curve evaluable at any time, [`CubicSpline::eval`] is O(log n)
//! in the knot count and allocation free. Outside the knot span the boundary
//! segment's cubic polynomial is extended as is; callers who need bounded
//! extrapolation must interpolate linearly instead.
//!
//! The fit solves the standard tridiagonal system for the interior second
//! derivatives with natural boundary conditions (zero curvature at both
//! ends), then stores per-segment polynomial coefficients.

use crate::sphexp_errors::SphexpError;

/// A fitted cubic curve over an ordered set of knots.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    knots: Vec<f64>,
    /// Per-segment `[a, b, c, d]` such that
    /// `S(t) = a + b·dx + c·dx² + d·dx³` with `dx = t - knots[i]`.
    coeffs: Vec<[f64; 4]>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through `(knots[i], values[i])`.
    ///
    /// Arguments
    /// -----------------
    /// * `knots`: strictly increasing sample positions, at least two.
    /// * `values`: sample values, one per knot.
    ///
    /// Return
    /// ----------
    /// * The fitted curve, or a [`SphexpError`] when the inputs are too short,
    ///   mismatched in length, or not strictly increasing.
    pub fn fit(knots: &[f64], values: &[f64]) -> Result<Self, SphexpError> {
        let n = knots.len();
        if n < 2 {
            return Err(SphexpError::NotEnoughSamples(n));
        }
        if values.len() != n {
            return Err(SphexpError::DimensionMismatch(format!(
                "{} knots against {} values",
                n,
                values.len()
            )));
        }
        for i in 1..n {
            if knots[i] <= knots[i - 1] {
                return Err(SphexpError::NonMonotonicTimeAxis(i));
            }
        }

        let second_derivatives = solve_natural_system(knots, values);

        let mut coeffs = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let h = knots[i + 1] - knots[i];
            let (m0, m1) = (second_derivatives[i], second_derivatives[i + 1]);
            let a = values[i];
            let b = (values[i + 1] - values[i]) / h - h * (2.0 * m0 + m1) / 6.0;
            let c = m0 / 2.0;
            let d = (m1 - m0) / (6.0 * h);
            coeffs.push([a, b, c, d]);
        }

        Ok(CubicSpline {
            knots: knots.to_vec(),
            coeffs,
        })
    }

    /// Evaluate the curve at `t`, extending the boundary polynomial beyond
    /// the knot span.
    pub fn eval(&self, t: f64) -> f64 {
        let segment = if t <= self.knots[0] {
            0
        } else {
            // largest segment whose left knot does not exceed t
            (self.knots.partition_point(|&k| k <= t) - 1).min(self.coeffs.len() - 1)
        };
        let dx = t - self.knots[segment];
        let [a, b, c, d] = self.coeffs[segment];
        a + dx * (b + dx * (c + dx * d))
    }

    /// Knot span of the fitted curve as `(first, last)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }
}

/// Interior second derivatives of the natural spline, by the Thomas
/// algorithm. First and last entries are pinned to zero.
fn solve_natural_system(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let n = knots.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    // tridiagonal rows for the n-2 interior unknowns
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    for i in 1..n - 1 {
        let h_prev = knots[i] - knots[i - 1];
        let h_next = knots[i + 1] - knots[i];
        diag[i] = 2.0 * (h_prev + h_next);
        upper[i] = h_next;
        rhs[i] = 6.0
            * ((values[i + 1] - values[i]) / h_next - (values[i] - values[i - 1]) / h_prev);
    }

    // forward elimination
    for i in 2..n - 1 {
        let lower = knots[i] - knots[i - 1];
        let factor = lower / diag[i - 1];
        diag[i] -= factor * upper[i - 1];
        rhs[i] -= factor * rhs[i - 1];
    }

    // back substitution
    m[n - 2] = rhs[n - 2] / diag[n - 2];
    for i in (1..n - 2).rev() {
        m[i] = (rhs[i] - upper[i] * m[i + 1]) / diag[i];
    }

    m
}

#[cfg(test)]
mod test_spline {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reproduces_knots_exactly() {
        let knots: Vec<f64> = (0..20).map(|i| 0.3 * i as f64).collect();
        let values: Vec<f64> = knots.iter().map(|t| (1.7 * t).sin() + 0.2 * t).collect();
        let spline = CubicSpline::fit(&knots, &values).unwrap();
        for (t, v) in knots.iter().zip(values.iter()) {
            assert_relative_eq!(spline.eval(*t), *v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_linear_data_stays_linear_everywhere() {
        let knots = [0.0, 1.0, 2.0, 3.0, 4.0];
        let values: Vec<f64> = knots.iter().map(|t| 2.0 * t + 5.0).collect();
        let spline = CubicSpline::fit(&knots, &values).unwrap();
        // interior, knot, and extrapolated evaluations all follow the line
        for &t in &[-2.0, 0.0, 0.4, 1.5, 3.9, 4.0, 6.5] {
            assert_relative_eq!(spline.eval(t), 2.0 * t + 5.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_two_knots_degenerate_to_segment() {
        let spline = CubicSpline::fit(&[1.0, 3.0], &[10.0, 20.0]).unwrap();
        assert_relative_eq!(spline.eval(2.0), 15.0, epsilon = 1e-12);
        assert_relative_eq!(spline.eval(0.0), 5.0, epsilon = 1e-12);
        assert_relative_eq!(spline.eval(4.0), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolant_is_smooth_at_interior_knot() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, 1.0, 0.0, 1.0];
        let spline = CubicSpline::fit(&knots, &values).unwrap();
        let eps = 1e-6;
        // first derivative is continuous across the knot
        let left = (spline.eval(1.0) - spline.eval(1.0 - eps)) / eps;
        let right = (spline.eval(1.0 + eps) - spline.eval(1.0)) / eps;
        assert_relative_eq!(left, right, epsilon = 1e-4);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert_eq!(
            CubicSpline::fit(&[0.0], &[1.0]),
            Err(SphexpError::NotEnoughSamples(1))
        );
        assert!(matches!(
            CubicSpline::fit(&[0.0, 1.0], &[1.0]),
            Err(SphexpError::DimensionMismatch(_))
        ));
        assert_eq!(
            CubicSpline::fit(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(SphexpError::NonMonotonicTimeAxis(2))
        );
    }
}
