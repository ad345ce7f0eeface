//! Pre-simulation initial-motion fitting.
//!
//! Queries earlier than the first stored orientation sample are answered by
//! an affine (or, with the acceleration term, quadratic) model anchored at
//! the first stored time. Its parameters come either from the first stored
//! velocity sample or from an ordinary least-squares fit over the leading
//! window of samples, using the closed-form simple-linear-regression sums.

use nalgebra::Vector3;

use crate::constants::{REGRESSION_DENOMINATOR_FLOOR, SimTime};
use crate::sphexp_errors::SphexpError;

/// Fitted motion parameters used before the stored domain.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InitialMotion {
    /// Per-axis slope. Without an intercept this is the constant
    /// pre-simulation velocity.
    pub slope: Vector3<f64>,
    /// Per-axis intercept, present only in acceleration mode.
    pub intercept: Option<Vector3<f64>>,
}

impl InitialMotion {
    /// Centre displacement relative to the first stored sample, for a
    /// (negative) offset `dt` from the domain start.
    pub fn centre_offset(&self, dt: SimTime) -> Vector3<f64> {
        match self.intercept {
            Some(intercept) => dt * (self.slope * dt + intercept),
            None => dt * self.slope,
        }
    }

    /// Velocity of the model at offset `dt` from the domain start.
    pub fn velocity(&self, dt: SimTime) -> Vector3<f64> {
        match self.intercept {
            Some(intercept) => self.slope * dt + intercept,
            None => self.slope,
        }
    }
}

/// Ordinary least-squares slope (and optionally intercept) of three series
/// against time, over the leading `window` samples.
///
/// The window is clamped to the stored sample count, so the fit never reads
/// past the series. A time variance below
/// [`REGRESSION_DENOMINATOR_FLOOR`] means the samples describe a vertical
/// line and the fit is rejected.
pub(crate) fn fit_initial_motion(
    times: &[SimTime],
    series: [&[f64]; 3],
    window: usize,
    with_intercept: bool,
) -> Result<InitialMotion, SphexpError> {
    let n = window.min(times.len());
    if n < window {
        tracing::warn!(
            "regression window {window} exceeds the {} stored samples; clamping",
            times.len()
        );
    }

    let mut sum_t = 0.0;
    let mut sum_t2 = 0.0;
    let mut sum_axis = [0.0; 3];
    let mut sum_cross = [0.0; 3];
    for i in 0..n {
        let t = times[i];
        sum_t += t;
        sum_t2 += t * t;
        for (axis, values) in series.iter().enumerate() {
            sum_axis[axis] += values[i];
            sum_cross[axis] += t * values[i];
        }
    }

    let samples = n as f64;
    let t_mean = sum_t / samples;
    let denominator = sum_t2 - sum_t * t_mean;
    if denominator.abs() < REGRESSION_DENOMINATOR_FLOOR {
        return Err(SphexpError::DegenerateRegression(denominator));
    }

    let slope = Vector3::from_fn(|axis, _| {
        (sum_cross[axis] - sum_t * (sum_axis[axis] / samples)) / denominator
    });
    let intercept = with_intercept
        .then(|| Vector3::from_fn(|axis, _| sum_axis[axis] / samples - slope[axis] * t_mean));

    Ok(InitialMotion { slope, intercept })
}

#[cfg(test)]
mod test_extrapolation {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_slope_and_intercept() {
        let times: Vec<f64> = (0..2000).map(|i| i as f64 * 0.01).collect();
        let x: Vec<f64> = times.iter().map(|t| 2.0 * t + 5.0).collect();
        let y: Vec<f64> = times.iter().map(|t| -0.5 * t + 1.0).collect();
        let z: Vec<f64> = times.iter().map(|t| 3.0 * t).collect();

        let fit = fit_initial_motion(&times, [&x, &y, &z], 2000, true).unwrap();
        assert_relative_eq!(fit.slope.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(fit.slope.y, -0.5, epsilon = 1e-9);
        assert_relative_eq!(fit.slope.z, 3.0, epsilon = 1e-9);
        let intercept = fit.intercept.unwrap();
        assert_relative_eq!(intercept.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(intercept.y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(intercept.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identical_times_are_degenerate() {
        let times = vec![1.0; 50];
        let series = vec![3.0; 50];
        let result = fit_initial_motion(&times, [&series, &series, &series], 50, false);
        assert!(matches!(result, Err(SphexpError::DegenerateRegression(_))));
    }

    #[test]
    fn test_window_clamps_to_sample_count() {
        let times: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let x: Vec<f64> = times.iter().map(|t| 4.0 * t + 1.0).collect();
        let fit = fit_initial_motion(&times, [&x, &x, &x], 2000, false).unwrap();
        assert_relative_eq!(fit.slope.x, 4.0, epsilon = 1e-9);
        assert!(fit.intercept.is_none());
    }

    #[test]
    fn test_affine_and_quadratic_models() {
        let affine = InitialMotion {
            slope: Vector3::new(2.0, 0.0, 0.0),
            intercept: None,
        };
        assert_relative_eq!(affine.centre_offset(-3.0).x, -6.0);
        assert_relative_eq!(affine.velocity(-3.0).x, 2.0);

        let quadratic = InitialMotion {
            slope: Vector3::new(2.0, 0.0, 0.0),
            intercept: Some(Vector3::new(4.0, 0.0, 0.0)),
        };
        // centre = dt*(slope*dt + intercept), velocity = slope*dt + intercept
        assert_relative_eq!(quadratic.centre_offset(-3.0).x, -3.0 * (-6.0 + 4.0));
        assert_relative_eq!(quadratic.velocity(-3.0).x, -2.0);
    }
}
