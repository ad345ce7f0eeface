//! # Reference-frame centre table
//!
//! Owns the time series of the expansion centre (and optionally its
//! velocity) written by the producing simulation, and resamples both at
//! arbitrary query times. With no trajectory file configured the table stays
//! **inertial**: the centre is pinned to the origin with zero velocity for
//! all time, and every query short-circuits.
//!
//! Unlike the coefficient grid the trajectory file is not guaranteed to be
//! evenly sampled, so the table measures its spacing at load and picks the
//! constant-time or binary-search index policy accordingly.
//!
//! Queries earlier than the first stored sample do not use the index
//! machinery at all in linear mode: when velocity data is available they are
//! answered by the pre-fit [`extrapolation`] model, and otherwise they fail
//! explicitly rather than guessing. Curve-fit tables instead follow their
//! fitted curves wherever the query lands.

pub(crate) mod extrapolation;
pub mod reader;

use itertools::Itertools;
use nalgebra::Vector3;

use crate::config::{InterpolationKind, ResampleConfig};
use crate::constants::{EVEN_SPACING_TOLERANCE, SimTime};
use crate::sphexp_errors::SphexpError;
use crate::spline::CubicSpline;
use crate::time_index::{self, TimeBracket};

use extrapolation::InitialMotion;

/// Interpolation machinery chosen at construction.
#[derive(Debug, Clone)]
enum CentreEvaluator {
    Linear,
    CurveFit {
        position: Box<[CubicSpline; 3]>,
        velocity: Option<Box<[CubicSpline; 3]>>,
    },
}

/// Time series of the expansion centre, inertial by default.
#[derive(Debug, Clone)]
pub struct OrientationTable {
    inertial: bool,
    evenly_spaced: bool,
    times: Vec<SimTime>,
    positions: [Vec<f64>; 3],
    velocities: Option<[Vec<f64>; 3]>,
    initial_motion: Option<InitialMotion>,
    evaluator: CentreEvaluator,
}

impl Default for OrientationTable {
    fn default() -> Self {
        Self::inertial()
    }
}

impl OrientationTable {
    /// The degenerate table: centre fixed at the origin, zero velocity,
    /// for all time.
    pub fn inertial() -> Self {
        OrientationTable {
            inertial: true,
            evenly_spaced: true,
            times: Vec::new(),
            positions: Default::default(),
            velocities: None,
            initial_motion: None,
            evaluator: CentreEvaluator::Linear,
        }
    }

    /// Build the table from the configured trajectory file.
    ///
    /// With no path configured this is a non-fatal no-op returning the
    /// inertial table. A configured path that cannot be opened is fatal.
    pub fn from_file(config: &ResampleConfig) -> Result<Self, SphexpError> {
        let Some(path) = &config.orient_file else {
            tracing::debug!("no orientation file configured; keeping the inertial centre");
            return Ok(Self::inertial());
        };
        let raw = reader::read_orient_file(path, config.velocity_columns)?;
        Self::from_parts(raw.times, raw.positions, raw.velocities, config)
    }

    /// Build a table from series the caller already owns.
    ///
    /// Arguments
    /// -----------------
    /// * `times`: strictly increasing time axis, at least two samples.
    /// * `positions`: per-axis centre series, one value per time sample.
    /// * `velocities`: per-axis velocity series, or `None` when the
    ///   trajectory carries no velocity data.
    /// * `config`: resampling configuration; selects the interpolation
    ///   strategy and the pre-simulation fit.
    ///
    /// Return
    /// ----------
    /// * The immutable table. Configuration and fit failures (degenerate
    ///   regression included) abort construction; no partial table escapes.
    pub fn from_parts(
        times: Vec<SimTime>,
        positions: [Vec<f64>; 3],
        velocities: Option<[Vec<f64>; 3]>,
        config: &ResampleConfig,
    ) -> Result<Self, SphexpError> {
        config.validate()?;

        if times.len() < 2 {
            return Err(SphexpError::NotEnoughSamples(times.len()));
        }
        for i in 1..times.len() {
            if times[i] <= times[i - 1] {
                return Err(SphexpError::NonMonotonicTimeAxis(i));
            }
        }
        for series in positions.iter().chain(velocities.iter().flatten()) {
            if series.len() != times.len() {
                return Err(SphexpError::DimensionMismatch(format!(
                    "{} series values against {} time samples",
                    series.len(),
                    times.len()
                )));
            }
        }

        // evenly spaced unless some gap strays from the first by more than
        // the tolerance
        let dt = times[1] - times[0];
        let evenly_spaced = times
            .iter()
            .tuple_windows()
            .all(|(a, b)| (b - a - dt).abs() <= dt * EVEN_SPACING_TOLERANCE);

        let initial_motion = match &velocities {
            Some(velocity_series) => Some(Self::fit_initial_motion(
                &times,
                &positions,
                velocity_series,
                config,
            )?),
            None => None,
        };

        let evaluator = match config.interpolation {
            InterpolationKind::Linear => CentreEvaluator::Linear,
            InterpolationKind::CurveFit => CentreEvaluator::CurveFit {
                position: Box::new(fit_axis_curves(&times, &positions)?),
                velocity: match &velocities {
                    Some(series) => Some(Box::new(fit_axis_curves(&times, series)?)),
                    None => None,
                },
            },
        };

        Ok(OrientationTable {
            inertial: false,
            evenly_spaced,
            times,
            positions,
            velocities,
            initial_motion,
            evaluator,
        })
    }

    fn fit_initial_motion(
        times: &[SimTime],
        positions: &[Vec<f64>; 3],
        velocities: &[Vec<f64>; 3],
        config: &ResampleConfig,
    ) -> Result<InitialMotion, SphexpError> {
        if !config.backward_extrapolation {
            // default: the stored velocity sample at the domain start
            return Ok(InitialMotion {
                slope: Vector3::new(velocities[0][0], velocities[1][0], velocities[2][0]),
                intercept: None,
            });
        }
        // regression over the leading window; the acceleration model fits the
        // velocity channel, the affine model fits the positions themselves
        let channel = if config.acceleration_term {
            velocities
        } else {
            positions
        };
        extrapolation::fit_initial_motion(
            times,
            [&channel[0], &channel[1], &channel[2]],
            config.regression_window,
            config.acceleration_term,
        )
    }

    /// Centre of the reference frame at the query time.
    ///
    /// Return
    /// ----------
    /// * The centre 3-vector. Fails with [`SphexpError::TimeBeforeDomain`]
    ///   when the query precedes the stored domain in linear mode and no
    ///   velocity data is available to extrapolate with.
    pub fn centre_at(&self, time: SimTime) -> Result<Vector3<f64>, SphexpError> {
        if self.inertial {
            return Ok(Vector3::zeros());
        }
        match &self.evaluator {
            CentreEvaluator::CurveFit { position, .. } => Ok(eval_axis_curves(position, time)),
            CentreEvaluator::Linear => {
                if time < self.times[0] {
                    let Some(motion) = &self.initial_motion else {
                        return Err(SphexpError::TimeBeforeDomain(time));
                    };
                    let dt = time - self.times[0];
                    return Ok(self.first_position() + motion.centre_offset(dt));
                }
                let bracket = self.resolve(time);
                Ok(self.blend(&self.positions, bracket, time))
            }
        }
    }

    /// Centre velocity at the query time.
    ///
    /// Return
    /// ----------
    /// * The velocity 3-vector, zero for inertial tables. Fails with
    ///   [`SphexpError::VelocityUnavailable`] when the table carries no
    ///   velocity series.
    pub fn velocity_at(&self, time: SimTime) -> Result<Vector3<f64>, SphexpError> {
        if self.inertial {
            return Ok(Vector3::zeros());
        }
        match &self.evaluator {
            CentreEvaluator::CurveFit {
                velocity: Some(curves),
                ..
            } => Ok(eval_axis_curves(curves, time)),
            CentreEvaluator::CurveFit { velocity: None, .. } => {
                Err(SphexpError::VelocityUnavailable)
            }
            CentreEvaluator::Linear => {
                let Some(velocities) = &self.velocities else {
                    return Err(SphexpError::VelocityUnavailable);
                };
                if time < self.times[0] {
                    let Some(motion) = &self.initial_motion else {
                        return Err(SphexpError::TimeBeforeDomain(time));
                    };
                    return Ok(motion.velocity(time - self.times[0]));
                }
                let bracket = self.resolve(time);
                Ok(self.blend(velocities, bracket, time))
            }
        }
    }

    fn resolve(&self, time: SimTime) -> TimeBracket {
        if self.evenly_spaced {
            time_index::resolve_uniform(&self.times, time)
        } else {
            time_index::resolve_monotonic(&self.times, time)
        }
    }

    fn blend(&self, series: &[Vec<f64>; 3], bracket: TimeBracket, time: SimTime) -> Vector3<f64> {
        let (w1, w2) = time_index::blend_weights(&self.times, bracket, time);
        Vector3::from_fn(|axis, _| {
            w1 * series[axis][bracket.index] + w2 * series[axis][bracket.index + 1]
        })
    }

    fn first_position(&self) -> Vector3<f64> {
        Vector3::new(
            self.positions[0][0],
            self.positions[1][0],
            self.positions[2][0],
        )
    }

    /// True when no trajectory file was supplied.
    pub fn is_inertial(&self) -> bool {
        self.inertial
    }

    /// True when the stored axis passed the even-spacing check.
    pub fn evenly_spaced(&self) -> bool {
        self.evenly_spaced
    }

    /// True when the table carries velocity series.
    pub fn has_velocity(&self) -> bool {
        self.inertial || self.velocities.is_some()
    }

    /// Number of stored time samples (zero for inertial tables).
    pub fn num_time_samples(&self) -> usize {
        self.times.len()
    }

    /// The stored time axis (empty for inertial tables).
    pub fn times(&self) -> &[SimTime] {
        &self.times
    }
}

fn fit_axis_curves(
    times: &[SimTime],
    series: &[Vec<f64>; 3],
) -> Result<[CubicSpline; 3], SphexpError> {
    Ok([
        CubicSpline::fit(times, &series[0])?,
        CubicSpline::fit(times, &series[1])?,
        CubicSpline::fit(times, &series[2])?,
    ])
}

fn eval_axis_curves(curves: &[CubicSpline; 3], time: SimTime) -> Vector3<f64> {
    Vector3::new(curves[0].eval(time), curves[1].eval(time), curves[2].eval(time))
}

#[cfg(test)]
mod test_orientation_table {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_series(times: &[f64], slope: f64, offset: f64) -> Vec<f64> {
        times.iter().map(|t| slope * t + offset).collect()
    }

    fn basic_config() -> ResampleConfig {
        ResampleConfig::default()
    }

    #[test]
    fn test_even_spacing_detection() {
        let config = basic_config();
        let positions = |times: &[f64]| {
            [
                linear_series(times, 1.0, 0.0),
                linear_series(times, 0.0, 0.0),
                linear_series(times, 0.0, 0.0),
            ]
        };

        let times = vec![0.0, 1.0, 2.0, 3.0];
        let table =
            OrientationTable::from_parts(times.clone(), positions(&times), None, &config).unwrap();
        assert!(table.evenly_spaced());

        let times = vec![0.0, 1.0, 2.5];
        let table =
            OrientationTable::from_parts(times.clone(), positions(&times), None, &config).unwrap();
        assert!(!table.evenly_spaced());
    }

    #[test]
    fn test_rejects_mismatched_series() {
        let result = OrientationTable::from_parts(
            vec![0.0, 1.0],
            [vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0]],
            None,
            &basic_config(),
        );
        assert!(matches!(result, Err(SphexpError::DimensionMismatch(_))));
    }

    #[test]
    fn test_pre_domain_without_velocity_fails() {
        let times = vec![0.0, 1.0, 2.0];
        let table = OrientationTable::from_parts(
            times.clone(),
            [
                linear_series(&times, 2.0, 0.0),
                linear_series(&times, 0.0, 0.0),
                linear_series(&times, 0.0, 0.0),
            ],
            None,
            &basic_config(),
        )
        .unwrap();
        assert_eq!(
            table.centre_at(-0.5).unwrap_err(),
            SphexpError::TimeBeforeDomain(-0.5)
        );
        // inside and after the domain the query succeeds
        assert!(table.centre_at(0.5).is_ok());
        assert!(table.centre_at(5.0).is_ok());
    }

    #[test]
    fn test_default_initial_motion_uses_first_velocity_sample() {
        let times = vec![0.0, 1.0, 2.0];
        let positions = [
            linear_series(&times, 1.0, 10.0),
            linear_series(&times, 0.0, 0.0),
            linear_series(&times, 0.0, 0.0),
        ];
        let velocities = [
            vec![7.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ];
        let table =
            OrientationTable::from_parts(times, positions, Some(velocities), &basic_config())
                .unwrap();

        // centre = cen[0] + dt * v[0], velocity constant at v[0]
        let centre = table.centre_at(-2.0).unwrap();
        assert_relative_eq!(centre.x, 10.0 + (-2.0) * 7.0, epsilon = 1e-12);
        let velocity = table.velocity_at(-2.0).unwrap();
        assert_relative_eq!(velocity.x, 7.0, epsilon = 1e-12);
    }
}
