//! # Resampling configuration
//!
//! All behaviour switches of the resampling engine live in one immutable
//! [`ResampleConfig`] value handed over at table construction. Evaluators are
//! pure functions of (table, configuration, query time); nothing is toggled
//! after a table exists.
//!
//! ## Recognized options
//!
//! | Option | Effect |
//! |---|---|
//! | `interpolation` | [`InterpolationKind::Linear`] (bounded segment extrapolation) or [`InterpolationKind::CurveFit`] (eager fit, unbounded extrapolation) |
//! | `orient_file` | empty ⇒ inertial centre, always-zero centre and velocity |
//! | `velocity_columns` | whether the orientation file carries 7 vs 4 tokens per line |
//! | `backward_extrapolation` | regression-fit slope/intercept instead of the first stored velocity sample |
//! | `acceleration_term` | quadratic pre-simulation model (requires backward extrapolation) |
//! | `regression_window` | leading samples used by the regression fit |

use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REGRESSION_WINDOW;
use crate::sphexp_errors::SphexpError;

/// Interpolation strategy, selected once at table construction and fixed for
/// the table's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationKind {
    /// Affine blend across the bracketing interval. Out-of-domain queries
    /// extrapolate along the boundary segment's slope.
    #[default]
    Linear,
    /// One continuous curve per stored series, fitted eagerly at load.
    /// Out-of-domain queries follow the curve's own polynomial extension.
    CurveFit,
}

impl FromStr for InterpolationKind {
    type Err = SphexpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolationKind::Linear),
            "curve-fit" | "curvefit" => Ok(InterpolationKind::CurveFit),
            _ => Err(SphexpError::InvalidInterpolationKind(s.to_string())),
        }
    }
}

/// Immutable configuration for the coefficient and orientation tables.
///
/// The default value reproduces the behaviour of a bare simulation read-back:
/// linear interpolation, inertial centre, velocity columns expected, no
/// backward extrapolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Interpolation strategy for both tables.
    pub interpolation: InterpolationKind,
    /// Orientation trajectory file. `None` keeps the centre inertial.
    pub orient_file: Option<Utf8PathBuf>,
    /// True when orientation lines carry velocity columns (7 tokens).
    pub velocity_columns: bool,
    /// Fit the pre-simulation motion by regression instead of taking the
    /// first stored velocity sample.
    pub backward_extrapolation: bool,
    /// Use the quadratic pre-simulation model. Only meaningful together with
    /// `backward_extrapolation`.
    pub acceleration_term: bool,
    /// Leading samples used by the regression fit; clamped to the stored
    /// sample count at fit time.
    pub regression_window: usize,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        ResampleConfig {
            interpolation: InterpolationKind::Linear,
            orient_file: None,
            velocity_columns: true,
            backward_extrapolation: false,
            acceleration_term: false,
            regression_window: DEFAULT_REGRESSION_WINDOW,
        }
    }
}

impl ResampleConfig {
    /// Reject option combinations that have no defined behaviour.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` for a usable configuration, or
    ///   [`SphexpError::AccelerationWithoutBackward`] when the quadratic
    ///   model is requested without the regression fit that feeds it.
    pub fn validate(&self) -> Result<(), SphexpError> {
        if self.acceleration_term && !self.backward_extrapolation {
            return Err(SphexpError::AccelerationWithoutBackward);
        }
        Ok(())
    }
}
