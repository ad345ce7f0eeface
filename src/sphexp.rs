//! # Sphexp: simulation expansion context
//!
//! This module defines the [`Sphexp`] struct, the façade that wires together:
//!
//! 1. **Configuration** ([`ResampleConfig`](crate::config::ResampleConfig)) — one immutable
//!    value fixing the interpolation strategy and the orientation options.
//! 2. **Coefficient table** ([`CoefficientTable`](crate::coefficients::CoefficientTable)) —
//!    the dense spherical-harmonic grid, loaded from its binary file.
//! 3. **Orientation table** ([`OrientationTable`](crate::orientation::OrientationTable)) —
//!    the expansion-centre trajectory, loaded from its text file or left inertial.
//!
//! Both tables are built once, up front, and are immutable afterwards. Any
//! eager curve fit completes inside the constructor, so a `Sphexp` handed to
//! concurrent readers never mutates; queries need no locking.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use camino::Utf8Path;
//! use sphexp::{ResampleConfig, Sphexp};
//!
//! let config = ResampleConfig {
//!     orient_file: Some("run0.orient".into()),
//!     ..Default::default()
//! };
//! let model = Sphexp::new(Utf8Path::new("run0.coefs"), config)?;
//!
//! // one value snapshot per query time, ready for field evaluation
//! let snapshot = model.snapshot_at(1.25)?;
//! println!("centre at t=1.25: {}", snapshot.centre);
//! # Ok::<(), sphexp::SphexpError>(())
//! ```
//!
//! ## See also
//! ------------
//! * [`CoefficientTable`] – coefficient storage and resampling.
//! * [`OrientationTable`] – centre storage, resampling, pre-simulation model.
//! * [`ResampleConfig`] – the recognized options.

use camino::Utf8Path;
use nalgebra::{DMatrix, Vector3};

use crate::coefficients::CoefficientTable;
use crate::config::ResampleConfig;
use crate::constants::SimTime;
use crate::orientation::OrientationTable;
use crate::sphexp_errors::SphexpError;

/// The resampling context: configuration plus both tables.
#[derive(Debug, Clone)]
pub struct Sphexp {
    config: ResampleConfig,
    coefficients: CoefficientTable,
    orientation: OrientationTable,
}

/// Everything field evaluation needs at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSnapshot {
    /// The query time the snapshot was taken at.
    pub time: SimTime,
    /// Dense `(L+1)² × N` coefficient matrix.
    pub coefficients: DMatrix<f64>,
    /// Centre of the reference frame.
    pub centre: Vector3<f64>,
    /// Centre velocity, absent when the trajectory carries no velocity data.
    pub velocity: Option<Vector3<f64>>,
}

impl Sphexp {
    /// Construct the context from the coefficient file named by `path` and
    /// the orientation file named by the configuration.
    ///
    /// Arguments
    /// -----------------
    /// * `coefficient_file`: the binary coefficient file.
    /// * `config`: immutable options; validated before any file is touched.
    ///
    /// Return
    /// ----------
    /// * The ready-to-query context, or a [`SphexpError`]. Loading is all or
    ///   nothing; no partially built context is returned.
    pub fn new(coefficient_file: &Utf8Path, config: ResampleConfig) -> Result<Self, SphexpError> {
        config.validate()?;
        let coefficients = CoefficientTable::from_file(coefficient_file, config.interpolation)?;
        let orientation = OrientationTable::from_file(&config)?;
        Ok(Sphexp {
            config,
            coefficients,
            orientation,
        })
    }

    /// Wrap tables the caller built directly (for drivers that already hold
    /// the data in memory).
    pub fn from_tables(
        coefficients: CoefficientTable,
        orientation: OrientationTable,
        config: ResampleConfig,
    ) -> Result<Self, SphexpError> {
        config.validate()?;
        Ok(Sphexp {
            config,
            coefficients,
            orientation,
        })
    }

    /// Resample everything at one query time.
    ///
    /// The coefficient matrix is always produced; the velocity is `None`
    /// when the orientation table has no velocity series to answer with.
    pub fn snapshot_at(&self, time: SimTime) -> Result<ExpansionSnapshot, SphexpError> {
        let coefficients = self.coefficients.coefficients_at(time);
        let centre = self.orientation.centre_at(time)?;
        let velocity = if self.orientation.has_velocity() {
            Some(self.orientation.velocity_at(time)?)
        } else {
            None
        };
        Ok(ExpansionSnapshot {
            time,
            coefficients,
            centre,
            velocity,
        })
    }

    /// The coefficient table.
    pub fn coefficients(&self) -> &CoefficientTable {
        &self.coefficients
    }

    /// The orientation table.
    pub fn orientation(&self) -> &OrientationTable {
        &self.orientation
    }

    /// The configuration the context was built with.
    pub fn config(&self) -> &ResampleConfig {
        &self.config
    }
}
