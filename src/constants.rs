//! # Constants and type definitions for sphexp
//!
//! This module centralizes the **numeric tolerances**, **defaults**, and **common type
//! definitions** used throughout the `sphexp` library.
//!
//! ## Overview
//!
//! - Spacing and regression tolerances used by the resampling engine
//! - Guard epsilons for the coordinate transforms
//! - Core type aliases used across the crate
//!
//! Times are dimensionless simulation times (virial units in the producing
//! simulation); no calendar time scale is involved anywhere in the crate.

// -------------------------------------------------------------------------------------------------
// Resampling tolerances and defaults
// -------------------------------------------------------------------------------------------------

/// Fractional tolerance on consecutive time-axis spacings. A time axis counts as
/// evenly spaced when every gap matches the first gap within this fraction.
pub const EVEN_SPACING_TOLERANCE: f64 = 0.1;

/// Floor on the time-variance denominator of the initial-motion regression.
/// Below this the fit is treated as a vertical line and rejected.
pub const REGRESSION_DENOMINATOR_FLOOR: f64 = 1e-7;

/// Default number of leading samples used by the initial-motion regression.
pub const DEFAULT_REGRESSION_WINDOW: usize = 2000;

// -------------------------------------------------------------------------------------------------
// Transform guards
// -------------------------------------------------------------------------------------------------

/// Small radius guard used by the coordinate transforms to avoid division by zero.
pub const RADIUS_EPS: f64 = 1e-12;

/// Radius below which the polar angle degenerates to its axis limit.
pub const POLE_RADIUS: f64 = 1e-10;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Dimensionless simulation time
pub type SimTime = f64;
