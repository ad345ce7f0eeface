//! # Spherical-harmonic coefficient table
//!
//! Owns the dense `(time × harmonic × radial)` grid of expansion coefficients
//! written by the producing simulation and resamples it at arbitrary query
//! times. The table is built once by [`CoefficientTable::from_file`] (or
//! [`CoefficientTable::from_parts`] when the caller already holds the data)
//! and is immutable afterwards, so it can be shared freely across read-only
//! query threads.
//!
//! ## Interpolation strategies
//!
//! The strategy is fixed at construction:
//!
//! - [`InterpolationKind::Linear`] blends the two bracketing time planes with
//!   affine weights. Queries outside the stored window extrapolate along the
//!   boundary segment's slope.
//! - [`InterpolationKind::CurveFit`] fits one [`CubicSpline`] per
//!   (harmonic, radial) series at load time, so every query is an O(1)
//!   evaluation per series. Extrapolation follows the curve's own polynomial
//!   extension and is deliberately unguarded.
//!
//! The coefficient grid is produced on a fixed simulation time step, so index
//! resolution always uses the evenly-spaced policy.

pub mod reader;

use std::fmt;

use camino::Utf8Path;
use nalgebra::DMatrix;

use crate::config::InterpolationKind;
use crate::constants::SimTime;
use crate::sphexp_errors::SphexpError;
use crate::spline::CubicSpline;
use crate::time_index;

/// Interpolation machinery chosen at construction.
#[derive(Debug, Clone)]
enum Evaluator {
    Linear,
    /// One fitted curve per (harmonic, radial) series, harmonic-major.
    CurveFit(Vec<CubicSpline>),
}

/// Time series of spherical-harmonic expansion coefficients.
///
/// `grid[t]` is the `(L+1)² × N` coefficient plane at `times[t]`, with the
/// flattened harmonic index on rows and the radial order on columns.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    times: Vec<SimTime>,
    grid: Vec<DMatrix<f64>>,
    max_degree: usize,
    max_radial: usize,
    interpolation: InterpolationKind,
    evaluator: Evaluator,
}

impl CoefficientTable {
    /// Load a coefficient table from its binary file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: the coefficient file written by the simulation.
    /// * `interpolation`: strategy fixed for the table's lifetime. Curve-fit
    ///   triggers the eager per-series fit before this function returns.
    ///
    /// Return
    /// ----------
    /// * The immutable table, or a [`SphexpError`] when the file cannot be
    ///   opened, its header is malformed, or its content length disagrees
    ///   with the declared dimensions.
    pub fn from_file(
        path: &Utf8Path,
        interpolation: InterpolationKind,
    ) -> Result<Self, SphexpError> {
        let raw = reader::read_coefficient_file(path)?;
        Self::from_parts(raw.times, raw.grid, interpolation)
    }

    /// Build a table from data the caller already owns.
    ///
    /// Arguments
    /// -----------------
    /// * `times`: strictly increasing time axis, at least two samples.
    /// * `grid`: one `(L+1)² × N` plane per time sample, all identically shaped.
    /// * `interpolation`: strategy fixed for the table's lifetime.
    pub fn from_parts(
        times: Vec<SimTime>,
        grid: Vec<DMatrix<f64>>,
        interpolation: InterpolationKind,
    ) -> Result<Self, SphexpError> {
        if times.len() < 2 {
            return Err(SphexpError::NotEnoughSamples(times.len()));
        }
        if grid.len() != times.len() {
            return Err(SphexpError::DimensionMismatch(format!(
                "{} time samples against {} coefficient planes",
                times.len(),
                grid.len()
            )));
        }
        for i in 1..times.len() {
            if times[i] <= times[i - 1] {
                return Err(SphexpError::NonMonotonicTimeAxis(i));
            }
        }

        let (num_harmonics, max_radial) = (grid[0].nrows(), grid[0].ncols());
        if grid
            .iter()
            .any(|plane| plane.nrows() != num_harmonics || plane.ncols() != max_radial)
        {
            return Err(SphexpError::DimensionMismatch(
                "coefficient planes differ in shape".to_string(),
            ));
        }
        let side = (num_harmonics as f64).sqrt().round() as usize;
        if side == 0 || side * side != num_harmonics {
            return Err(SphexpError::DimensionMismatch(format!(
                "{num_harmonics} harmonic rows is not a perfect square"
            )));
        }
        if max_radial == 0 {
            return Err(SphexpError::DimensionMismatch(
                "no radial terms".to_string(),
            ));
        }

        let evaluator = match interpolation {
            InterpolationKind::Linear => Evaluator::Linear,
            InterpolationKind::CurveFit => {
                Evaluator::CurveFit(fit_series_curves(&times, &grid)?)
            }
        };

        Ok(CoefficientTable {
            times,
            grid,
            max_degree: side - 1,
            max_radial,
            interpolation,
            evaluator,
        })
    }

    /// Dense coefficient snapshot at the query time.
    ///
    /// The result is a `(L+1)² × N` matrix regardless of where the query
    /// falls; out-of-domain queries extrapolate according to the table's
    /// strategy.
    pub fn coefficients_at(&self, time: SimTime) -> DMatrix<f64> {
        match &self.evaluator {
            Evaluator::Linear => self.linear_at(time),
            Evaluator::CurveFit(curves) => self.curve_at(curves, time),
        }
    }

    fn linear_at(&self, time: SimTime) -> DMatrix<f64> {
        let bracket = time_index::resolve_uniform(&self.times, time);
        let (w1, w2) = time_index::blend_weights(&self.times, bracket, time);
        &self.grid[bracket.index] * w1 + &self.grid[bracket.index + 1] * w2
    }

    fn curve_at(&self, curves: &[CubicSpline], time: SimTime) -> DMatrix<f64> {
        DMatrix::from_fn(self.num_harmonics(), self.max_radial, |l, n| {
            curves[l * self.max_radial + n].eval(time)
        })
    }

    /// Number of stored time samples.
    pub fn num_time_samples(&self) -> usize {
        self.times.len()
    }

    /// Maximum expansion degree L.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Number of flattened (degree, order) pairs, `(L+1)²`.
    pub fn num_harmonics(&self) -> usize {
        (self.max_degree + 1) * (self.max_degree + 1)
    }

    /// Number of radial basis terms N.
    pub fn max_radial_order(&self) -> usize {
        self.max_radial
    }

    /// The stored time axis.
    pub fn times(&self) -> &[SimTime] {
        &self.times
    }

    /// Strategy this table was built with.
    pub fn interpolation(&self) -> InterpolationKind {
        self.interpolation
    }
}

/// One spline per (harmonic, radial) pair, fit against the full time axis.
fn fit_series_curves(
    times: &[SimTime],
    grid: &[DMatrix<f64>],
) -> Result<Vec<CubicSpline>, SphexpError> {
    let (num_harmonics, max_radial) = (grid[0].nrows(), grid[0].ncols());
    let mut curves = Vec::with_capacity(num_harmonics * max_radial);
    let mut series = vec![0.0; times.len()];
    for l in 0..num_harmonics {
        for n in 0..max_radial {
            for (t, plane) in grid.iter().enumerate() {
                series[t] = plane[(l, n)];
            }
            curves.push(CubicSpline::fit(times, &series)?);
        }
    }
    Ok(curves)
}

impl fmt::Display for CoefficientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 16;
        const VALUE_WIDTH: usize = 27;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );
        let rows = [
            ("Time samples", self.num_time_samples().to_string()),
            ("Max degree", self.max_degree.to_string()),
            ("Harmonic terms", self.num_harmonics().to_string()),
            ("Radial terms", self.max_radial.to_string()),
            (
                "Domain",
                format!("[{}, {}]", self.times[0], self.times[self.times.len() - 1]),
            ),
        ];

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$}| {:<value$}|",
            "Coefficients",
            "",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }
        writeln!(f, "{border}")
    }
}

#[cfg(test)]
mod test_coefficient_table {
    use super::*;

    fn plane(value: f64) -> DMatrix<f64> {
        DMatrix::from_element(1, 1, value)
    }

    #[test]
    fn test_from_parts_rejects_short_axis() {
        let result =
            CoefficientTable::from_parts(vec![0.0], vec![plane(1.0)], InterpolationKind::Linear);
        assert_eq!(result.unwrap_err(), SphexpError::NotEnoughSamples(1));
    }

    #[test]
    fn test_from_parts_rejects_non_monotonic_axis() {
        let result = CoefficientTable::from_parts(
            vec![0.0, 1.0, 1.0],
            vec![plane(1.0), plane(2.0), plane(3.0)],
            InterpolationKind::Linear,
        );
        assert_eq!(result.unwrap_err(), SphexpError::NonMonotonicTimeAxis(2));
    }

    #[test]
    fn test_from_parts_rejects_ragged_grid() {
        let result = CoefficientTable::from_parts(
            vec![0.0, 1.0],
            vec![plane(1.0), DMatrix::from_element(4, 2, 0.0)],
            InterpolationKind::Linear,
        );
        assert!(matches!(result, Err(SphexpError::DimensionMismatch(_))));
    }

    #[test]
    fn test_from_parts_rejects_non_square_harmonic_count() {
        let result = CoefficientTable::from_parts(
            vec![0.0, 1.0],
            vec![
                DMatrix::from_element(3, 1, 0.0),
                DMatrix::from_element(3, 1, 0.0),
            ],
            InterpolationKind::Linear,
        );
        assert!(matches!(result, Err(SphexpError::DimensionMismatch(_))));
    }

    #[test]
    fn test_degree_and_harmonics_derived_from_rows() {
        let planes = vec![
            DMatrix::from_element(9, 4, 0.0),
            DMatrix::from_element(9, 4, 1.0),
        ];
        let table =
            CoefficientTable::from_parts(vec![0.0, 1.0], planes, InterpolationKind::Linear)
                .unwrap();
        assert_eq!(table.max_degree(), 2);
        assert_eq!(table.num_harmonics(), 9);
        assert_eq!(table.max_radial_order(), 4);
    }

    #[test]
    fn test_display_summarizes_dimensions() {
        let planes = vec![plane(1.0), plane(2.0), plane(3.0)];
        let table = CoefficientTable::from_parts(
            vec![0.0, 1.0, 2.0],
            planes,
            InterpolationKind::Linear,
        )
        .unwrap();
        let rendered = format!("{table}");
        assert!(rendered.contains("Time samples"));
        assert!(rendered.contains("| 3"));
        assert!(rendered.contains("[0, 2]"));
    }
}
