use camino::Utf8PathBuf;
use thiserror::Error;

use crate::orientation::reader::ParseOrientError;

#[derive(Error, Debug)]
pub enum SphexpError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Orientation file not found at: {0}")]
    OrientFileNotFound(Utf8PathBuf),

    #[error("Invalid interpolation kind: {0}")]
    InvalidInterpolationKind(String),

    #[error("Malformed coefficient header: {0}")]
    MalformedHeader(String),

    #[error("Coefficient file length mismatch: expected {expected} bytes after the header, found {actual}")]
    CoefficientSizeMismatch { expected: usize, actual: usize },

    #[error("Error parsing orientation file line {line}: {source}")]
    MalformedOrientLine {
        line: usize,
        source: ParseOrientError,
    },

    #[error("Orientation file declares {expected} samples but contains {actual} data lines")]
    OrientLineCountMismatch { expected: usize, actual: usize },

    #[error("Time axis must be strictly increasing (violated at sample {0})")]
    NonMonotonicTimeAxis(usize),

    #[error("Table needs at least two time samples, found {0}")]
    NotEnoughSamples(usize),

    #[error("Series length does not match the time axis: {0}")]
    DimensionMismatch(String),

    #[error("Initial-motion regression is degenerate: time variance {0:e} is below threshold")]
    DegenerateRegression(f64),

    #[error("Acceleration extrapolation requires backward extrapolation to be enabled")]
    AccelerationWithoutBackward,

    #[error("Time {0} precedes the stored domain and no velocity data is available")]
    TimeBeforeDomain(f64),

    #[error("Velocity requested but the orientation table carries no velocity series")]
    VelocityUnavailable,
}

impl PartialEq for SphexpError {
    fn eq(&self, other: &Self) -> bool {
        use SphexpError::*;
        match (self, other) {
            // not comparable by payload, equal if same variant
            (IoError(_), IoError(_)) => true,

            (OrientFileNotFound(a), OrientFileNotFound(b)) => a == b,
            (InvalidInterpolationKind(a), InvalidInterpolationKind(b)) => a == b,
            (MalformedHeader(a), MalformedHeader(b)) => a == b,
            (
                CoefficientSizeMismatch {
                    expected: a,
                    actual: b,
                },
                CoefficientSizeMismatch {
                    expected: c,
                    actual: d,
                },
            ) => a == c && b == d,
            (
                MalformedOrientLine { line: a, source: b },
                MalformedOrientLine { line: c, source: d },
            ) => a == c && b == d,
            (
                OrientLineCountMismatch {
                    expected: a,
                    actual: b,
                },
                OrientLineCountMismatch {
                    expected: c,
                    actual: d,
                },
            ) => a == c && b == d,
            (NonMonotonicTimeAxis(a), NonMonotonicTimeAxis(b)) => a == b,
            (NotEnoughSamples(a), NotEnoughSamples(b)) => a == b,
            (DimensionMismatch(a), DimensionMismatch(b)) => a == b,
            (DegenerateRegression(a), DegenerateRegression(b)) => a == b,
            (TimeBeforeDomain(a), TimeBeforeDomain(b)) => a == b,

            // unit variants
            (AccelerationWithoutBackward, AccelerationWithoutBackward) => true,
            (VelocityUnavailable, VelocityUnavailable) => true,

            _ => false,
        }
    }
}
