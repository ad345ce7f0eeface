pub mod coefficients;
pub mod config;
pub mod constants;
pub mod orientation;
pub mod sphexp;
pub mod sphexp_errors;
pub mod spline;
pub mod transform;

mod time_index;

pub use crate::coefficients::CoefficientTable;
pub use crate::config::{InterpolationKind, ResampleConfig};
pub use crate::orientation::OrientationTable;
pub use crate::sphexp::{ExpansionSnapshot, Sphexp};
pub use crate::sphexp_errors::SphexpError;
