//! Stateless coordinate and force-vector transforms.
//!
//! Downstream field evaluation works in the basis' natural spherical or
//! cylindrical frame and converts to cartesian at the end. These helpers hold
//! no table state; they guard the coordinate singularities (origin, polar
//! axis) with small epsilons and map NaN force inputs to zero.

use nalgebra::Vector3;

use crate::constants::{POLE_RADIUS, RADIUS_EPS};

/// Cartesian `(x, y)` to cylindrical `(r, phi)`.
pub fn cartesian_to_cylindrical(x: f64, y: f64) -> (f64, f64) {
    ((x * x + y * y).sqrt(), y.atan2(x))
}

/// Cylindrical `(r, phi)` to cartesian `(x, y)`.
pub fn cylindrical_to_cartesian(r: f64, phi: f64) -> (f64, f64) {
    (r * phi.cos(), r * phi.sin())
}

/// Cartesian position to spherical `(r, phi, theta)`.
///
/// `phi` is the azimuth in `(-pi, pi]`, `theta` the polar angle measured from
/// the +z axis. On the polar axis the azimuth is ill defined; the radius is
/// floored at [`RADIUS_EPS`] and near the origin `theta` collapses to the
/// hemisphere limit.
pub fn cartesian_to_spherical(position: &Vector3<f64>) -> (f64, f64, f64) {
    let r = position.norm().max(RADIUS_EPS);
    let phi = (position.y + RADIUS_EPS).atan2(position.x + RADIUS_EPS);
    let theta = if r < POLE_RADIUS {
        if position.z < 0.0 {
            -std::f64::consts::FRAC_PI_2
        } else {
            std::f64::consts::FRAC_PI_2
        }
    } else {
        (position.z / r).acos()
    };
    (r, phi, theta)
}

/// Spherical `(r, phi, theta)` to cartesian position.
pub fn spherical_to_cartesian(r: f64, phi: f64, theta: f64) -> Vector3<f64> {
    Vector3::new(
        r * theta.sin() * phi.cos(),
        r * theta.sin() * phi.sin(),
        r * theta.cos(),
    )
}

/// Cylindrical force components `(fr, fp)` at `(r, phi)` to cartesian
/// `(fx, fy)`. NaN inputs yield a zero force.
pub fn cylindrical_forces_to_cartesian(r: f64, phi: f64, fr: f64, fp: f64) -> (f64, f64) {
    if fr.is_nan() || fp.is_nan() {
        return (0.0, 0.0);
    }
    let (x, y) = cylindrical_to_cartesian(r, phi);
    ((x * fr - y * fp) / r, (y * fr + x * fp) / r)
}

/// Spherical force components `(fr, fp, ft)` at `(r, phi, theta)` to a
/// cartesian force vector. NaN radial input yields a zero force.
pub fn spherical_forces_to_cartesian(
    r3: f64,
    phi: f64,
    theta: f64,
    fr: f64,
    fp: f64,
    ft: f64,
) -> Vector3<f64> {
    if fr.is_nan() {
        return Vector3::zeros();
    }
    let r = r3.max(RADIUS_EPS);
    let position = spherical_to_cartesian(r, phi, theta);
    let (x, y, z) = (position.x, position.y, position.z);
    let r2 = (x * x + y * y + RADIUS_EPS).sqrt().max(RADIUS_EPS);
    let r_cubed = r * r * r;

    Vector3::new(
        -((fr * (x / r) - ft * (x * z / r_cubed)) + fp * (y / (r2 * r2))),
        -((fr * (y / r) - ft * (y * z / r_cubed)) - fp * (x / (r2 * r2))),
        -(fr * (z / r) + ft * ((r2 * r2) / r_cubed)),
    )
}

#[cfg(test)]
mod test_transform {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cylindrical_round_trip() {
        let (r, phi) = cartesian_to_cylindrical(3.0, -4.0);
        assert_relative_eq!(r, 5.0, epsilon = 1e-12);
        let (x, y) = cylindrical_to_cartesian(r, phi);
        assert_relative_eq!(x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(y, -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spherical_round_trip() {
        let position = Vector3::new(1.2, -0.7, 2.4);
        let (r, phi, theta) = cartesian_to_spherical(&position);
        let back = spherical_to_cartesian(r, phi, theta);
        for axis in 0..3 {
            assert_relative_eq!(back[axis], position[axis], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_polar_axis_does_not_blow_up() {
        let (r, _phi, theta) = cartesian_to_spherical(&Vector3::new(0.0, 0.0, 0.0));
        assert!(r >= RADIUS_EPS);
        assert_relative_eq!(theta, std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_nan_forces_map_to_zero() {
        let (fx, fy) = cylindrical_forces_to_cartesian(1.0, 0.3, f64::NAN, 0.1);
        assert_eq!((fx, fy), (0.0, 0.0));
        let force = spherical_forces_to_cartesian(1.0, 0.3, 1.0, f64::NAN, 0.1, 0.2);
        assert_eq!(force, Vector3::zeros());
    }

    #[test]
    fn test_purely_radial_force_points_inward() {
        // a positive radial component maps to an attractive cartesian force
        let force = spherical_forces_to_cartesian(
            2.0,
            0.0,
            std::f64::consts::FRAC_PI_2,
            1.0,
            0.0,
            0.0,
        );
        assert!(force.x < 0.0);
        assert_relative_eq!(force.y, 0.0, epsilon = 1e-9);
    }
}
