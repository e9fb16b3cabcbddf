//! # Heliocentric two-body ephemeris
//!
//! Propagates a body on its Keplerian orbit: given [`OrbitalElements`] and
//! a Julian Date, produces the heliocentric ecliptic position and velocity.
//!
//! The chain is the classical one: mean anomaly from the mean motion,
//! eccentric anomaly from [`crate::kepler::solve_kepler`], true anomaly
//! from the half-angle relation, perifocal coordinates, then the fixed
//! three-rotation composition `Rz(Ω)·Rx(i)·Rz(ω)` into the reference
//! frame. Nothing here is iterative besides the Kepler solve.
//!
//! ## Units
//!
//! - Positions: **AU**
//! - Velocities: **AU/day**
//! - Angles: **radians**

use nalgebra::{Rotation3, Vector3};

use crate::constants::{JulianDate, Radian};
use crate::kepler::{principal_angle, solve_kepler};
use crate::orbital_elements::{Body, OrbitalElements};
use crate::transit_errors::TransitError;

/// Heliocentric state of a body at a queried instant.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// Heliocentric ecliptic position (AU).
    pub position: Vector3<f64>,
    /// Heliocentric ecliptic velocity (AU/day).
    pub velocity: Vector3<f64>,
    /// Heliocentric distance (AU).
    pub distance: f64,
    /// True anomaly ν (radians, [0, 2π)).
    pub true_anomaly: Radian,
}

impl StateVector {
    /// State of a body pinned at the coordinate origin.
    fn at_origin() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            distance: 0.0,
            true_anomaly: 0.0,
        }
    }
}

/// Elementary rotation matrix about axis `k` (0 = x, 1 = y, 2 = z).
fn rotmt(alpha: f64, k: usize) -> Rotation3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha)
}

/// Perifocal → reference-frame rotation `Rz(Ω)·Rx(i)·Rz(ω)`.
fn perifocal_to_ecliptic(elements: &OrbitalElements) -> Rotation3<f64> {
    rotmt(elements.ascending_node_longitude, 2)
        * rotmt(elements.inclination, 0)
        * rotmt(elements.periapsis_argument, 2)
}

/// Propagate a body to the given Julian Date.
///
/// Arguments
/// ---------
/// * `elements`: the body's Keplerian element set.
/// * `jd`: query instant (Julian Date, UTC scale).
///
/// Return
/// ------
/// * The heliocentric [`StateVector`] at `jd`.
///
/// Errors
/// ------
/// * [`TransitError::InvalidTimeValue`] if `jd` is not finite.
/// * [`TransitError::InvalidOrbitalElements`] propagated from the Kepler
///   solver for out-of-domain elements.
///
/// Edge case: a body with `semi_major_axis = 0` (the Sun) short-circuits
/// to the origin without invoking the solver.
pub fn propagate(elements: &OrbitalElements, jd: JulianDate) -> Result<StateVector, TransitError> {
    if !jd.is_finite() {
        return Err(TransitError::InvalidTimeValue(jd));
    }
    if elements.is_fixed_at_origin() {
        return Ok(StateVector::at_origin());
    }

    let a = elements.semi_major_axis;
    let e = elements.eccentricity;

    let mean_anomaly = elements.mean_anomaly_at(jd);
    let ecc_anomaly = solve_kepler(mean_anomaly, e)?;

    let (sin_e, cos_e) = ecc_anomaly.sin_cos();
    let one_minus_e2_sqrt = (1.0 - e * e).sqrt();

    // ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))
    let true_anomaly = principal_angle(
        2.0 * ((1.0 + e).sqrt() * (ecc_anomaly / 2.0).sin())
            .atan2((1.0 - e).sqrt() * (ecc_anomaly / 2.0).cos()),
    );

    let distance = a * (1.0 - e * cos_e);

    // Perifocal coordinates, x toward periapsis: equivalent to (r·cosν, r·sinν).
    let perifocal_position = Vector3::new(a * (cos_e - e), a * one_minus_e2_sqrt * sin_e, 0.0);

    // Ė = n / (1 − e·cos E) from the derivative of Kepler's equation.
    let ecc_anomaly_rate = elements.mean_motion / (1.0 - e * cos_e);
    let perifocal_velocity = Vector3::new(
        -a * sin_e * ecc_anomaly_rate,
        a * one_minus_e2_sqrt * cos_e * ecc_anomaly_rate,
        0.0,
    );

    let rotation = perifocal_to_ecliptic(elements);

    Ok(StateVector {
        position: rotation * perifocal_position,
        velocity: rotation * perifocal_velocity,
        distance,
        true_anomaly,
    })
}

/// Propagate one of the built-in bodies to the given Julian Date.
pub fn body_position(body: Body, jd: JulianDate) -> Result<StateVector, TransitError> {
    propagate(&body.elements(), jd)
}

/// Angular separation between two direction vectors (radians, [0, π]).
///
/// The dot product is clamped before `acos` so nearly-parallel unit
/// vectors cannot produce NaN from rounding.
pub fn angular_separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Heliocentric ecliptic longitude of a position vector (radians, [0, 2π)).
pub fn ecliptic_longitude(position: &Vector3<f64>) -> Radian {
    principal_angle(position.y.atan2(position.x))
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use crate::constants::{DPI, JD_J2000};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn circular_elements(mean_anomaly_epoch: f64) -> OrbitalElements {
        OrbitalElements::new(1.0, 0.0, 0.0, 0.0, 0.0, mean_anomaly_epoch, 0.01, JD_J2000).unwrap()
    }

    #[test]
    fn test_sun_short_circuits_to_origin() {
        let state = body_position(Body::Sun, JD_J2000 + 12_345.678).unwrap();
        assert_eq!(state.position, Vector3::zeros());
        assert_eq!(state.velocity, Vector3::zeros());
        assert_eq!(state.distance, 0.0);
    }

    #[test]
    fn test_epoch_position_matches_mean_anomaly_epoch() {
        // Circular planar orbit at its own epoch: position angle is M₀.
        let elements = circular_elements(0.5);
        let state = propagate(&elements, JD_J2000).unwrap();
        assert_relative_eq!(state.position.x, 0.5_f64.cos(), max_relative = 1e-12);
        assert_relative_eq!(state.position.y, 0.5_f64.sin(), max_relative = 1e-12);
        assert_abs_diff_eq!(state.position.z, 0.0, epsilon = 1e-15);
        assert_relative_eq!(state.true_anomaly, 0.5, max_relative = 1e-9);
    }

    #[test]
    fn test_quarter_period_advance() {
        let elements = circular_elements(0.0);
        let quarter_period = DPI / elements.mean_motion / 4.0;
        let state = propagate(&elements, JD_J2000 + quarter_period).unwrap();
        assert_abs_diff_eq!(state.position.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(state.position.y, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_circular_velocity_magnitude_and_direction() {
        let elements = circular_elements(1.0);
        let state = propagate(&elements, JD_J2000).unwrap();
        // |v| = a·n for a circular orbit, and v ⟂ r.
        assert_relative_eq!(state.velocity.norm(), 0.01, max_relative = 1e-12);
        assert_abs_diff_eq!(state.position.dot(&state.velocity), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_within_apsidal_bounds() {
        let elements =
            OrbitalElements::new(1.5, 0.4, 0.3, 1.0, 2.0, 0.0, 0.02, JD_J2000).unwrap();
        for k in 0..50 {
            let jd = JD_J2000 + k as f64 * 13.7;
            let state = propagate(&elements, jd).unwrap();
            assert!(state.distance >= 1.5 * (1.0 - 0.4) - 1e-12);
            assert!(state.distance <= 1.5 * (1.0 + 0.4) + 1e-12);
            assert_relative_eq!(state.position.norm(), state.distance, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_inclined_orbit_leaves_reference_plane() {
        let inclination = 0.3;
        let elements =
            OrbitalElements::new(1.0, 0.0, inclination, 0.0, 0.0, 1.0, 0.01, JD_J2000).unwrap();
        let state = propagate(&elements, JD_J2000).unwrap();
        // Maximum excursion from the plane is sin(i)·r.
        assert!(state.position.z.abs() > 0.0);
        assert!(state.position.z.abs() <= inclination.sin() + 1e-12);
    }

    #[test]
    fn test_propagate_rejects_non_finite_jd() {
        let elements = circular_elements(0.0);
        assert!(propagate(&elements, f64::NAN).is_err());
        assert!(propagate(&elements, f64::INFINITY).is_err());
    }

    #[test]
    fn test_angular_separation() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 2.0, 0.0);
        assert_relative_eq!(
            angular_separation(&x, &y),
            std::f64::consts::FRAC_PI_2,
            max_relative = 1e-12
        );
        assert_eq!(angular_separation(&x, &Vector3::zeros()), 0.0);
        // Clamp guards against rounding above 1.0 for parallel vectors.
        assert_eq!(angular_separation(&x, &x), 0.0);
    }

    #[test]
    fn test_ecliptic_longitude() {
        assert_abs_diff_eq!(
            ecliptic_longitude(&Vector3::new(0.0, 1.0, 0.0)),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            ecliptic_longitude(&Vector3::new(1.0, -1e-12, 0.5)),
            DPI,
            epsilon = 1e-9
        );
    }
}
