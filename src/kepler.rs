//! # Kepler equation solver
//!
//! Newton-Raphson solution of the elliptic Kepler equation
//! `M = E − e·sin(E)` for the eccentric anomaly `E`, together with the
//! angle-normalization helpers used across the crate.
//!
//! The solver is the most numerically sensitive routine in this library:
//! every body position produced by [`crate::ephemeris`] goes through it
//! once per query. Convergence is quadratic for all eccentricities in
//! `[0, 1)`; the iteration cap is not expected to trigger for bound
//! orbits.

use crate::constants::{DPI, KEPLER_MAX_ITER, KEPLER_TOLERANCE};
use crate::transit_errors::TransitError;
use std::f64::consts::PI;

/// Principal value of an angle in radians, reduced to [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Principal difference between two angles, in [-π, π].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let a = principal_angle(a);
    let b = principal_angle(b);

    let mut diff = a - b;
    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }

    diff
}

/// Solve Kepler's equation `M = E − e·sin(E)` for the eccentric anomaly.
///
/// Newton-Raphson iteration starting from `E₀ = M`, with the update
/// `E ← E − (E − e·sin E − M) / (1 − e·cos E)`, stopping when the
/// correction falls below [`KEPLER_TOLERANCE`] or after
/// [`KEPLER_MAX_ITER`] iterations. Hitting the cap is not an error:
/// the best estimate is returned and a warning is logged.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly M (radians, any finite value).
/// * `eccentricity`: orbital eccentricity e, must satisfy `0 ≤ e < 1`.
///
/// Return
/// ------
/// * The eccentric anomaly E (radians), such that `E − e·sin(E) ≈ M`.
///
/// Errors
/// ------
/// * [`TransitError::InvalidOrbitalElements`] if `mean_anomaly` is not
///   finite or `eccentricity` is outside `[0, 1)` (parabolic and
///   hyperbolic orbits are not supported).
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, TransitError> {
    if !mean_anomaly.is_finite() {
        return Err(TransitError::InvalidOrbitalElements(format!(
            "mean anomaly must be finite, got {mean_anomaly}"
        )));
    }
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(TransitError::InvalidOrbitalElements(format!(
            "eccentricity must be in [0, 1), got {eccentricity}"
        )));
    }

    let m = mean_anomaly;
    let e = eccentricity;
    let mut ecc_anomaly = m;

    for _ in 0..KEPLER_MAX_ITER {
        let f = ecc_anomaly - e * ecc_anomaly.sin() - m;
        let fp = 1.0 - e * ecc_anomaly.cos();
        let delta = f / fp;
        ecc_anomaly -= delta;

        if delta.abs() < KEPLER_TOLERANCE {
            return Ok(ecc_anomaly);
        }
    }

    log::warn!(
        "Kepler solver hit the iteration cap (M={m}, e={e}); returning best estimate {ecc_anomaly}"
    );
    Ok(ecc_anomaly)
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Residual of Kepler's equation for a candidate solution.
    fn residual(ecc_anomaly: f64, e: f64, m: f64) -> f64 {
        angle_diff(ecc_anomaly - e * ecc_anomaly.sin(), m)
    }

    #[test]
    fn test_solve_kepler_roundtrip_grid() {
        let eccentricities = [0.0, 0.1, 0.5, 0.9, 0.99];
        for &e in &eccentricities {
            for k in 0..64 {
                let m = DPI * k as f64 / 64.0;
                let ecc_anomaly = solve_kepler(m, e).unwrap();
                assert!(
                    residual(ecc_anomaly, e, m).abs() < 1e-9,
                    "residual too large for M={m}, e={e}"
                );
            }
        }
    }

    #[test]
    fn test_solve_kepler_circular() {
        // For e = 0 the equation is the identity E = M.
        let ecc_anomaly = solve_kepler(1.2345, 0.0).unwrap();
        assert_relative_eq!(ecc_anomaly, 1.2345, max_relative = 1e-14);
    }

    #[test]
    fn test_solve_kepler_negative_mean_anomaly() {
        let ecc_anomaly = solve_kepler(-2.5, 0.3).unwrap();
        assert!(residual(ecc_anomaly, 0.3, -2.5).abs() < 1e-9);
    }

    #[test]
    fn test_solve_kepler_rejects_invalid_inputs() {
        assert!(solve_kepler(f64::NAN, 0.1).is_err());
        assert!(solve_kepler(1.0, 1.0).is_err());
        assert!(solve_kepler(1.0, -0.1).is_err());
        assert!(solve_kepler(1.0, 1.5).is_err());
    }

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(DPI + 0.5), 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-14);
        assert_eq!(principal_angle(0.0), 0.0);
    }

    #[test]
    fn test_angle_diff() {
        assert_abs_diff_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-14);
        assert_abs_diff_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-14);
        assert_abs_diff_eq!(angle_diff(3.0, 1.0), 2.0, epsilon = 1e-14);
    }
}
