//! # Keplerian orbital elements and body tables
//!
//! This module defines the [`OrbitalElements`] struct — the classical
//! element set `(a, e, i, Ω, ω, M₀)` with a mean motion and reference
//! epoch — and the built-in J2000 osculating tables for the three bodies
//! the transit simulation needs: Sun, Earth and Venus.
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **radians**
//! - Mean motion: **radians/day**
//! - Reference epoch: **Julian Date** (UTC)
//!
//! ## Body tables
//!
//! Bodies are data, not subclasses: [`Body::elements`] returns the element
//! set for each body, and body-specific behavior reduces to the element
//! values themselves. The Sun is pinned to the heliocentric origin with
//! the `semi_major_axis = 0` sentinel, which the ephemeris short-circuits
//! without invoking the Kepler solver.
//!
//! Earth and Venus values follow the standard JPL approximate ephemeris
//! (Standish), with the mean anomaly at epoch and mean motion derived
//! from the tabulated mean longitude and its secular rate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{JulianDate, Radian, JD_J2000, RADEG};
use crate::kepler::principal_angle;
use crate::transit_errors::TransitError;

/// Classical Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `semi_major_axis`: Astronomical Units (AU); `0.0` marks a body fixed
///   at the coordinate origin.
/// * `eccentricity`: unitless, `0 ≤ e < 1`.
/// * `inclination`: radians.
/// * `ascending_node_longitude`: radians (Ω).
/// * `periapsis_argument`: radians (ω).
/// * `mean_anomaly_epoch`: radians (M at `reference_epoch`).
/// * `mean_motion`: radians/day (sign sets the direction of revolution).
/// * `reference_epoch`: Julian Date the mean anomaly refers to.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: Radian,
    pub ascending_node_longitude: Radian,
    pub periapsis_argument: Radian,
    pub mean_anomaly_epoch: Radian,
    pub mean_motion: f64,
    pub reference_epoch: JulianDate,
}

impl OrbitalElements {
    /// Validating constructor.
    ///
    /// Angular elements are normalized to `[0, 2π)`.
    ///
    /// Errors
    /// ------
    /// * [`TransitError::InvalidOrbitalElements`] if `semi_major_axis < 0`,
    ///   `eccentricity` is outside `[0, 1)`, or any field is non-finite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: Radian,
        ascending_node_longitude: Radian,
        periapsis_argument: Radian,
        mean_anomaly_epoch: Radian,
        mean_motion: f64,
        reference_epoch: JulianDate,
    ) -> Result<Self, TransitError> {
        let fields = [
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude,
            periapsis_argument,
            mean_anomaly_epoch,
            mean_motion,
            reference_epoch,
        ];
        if fields.iter().any(|x| !x.is_finite()) {
            return Err(TransitError::InvalidOrbitalElements(
                "all element fields must be finite".into(),
            ));
        }
        if semi_major_axis < 0.0 {
            return Err(TransitError::InvalidOrbitalElements(format!(
                "semi-major axis must be non-negative, got {semi_major_axis}"
            )));
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(TransitError::InvalidOrbitalElements(format!(
                "eccentricity must be in [0, 1), got {eccentricity}"
            )));
        }

        Ok(Self {
            semi_major_axis,
            eccentricity,
            inclination: principal_angle(inclination),
            ascending_node_longitude: principal_angle(ascending_node_longitude),
            periapsis_argument: principal_angle(periapsis_argument),
            mean_anomaly_epoch: principal_angle(mean_anomaly_epoch),
            mean_motion,
            reference_epoch,
        })
    }

    /// True when the body is pinned to the coordinate origin
    /// (`semi_major_axis = 0` sentinel).
    pub fn is_fixed_at_origin(&self) -> bool {
        self.semi_major_axis == 0.0
    }

    /// Mean anomaly at an arbitrary Julian Date, normalized to `[0, 2π)`.
    pub fn mean_anomaly_at(&self, jd: JulianDate) -> Radian {
        let elapsed_days = jd - self.reference_epoch;
        principal_angle(self.mean_anomaly_epoch + self.mean_motion * elapsed_days)
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(
            f,
            "Orbital Elements @ epoch (JD): {:.6}",
            self.reference_epoch
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.8} AU",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.8}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        writeln!(
            f,
            "  M₀  (mean anomaly at epoch) = {:.6} rad ({:.6}°)",
            self.mean_anomaly_epoch,
            self.mean_anomaly_epoch * rad_to_deg
        )?;
        writeln!(
            f,
            "  n   (mean motion)           = {:.8} rad/day",
            self.mean_motion
        )
    }
}

/// The three bodies the transit geometry needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Earth,
    Venus,
}

impl Body {
    /// J2000 osculating elements for this body (heliocentric ecliptic).
    ///
    /// Earth values are the Earth-Moon barycenter set, which is accurate
    /// to well under the transit-geometry tolerances at this scale.
    pub fn elements(&self) -> OrbitalElements {
        match self {
            // Fixed at the heliocentric origin; a = 0 short-circuits the
            // ephemeris without invoking the Kepler solver.
            Body::Sun => OrbitalElements {
                semi_major_axis: 0.0,
                eccentricity: 0.0,
                inclination: 0.0,
                ascending_node_longitude: 0.0,
                periapsis_argument: 0.0,
                mean_anomaly_epoch: 0.0,
                mean_motion: 0.0,
                reference_epoch: JD_J2000,
            },
            // Standish J2000: a, e, i, Ω, ϖ = 102.93768193°, L = 100.46457166°.
            // ω = ϖ − Ω, M₀ = L − ϖ, n = L̇ = 35999.37244981°/cy.
            Body::Earth => OrbitalElements {
                semi_major_axis: 1.000_002_61,
                eccentricity: 0.016_711_23,
                inclination: -0.000_015_31 * RADEG,
                ascending_node_longitude: 0.0,
                periapsis_argument: 102.937_681_93 * RADEG,
                mean_anomaly_epoch: principal_angle((100.464_571_66 - 102.937_681_93) * RADEG),
                mean_motion: 35_999.372_449_81 / 36_525.0 * RADEG,
                reference_epoch: JD_J2000,
            },
            // Standish J2000: ϖ = 131.60246718°, L = 181.97909950°,
            // L̇ = 58517.81538729°/cy.
            Body::Venus => OrbitalElements {
                semi_major_axis: 0.723_335_66,
                eccentricity: 0.006_776_72,
                inclination: 3.394_676_05 * RADEG,
                ascending_node_longitude: 76.679_842_55 * RADEG,
                periapsis_argument: (131.602_467_18 - 76.679_842_55) * RADEG,
                mean_anomaly_epoch: principal_angle((181.979_099_50 - 131.602_467_18) * RADEG),
                mean_motion: 58_517.815_387_29 / 36_525.0 * RADEG,
                reference_epoch: JD_J2000,
            },
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sun => write!(f, "Sun"),
            Body::Earth => write!(f, "Earth"),
            Body::Venus => write!(f, "Venus"),
        }
    }
}

#[cfg(test)]
mod orbital_elements_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constructor_normalizes_angles() {
        let elements = OrbitalElements::new(
            1.0,
            0.1,
            -0.2,
            crate::constants::DPI + 0.3,
            0.4,
            -1.0,
            0.01,
            JD_J2000,
        )
        .unwrap();
        assert_relative_eq!(
            elements.inclination,
            crate::constants::DPI - 0.2,
            max_relative = 1e-12
        );
        assert_relative_eq!(elements.ascending_node_longitude, 0.3, max_relative = 1e-12);
        assert_relative_eq!(
            elements.mean_anomaly_epoch,
            crate::constants::DPI - 1.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_constructor_rejects_invalid() {
        assert!(OrbitalElements::new(-1.0, 0.1, 0., 0., 0., 0., 0.01, JD_J2000).is_err());
        assert!(OrbitalElements::new(1.0, 1.0, 0., 0., 0., 0., 0.01, JD_J2000).is_err());
        assert!(OrbitalElements::new(1.0, f64::NAN, 0., 0., 0., 0., 0.01, JD_J2000).is_err());
    }

    #[test]
    fn test_earth_table_sanity() {
        let earth = Body::Earth.elements();
        assert_relative_eq!(earth.semi_major_axis, 1.0, max_relative = 1e-5);
        assert!(earth.eccentricity > 0.016 && earth.eccentricity < 0.017);
        // One revolution in ~365.25 days.
        let period_days = crate::constants::DPI / earth.mean_motion;
        assert_relative_eq!(period_days, 365.25, max_relative = 1e-3);
    }

    #[test]
    fn test_venus_table_sanity() {
        let venus = Body::Venus.elements();
        assert_relative_eq!(venus.semi_major_axis, 0.7233, max_relative = 1e-3);
        let period_days = crate::constants::DPI / venus.mean_motion;
        assert_relative_eq!(period_days, 224.7, max_relative = 1e-3);
    }

    #[test]
    fn test_sun_is_fixed() {
        assert!(Body::Sun.elements().is_fixed_at_origin());
        assert!(!Body::Earth.elements().is_fixed_at_origin());
    }

    #[test]
    fn test_mean_anomaly_propagation() {
        let earth = Body::Earth.elements();
        assert_eq!(earth.mean_anomaly_at(JD_J2000), earth.mean_anomaly_epoch);
        let one_period = crate::constants::DPI / earth.mean_motion;
        assert_relative_eq!(
            earth.mean_anomaly_at(JD_J2000 + one_period),
            earth.mean_anomaly_epoch,
            epsilon = 1e-9
        );
    }
}
