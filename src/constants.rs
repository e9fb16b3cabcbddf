//! # Constants and type definitions for transit-core
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `transit-core` library.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, Julian epochs)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, JD ↔ MJD)
//! - Core type aliases used across the crate
//! - Numerical tolerances for the Kepler solver
//! - Playback speed bounds for the simulation clock
//!
//! These definitions are used by all main modules, including the ephemeris,
//! the time controller, and the transit calculator.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of milliseconds in a Julian day
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU_KM: f64 = 149_597_870.7;

/// Mean Earth radius in kilometers (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00)
pub const JD_J2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648_000.0;

/// Mean apparent motion of Venus relative to the solar disk during a
/// transit, in radians of sky angle per second of time. Converts an
/// observed contact-time offset into a parallax angle.
pub const VENUS_TRANSIT_RATE: f64 = 0.066 * RADSEC;

// -------------------------------------------------------------------------------------------------
// Kepler solver tolerances
// -------------------------------------------------------------------------------------------------

/// Convergence threshold on the eccentric anomaly correction |ΔE|
pub const KEPLER_TOLERANCE: f64 = 1e-10;

/// Cap on Newton iterations; not expected to trigger for e < 1
pub const KEPLER_MAX_ITER: usize = 100;

// -------------------------------------------------------------------------------------------------
// Simulation clock bounds
// -------------------------------------------------------------------------------------------------

/// Slowest playback speed, in simulated days per wall-clock second
pub const MIN_SPEED: f64 = 0.01;

/// Fastest playback speed, in simulated days per wall-clock second
pub const MAX_SPEED: f64 = 1000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Duration in days
pub type Days = f64;
/// Julian Date (days, fractional part is time-of-day)
pub type JulianDate = f64;

#[cfg(test)]
mod constants_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(SECONDS_PER_DAY * 1000.0, MILLIS_PER_DAY);
        assert_relative_eq!(180.0 * RADEG, std::f64::consts::PI, max_relative = 1e-15);
        assert_relative_eq!(
            3600.0 * 180.0 * RADSEC,
            std::f64::consts::PI,
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_speed_bounds_ordering() {
        assert!(MIN_SPEED > 0.0);
        assert!(MIN_SPEED < MAX_SPEED);
    }
}
