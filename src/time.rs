//! # Calendar ↔ Julian Date conversion
//!
//! Bidirectional conversion between Gregorian calendar instants and Julian
//! Dates, built on [`hifitime::Epoch`]. The `Epoch` type is the calendar
//! instant used at every API boundary of this crate; Julian Dates carry the
//! fractional day from hour/minute/second.
//!
//! Round-trip property: `jd_to_epoch(epoch_to_jd(t))` matches `t` to
//! sub-second precision for any Gregorian instant after 1582-10-15.
//! Instants before the UTC era are proleptic (leap-second free), which
//! keeps conversions exact and deterministic for the 1761/1769 windows.

use hifitime::{Epoch, TimeScale};

use crate::constants::{JulianDate, JDTOMJD};

/// Convert a calendar instant to a Julian Date (UTC scale).
pub fn epoch_to_jd(epoch: &Epoch) -> JulianDate {
    epoch.to_jde_utc_days()
}

/// Convert a Julian Date (UTC scale) back to a calendar instant.
pub fn jd_to_epoch(jd: JulianDate) -> Epoch {
    Epoch::from_jde_utc(jd)
}

/// Build a Julian Date from Gregorian calendar fields (UTC).
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: Gregorian calendar date.
/// * `hour`, `minute`, `second`: time-of-day, added as the fractional day.
///
/// Return
/// ------
/// * The corresponding Julian Date.
pub fn jd_from_gregorian(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> JulianDate {
    let epoch = Epoch::from_gregorian(year, month, day, hour, minute, second, 0, TimeScale::UTC);
    epoch_to_jd(&epoch)
}

/// Decompose a Julian Date into Gregorian calendar fields (UTC).
///
/// The result is rounded to the nearest whole second, which absorbs the
/// few tens of microseconds a Julian Date can lose to f64 rounding.
///
/// Return
/// ------
/// * `(year, month, day, hour, minute, second)`.
pub fn jd_to_gregorian(jd: JulianDate) -> (i32, u8, u8, u8, u8, u8) {
    let rounded = jd_to_epoch(jd) + hifitime::Duration::from_seconds(0.5);
    let (year, month, day, hour, minute, second, _nanos) = rounded.to_gregorian_utc();
    (year, month, day, hour, minute, second)
}

/// Julian Date → Modified Julian Date.
pub fn jd_to_mjd(jd: JulianDate) -> f64 {
    jd - JDTOMJD
}

/// Modified Julian Date → Julian Date.
pub fn mjd_to_jd(mjd: f64) -> JulianDate {
    mjd + JDTOMJD
}

/// Human-readable rendering of a Julian Date, used in the time-changed
/// notification payload (`YYYY-MM-DD HH:MM:SS UTC`).
pub fn format_jd(jd: JulianDate) -> String {
    let (year, month, day, hour, minute, second) = jd_to_gregorian(jd);
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} UTC")
}
