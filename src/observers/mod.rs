//! # Historical observation stations
//!
//! Read-only reference records of the expeditions that timed the 1761 and
//! 1769 Venus transits. Each [`ObservationPoint`] carries the site
//! geometry, the observed (historical) contact times — distinct from the
//! geometric contact table in [`crate::transit`] — and free-text accuracy
//! annotations.
//!
//! The table ships as an embedded CSV document ([`stations`] parses it
//! once and caches the result) and is never mutated after load. Site
//! latitude/longitude are stored as `NotNan<f64>`: NaN geometry is
//! rejected at construction, not discovered downstream.

pub mod stations;

use hifitime::Epoch;
use nalgebra::Vector3;
use ordered_float::NotNan;
use serde::Deserialize;
use std::str::FromStr;

use crate::constants::{Degree, Kilometer, EARTH_RADIUS_KM, RADEG};
use crate::transit_errors::TransitError;

pub use stations::stations;

/// One historical observing station with its recorded contact times.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationPoint {
    /// Transit year the record belongs to (1761 or 1769).
    pub year: i32,
    /// Station name (place).
    pub name: String,
    /// Observer(s) of record.
    pub observer: String,
    /// Instrument description as recorded.
    pub telescope: String,
    /// Geodetic latitude, degrees north.
    pub latitude: NotNan<Degree>,
    /// Geodetic longitude, degrees east.
    pub longitude: NotNan<Degree>,
    /// Site elevation, meters.
    pub elevation_m: f64,
    /// Observed contact instants (first..fourth); `None` where the
    /// historical record has no usable timing (clouds, black drop).
    pub contact_times: [Option<Epoch>; 4],
    /// Qualitative accuracy annotation from the historical record.
    pub accuracy_note: String,
    /// Free-text notes.
    pub notes: String,
}

impl ObservationPoint {
    /// Observed second contact, the measurement the historical parallax
    /// reductions were built on.
    pub fn second_contact(&self) -> Option<Epoch> {
        self.contact_times[1]
    }

    /// Unit vector from the geocenter to the site (Earth-fixed frame).
    pub fn geographic_unit_vector(&self) -> Vector3<f64> {
        let lat = self.latitude.into_inner() * RADEG;
        let lon = self.longitude.into_inner() * RADEG;
        Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }
}

/// Great-circle distance between two stations (haversine, mean sphere).
pub fn haversine_km(a: &ObservationPoint, b: &ObservationPoint) -> Kilometer {
    let lat_a = a.latitude.into_inner() * RADEG;
    let lat_b = b.latitude.into_inner() * RADEG;
    let dlat = lat_b - lat_a;
    let dlon = (b.longitude.into_inner() - a.longitude.into_inner()) * RADEG;

    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Raw CSV row; converted into [`ObservationPoint`] by the loader.
#[derive(Debug, Deserialize)]
struct StationRow {
    year: i32,
    name: String,
    observer: String,
    telescope: String,
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
    contact1: String,
    contact2: String,
    contact3: String,
    contact4: String,
    accuracy: String,
    notes: String,
}

fn parse_contact(field: &str) -> Option<Epoch> {
    if field.is_empty() {
        None
    } else {
        // The embedded table is validated by tests; a malformed instant
        // would be a defect in the table itself.
        Some(Epoch::from_str(field).expect("malformed contact instant in station table"))
    }
}

/// Parse a station table from CSV text.
///
/// Errors
/// ------
/// * [`TransitError::ObserverTableError`] on malformed CSV.
/// * [`TransitError::NanSiteGeometry`] when a row carries NaN
///   latitude/longitude.
pub(crate) fn parse_stations(csv_text: &str) -> Result<Vec<ObservationPoint>, TransitError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut points = Vec::new();

    for row in reader.deserialize::<StationRow>() {
        let row = row?;
        points.push(ObservationPoint {
            year: row.year,
            name: row.name,
            observer: row.observer,
            telescope: row.telescope,
            latitude: NotNan::new(row.latitude)?,
            longitude: NotNan::new(row.longitude)?,
            elevation_m: row.elevation_m,
            contact_times: [
                parse_contact(&row.contact1),
                parse_contact(&row.contact2),
                parse_contact(&row.contact3),
                parse_contact(&row.contact4),
            ],
            accuracy_note: row.accuracy,
            notes: row.notes,
        });
    }

    Ok(points)
}

/// Stations recorded for one transit year.
pub fn stations_for_year(year: i32) -> Vec<&'static ObservationPoint> {
    stations().iter().filter(|p| p.year == year).collect()
}
