//! # Transit windows, contacts, and the parallax AU estimate
//!
//! [`TransitCalculator`] holds the fixed contact tables of the 1761 and
//! 1769 Venus transits and answers three questions:
//!
//! 1. **Where in a transit is a given instant?** — [`TransitCalculator::transit_status`]
//!    classifies an instant into a phase over the contact-bounded
//!    intervals and yields a linear progress percentage.
//! 2. **What does one observer's parallax look like?** —
//!    [`TransitCalculator::parallax_data`] compares the geocentric and
//!    site-displaced sightlines to Venus at each contact.
//! 3. **What AU did the historical campaign measure?** —
//!    [`TransitCalculator::historical_au_estimate`] reduces every pair of
//!    stations' second-contact timings to a distance estimate and
//!    aggregates the plausible ones.
//!
//! The contact instants are historical reference data, not outputs of the
//! ephemeris; the ephemeris supplies the per-contact geometry snapshots.

use hifitime::Epoch;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::constants::{AU_KM, EARTH_RADIUS_KM, JulianDate, Kilometer, Radian, VENUS_TRANSIT_RATE};
use crate::ephemeris::{angular_separation, body_position, StateVector};
use crate::observers::{haversine_km, stations_for_year, ObservationPoint};
use crate::orbital_elements::Body;
use crate::time::{jd_from_gregorian, jd_to_epoch};
use crate::transit_errors::TransitError;

/// The four contact kinds marking exterior/interior ingress and egress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    First,
    Second,
    Third,
    Fourth,
}

/// One contact instant of a transit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    pub epoch: Epoch,
    pub jd: JulianDate,
}

/// A transit of Venus: the year and its four contact instants.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitEvent {
    pub year: i32,
    pub contacts: SmallVec<[Contact; 4]>,
}

impl TransitEvent {
    pub fn first_contact(&self) -> &Contact {
        &self.contacts[0]
    }

    pub fn second_contact(&self) -> &Contact {
        &self.contacts[1]
    }

    pub fn third_contact(&self) -> &Contact {
        &self.contacts[2]
    }

    pub fn fourth_contact(&self) -> &Contact {
        &self.contacts[3]
    }

    /// Whole-transit duration in days.
    pub fn duration_days(&self) -> f64 {
        self.fourth_contact().jd - self.first_contact().jd
    }

    /// Linear progress of `t` across `[first, fourth]`, 0–100.
    pub fn progress_percent(&self, t: Epoch) -> f64 {
        let elapsed = (t - self.first_contact().epoch).to_seconds();
        let span = (self.fourth_contact().epoch - self.first_contact().epoch).to_seconds();
        elapsed / span * 100.0
    }

    /// True when `t` lies within `[first, fourth]`.
    pub fn contains(&self, t: Epoch) -> bool {
        t >= self.first_contact().epoch && t <= self.fourth_contact().epoch
    }
}

/// Position of an instant relative to a transit's contact intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitPhase {
    /// Before first contact.
    PreTransit,
    /// Between first and second contact: Venus crossing the limb inward.
    Ingress,
    /// Between second and third contact: Venus fully on the disk.
    FullTransit,
    /// Between third and fourth contact: Venus crossing the limb outward.
    Egress,
    /// After fourth contact.
    PostTransit,
}

/// Classification of an instant against the transit tables.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitStatus {
    pub is_transiting: bool,
    /// Year of the containing transit, when transiting.
    pub year: Option<i32>,
    pub phase: TransitPhase,
    /// Progress across `[first, fourth]` contact, when transiting.
    pub progress_percent: Option<f64>,
    /// The next transit year, cyclic: set whenever not transiting.
    pub next_transit: Option<i32>,
}

/// Parallax geometry at one contact for one observing site.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactParallax {
    pub kind: ContactKind,
    /// Angular separation of the geocentric and site-displaced sightlines.
    pub parallax_angle: Radian,
    /// Observer baseline off the geocenter (km).
    pub baseline_km: Kilometer,
    /// `baseline / tan(parallax_angle)`.
    pub distance_estimate_km: Kilometer,
}

/// Earth/Venus geometry snapshot at one contact.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactGeometry {
    pub contact: Contact,
    pub earth: StateVector,
    pub venus: StateVector,
}

/// Aggregated pairwise distance estimate for one year's campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct AuEstimate {
    pub year: i32,
    /// Number of station pairs that produced a plausible distance.
    pub pair_count: usize,
    pub mean_distance_km: Kilometer,
    /// 100 · (1 − |mean − AU| / AU), floored at zero.
    pub accuracy_percent: f64,
}

/// Fixed contact tables and the derived queries over them.
#[derive(Debug, Clone)]
pub struct TransitCalculator {
    events: Vec<TransitEvent>,
}

impl Default for TransitCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitCalculator {
    /// Calculator over the historical 1761/1769 contact tables.
    pub fn new() -> Self {
        let table: [(i32, [(u8, u8, u8, u8); 4]); 2] = [
            (
                1761,
                [(6, 6, 2, 19), (6, 6, 2, 39), (6, 6, 8, 37), (6, 6, 8, 57)],
            ),
            (
                1769,
                [(6, 3, 19, 15), (6, 3, 19, 34), (6, 4, 1, 6), (6, 4, 1, 25)],
            ),
        ];

        let kinds = [
            ContactKind::First,
            ContactKind::Second,
            ContactKind::Third,
            ContactKind::Fourth,
        ];

        let events = table
            .iter()
            .map(|(year, instants)| TransitEvent {
                year: *year,
                contacts: instants
                    .iter()
                    .zip(kinds)
                    .map(|((month, day, hour, minute), kind)| {
                        let jd = jd_from_gregorian(*year, *month, *day, *hour, *minute, 0);
                        Contact {
                            kind,
                            epoch: jd_to_epoch(jd),
                            jd,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { events }
    }

    /// The transit events, sorted by first contact.
    pub fn events(&self) -> &[TransitEvent] {
        &self.events
    }

    pub fn event_for_year(&self, year: i32) -> Option<&TransitEvent> {
        self.events.iter().find(|e| e.year == year)
    }

    /// All contacts across all years, flattened in time order.
    pub fn all_contacts(&self) -> Vec<Contact> {
        self.events
            .iter()
            .flat_map(|e| e.contacts.iter().copied())
            .collect()
    }

    /// Classify an instant against the contact tables.
    ///
    /// Inside a transit the phase follows the contact-bounded interval
    /// containing `t`; outside, the phase is [`TransitPhase::PreTransit`]
    /// while a transit is still upcoming and [`TransitPhase::PostTransit`]
    /// after the last one, and `next_transit` names the next year
    /// (wrapping to the earliest once all transits have passed).
    pub fn transit_status(&self, t: Epoch) -> TransitStatus {
        for event in &self.events {
            if event.contains(t) {
                let phase = if t < event.second_contact().epoch {
                    TransitPhase::Ingress
                } else if t < event.third_contact().epoch {
                    TransitPhase::FullTransit
                } else {
                    TransitPhase::Egress
                };
                return TransitStatus {
                    is_transiting: true,
                    year: Some(event.year),
                    phase,
                    progress_percent: Some(event.progress_percent(t)),
                    next_transit: None,
                };
            }
        }

        let upcoming = self
            .events
            .iter()
            .find(|e| e.first_contact().epoch > t)
            .map(|e| e.year);
        let phase = match upcoming {
            Some(_) => TransitPhase::PreTransit,
            None => TransitPhase::PostTransit,
        };
        // Cyclic: once every transit has passed, point back at the first.
        let next_transit = upcoming.or_else(|| self.events.first().map(|e| e.year));

        TransitStatus {
            is_transiting: false,
            year: None,
            phase,
            progress_percent: None,
            next_transit,
        }
    }

    /// Earth/Venus state snapshots at each contact of an event.
    pub fn contact_geometry(
        &self,
        event: &TransitEvent,
    ) -> Result<SmallVec<[ContactGeometry; 4]>, TransitError> {
        event
            .contacts
            .iter()
            .map(|contact| {
                Ok(ContactGeometry {
                    contact: *contact,
                    earth: body_position(Body::Earth, contact.jd)?,
                    venus: body_position(Body::Venus, contact.jd)?,
                })
            })
            .collect()
    }

    /// Per-contact parallax geometry for one observing site.
    ///
    /// At each contact, compares the geocentric sightline to Venus with
    /// the sightline from the site (displaced off the geocenter by one
    /// Earth radius along the site's geographic direction); the angular
    /// separation of the two is the parallax angle, and
    /// `baseline / tan(angle)` is the single-site distance estimate.
    pub fn parallax_data(
        &self,
        observer: &ObservationPoint,
        event: &TransitEvent,
    ) -> Result<SmallVec<[ContactParallax; 4]>, TransitError> {
        let site_offset_au = observer.geographic_unit_vector() * (EARTH_RADIUS_KM / AU_KM);

        self.contact_geometry(event)?
            .iter()
            .map(|geometry| {
                let geocentric = geometry.venus.position - geometry.earth.position;
                let displaced = geometry.venus.position - (geometry.earth.position + site_offset_au);
                let parallax_angle = angular_separation(&geocentric, &displaced);

                // Guard the tangent against an exactly-parallel geometry.
                let effective = parallax_angle.max(1e-12);
                Ok(ContactParallax {
                    kind: geometry.contact.kind,
                    parallax_angle,
                    baseline_km: EARTH_RADIUS_KM,
                    distance_estimate_km: EARTH_RADIUS_KM / effective.tan(),
                })
            })
            .collect()
    }

    /// Pairwise historical AU estimate for one year's campaign.
    ///
    /// Every unordered pair of stations with a recorded second contact
    /// contributes one estimate: the great-circle baseline between the
    /// sites, the parallax-angle difference implied by their
    /// second-contact timing offset, and
    /// `distance = baseline / (2·tan(Δ/2))`. Estimates outside
    /// `(0, 2 AU)` are discarded; the survivors are averaged.
    ///
    /// Returns `None` when the year has fewer than two timed stations
    /// (or no plausible pair at all) — missing data is an empty result,
    /// not an error.
    pub fn historical_au_estimate(&self, year: i32) -> Option<AuEstimate> {
        let timed: Vec<(&ObservationPoint, Epoch)> = stations_for_year(year)
            .into_iter()
            .filter_map(|p| p.second_contact().map(|c2| (p, c2)))
            .collect();
        if timed.len() < 2 {
            return None;
        }

        let estimates: Vec<Kilometer> = timed
            .iter()
            .tuple_combinations()
            .filter_map(|((site_a, c2_a), (site_b, c2_b))| {
                let baseline = haversine_km(site_a, site_b);
                let timing_offset = (*c2_a - *c2_b).to_seconds().abs();
                let delta_parallax = timing_offset * VENUS_TRANSIT_RATE;
                if delta_parallax <= 0.0 {
                    return None;
                }
                let distance = baseline / (2.0 * (delta_parallax / 2.0).tan());
                (distance > 0.0 && distance < 2.0 * AU_KM).then_some(distance)
            })
            .collect();

        if estimates.is_empty() {
            return None;
        }

        let mean = estimates.iter().sum::<f64>() / estimates.len() as f64;
        Some(AuEstimate {
            year,
            pair_count: estimates.len(),
            mean_distance_km: mean,
            accuracy_percent: (100.0 * (1.0 - (mean - AU_KM).abs() / AU_KM)).max(0.0),
        })
    }
}

#[cfg(test)]
mod transit_test {
    use super::*;
    use crate::constants::SECONDS_PER_DAY;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn at(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> Epoch {
        jd_to_epoch(jd_from_gregorian(year, month, day, hour, minute, 0))
    }

    #[test]
    fn test_contact_tables() {
        let calc = TransitCalculator::new();
        assert_eq!(calc.events().len(), 2);

        let t1761 = calc.event_for_year(1761).unwrap();
        assert_eq!(t1761.first_contact().epoch, at(1761, 6, 6, 2, 19));
        assert_eq!(t1761.fourth_contact().epoch, at(1761, 6, 6, 8, 57));
        // 02:19 → 08:57 is 6 h 38 min.
        assert_abs_diff_eq!(
            t1761.duration_days() * SECONDS_PER_DAY,
            6.0 * 3600.0 + 38.0 * 60.0,
            epsilon = 1e-3
        );

        let t1769 = calc.event_for_year(1769).unwrap();
        assert_eq!(t1769.first_contact().epoch, at(1769, 6, 3, 19, 15));
        assert_eq!(t1769.fourth_contact().epoch, at(1769, 6, 4, 1, 25));

        assert!(calc.event_for_year(1874).is_none());
        assert_eq!(calc.all_contacts().len(), 8);
    }

    #[test]
    fn test_status_mid_transit_1761() {
        let calc = TransitCalculator::new();
        let status = calc.transit_status(at(1761, 6, 6, 5, 30));
        assert!(status.is_transiting);
        assert_eq!(status.year, Some(1761));
        assert_eq!(status.phase, TransitPhase::FullTransit);
        // (05:30 − 02:19) / (08:57 − 02:19) = 191 / 398 minutes.
        assert_relative_eq!(
            status.progress_percent.unwrap(),
            191.0 / 398.0 * 100.0,
            max_relative = 1e-9
        );
        assert_eq!(status.next_transit, None);
    }

    #[test]
    fn test_status_phase_intervals() {
        let calc = TransitCalculator::new();
        assert_eq!(
            calc.transit_status(at(1761, 6, 6, 2, 25)).phase,
            TransitPhase::Ingress
        );
        assert_eq!(
            calc.transit_status(at(1761, 6, 6, 8, 45)).phase,
            TransitPhase::Egress
        );
        // Contact boundaries are inclusive at the outer edges.
        let first = calc.transit_status(at(1761, 6, 6, 2, 19));
        assert!(first.is_transiting);
        assert_abs_diff_eq!(first.progress_percent.unwrap(), 0.0, epsilon = 1e-9);
        let fourth = calc.transit_status(at(1761, 6, 6, 8, 57));
        assert!(fourth.is_transiting);
        assert_abs_diff_eq!(fourth.progress_percent.unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_status_outside_windows() {
        let calc = TransitCalculator::new();

        let before = calc.transit_status(at(1750, 1, 1, 0, 0));
        assert!(!before.is_transiting);
        assert_eq!(before.phase, TransitPhase::PreTransit);
        assert_eq!(before.next_transit, Some(1761));

        let between = calc.transit_status(at(1765, 6, 6, 5, 30));
        assert!(!between.is_transiting);
        assert_eq!(between.next_transit, Some(1769));

        // After the last transit the next one wraps to the earliest.
        let after = calc.transit_status(at(1790, 1, 1, 0, 0));
        assert!(!after.is_transiting);
        assert_eq!(after.phase, TransitPhase::PostTransit);
        assert_eq!(after.next_transit, Some(1761));
    }

    #[test]
    fn test_contact_geometry_snapshots() {
        let calc = TransitCalculator::new();
        let event = calc.event_for_year(1761).unwrap();
        let snapshots = calc.contact_geometry(event).unwrap();
        assert_eq!(snapshots.len(), 4);
        for snap in &snapshots {
            // Earth near 1 AU, Venus near 0.72 AU, both off-origin.
            assert_relative_eq!(snap.earth.distance, 1.0, max_relative = 0.05);
            assert_relative_eq!(snap.venus.distance, 0.723, max_relative = 0.05);
        }
    }

    #[test]
    fn test_parallax_data_per_contact() {
        let calc = TransitCalculator::new();
        let event = calc.event_for_year(1761).unwrap();
        let stockholm = stations_for_year(1761)
            .into_iter()
            .find(|p| p.name == "Stockholm")
            .unwrap();

        let data = calc.parallax_data(stockholm, event).unwrap();
        assert_eq!(data.len(), 4);
        for entry in &data {
            assert_eq!(entry.baseline_km, EARTH_RADIUS_KM);
            // One Earth radius against ~0.29 AU Earth-Venus range: the
            // parallax angle is small but decidedly nonzero.
            assert!(entry.parallax_angle > 0.0);
            assert!(entry.parallax_angle < 1e-3);
            assert!(entry.distance_estimate_km > 0.0);
        }
    }

    #[test]
    fn test_historical_au_estimate_1761() {
        let calc = TransitCalculator::new();
        let estimate = calc.historical_au_estimate(1761).unwrap();
        // Four timed stations (St Helena was clouded out) → six pairs.
        assert_eq!(estimate.pair_count, 6);
        assert!(estimate.mean_distance_km > 0.3 * AU_KM);
        assert!(estimate.mean_distance_km < 1.5 * AU_KM);
        assert!(estimate.accuracy_percent > 0.0);
        assert!(estimate.accuracy_percent <= 100.0);
    }

    #[test]
    fn test_historical_au_estimate_1769() {
        let calc = TransitCalculator::new();
        let estimate = calc.historical_au_estimate(1769).unwrap();
        assert!(estimate.pair_count >= 6);
        assert!(estimate.mean_distance_km > 0.3 * AU_KM);
        assert!(estimate.mean_distance_km < 1.5 * AU_KM);
    }

    #[test]
    fn test_historical_au_estimate_insufficient_data() {
        let calc = TransitCalculator::new();
        assert!(calc.historical_au_estimate(1874).is_none());
    }
}
