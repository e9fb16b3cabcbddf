//! # Precise time stepping and scripted demonstrations
//!
//! Helpers layered on top of [`TimeController`] and the
//! [`TransitCalculator`] contact tables: jump to the next (or previous)
//! contact, curated keypoint, or 30-minute measurement instant, and run
//! scripted demonstration sequences that walk the clock through a list
//! of target instants with a dwell between jumps.
//!
//! Contact and keypoint stepping is **cyclic**: stepping forward past the
//! last entry wraps to the first, and stepping backward past the first
//! wraps to the last. The navigation ring has no terminal position, by
//! contrast with playback, which pauses at the window edge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hifitime::Epoch;

use crate::constants::{Days, JulianDate};
use crate::time::jd_to_epoch;
use crate::time_controller::TimeController;
use crate::transit::{Contact, TransitCalculator};

/// Step direction for contact/keypoint/measurement navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A curated marker instant with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    pub jd: JulianDate,
    pub epoch: Epoch,
    pub label: String,
}

/// Spacing of the measurement grid: 30 minutes, in days.
pub const MEASUREMENT_STEP_DAYS: Days = 30.0 / 1440.0;

// List searches tolerate this much Julian-Date rounding when deciding
// whether a query sits exactly on an entry (~86 µs).
const JD_EPSILON: f64 = 1e-9;

// On-grid tolerance for the measurement grid, in grid-index units
// (1e-6 of a 30-minute step ≈ 2 ms). JD/step ratios carry ~2e-8 of f64
// noise at Julian-Date magnitudes, so this must be well above that.
const GRID_EPSILON: f64 = 1e-6;

/// Stepping helpers over one calculator's contact tables.
///
/// Holds the flattened, time-sorted contact list and the curated keypoint
/// list; the navigator itself carries no clock state.
#[derive(Debug, Clone)]
pub struct Navigator {
    contacts: Vec<Contact>,
    keypoints: Vec<Keypoint>,
}

impl Navigator {
    pub fn new(calculator: &TransitCalculator) -> Self {
        let mut contacts = calculator.all_contacts();
        contacts.sort_by(|a, b| a.jd.total_cmp(&b.jd));

        let mut keypoints = Vec::new();
        for event in calculator.events() {
            let year = event.year;
            let hour_days = 1.0 / 24.0;

            keypoints.push(keypoint(
                event.first_contact().jd - hour_days,
                format!("Venus approaches the solar disk ({year})"),
            ));
            let labels = [
                "First contact",
                "Second contact",
                "Third contact",
                "Fourth contact",
            ];
            for (contact, label) in event.contacts.iter().zip(labels) {
                keypoints.push(keypoint(contact.jd, format!("{label} ({year})")));
            }
            let mid = (event.first_contact().jd + event.fourth_contact().jd) / 2.0;
            keypoints.push(keypoint(mid, format!("Mid-transit ({year})")));
            keypoints.push(keypoint(
                event.fourth_contact().jd + hour_days,
                format!("Venus clears the solar disk ({year})"),
            ));
        }
        keypoints.sort_by(|a, b| a.jd.total_cmp(&b.jd));

        Self {
            contacts,
            keypoints,
        }
    }

    /// Nearest contact strictly beyond `jd` in the given direction,
    /// wrapping to the opposite end of the list when none remains.
    pub fn step_to_next_contact(&self, jd: JulianDate, direction: Direction) -> Contact {
        step_ring(&self.contacts, |c| c.jd, jd, direction).clone()
    }

    /// Nearest curated keypoint beyond `jd`, with the same cyclic wrap.
    pub fn step_to_next_keypoint(&self, jd: JulianDate, direction: Direction) -> Keypoint {
        step_ring(&self.keypoints, |k| k.jd, jd, direction).clone()
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// Nearest instant on the fixed 30-minute measurement grid strictly
    /// beyond `jd`. The grid is anchored to whole and half hours UTC.
    pub fn step_to_next_measurement(&self, jd: JulianDate, direction: Direction) -> JulianDate {
        let steps = jd / MEASUREMENT_STEP_DAYS;
        match direction {
            Direction::Forward => ((steps + GRID_EPSILON).floor() + 1.0) * MEASUREMENT_STEP_DAYS,
            Direction::Backward => ((steps - GRID_EPSILON).ceil() - 1.0) * MEASUREMENT_STEP_DAYS,
        }
    }
}

fn keypoint(jd: JulianDate, label: String) -> Keypoint {
    Keypoint {
        jd,
        epoch: jd_to_epoch(jd),
        label,
    }
}

/// Find the first entry strictly beyond `jd` in `direction` over a sorted
/// list, wrapping to the opposite end when the search runs off the list.
fn step_ring<T>(
    sorted: &[T],
    jd_of: impl Fn(&T) -> JulianDate,
    jd: JulianDate,
    direction: Direction,
) -> &T {
    debug_assert!(!sorted.is_empty());
    match direction {
        Direction::Forward => sorted
            .iter()
            .find(|entry| jd_of(entry) > jd + JD_EPSILON)
            .unwrap_or(&sorted[0]),
        Direction::Backward => sorted
            .iter()
            .rev()
            .find(|entry| jd_of(entry) < jd - JD_EPSILON)
            .unwrap_or(&sorted[sorted.len() - 1]),
    }
}

/// Cooperative cancellation flag for scripted demonstrations.
///
/// Cloned handles share the flag; the runner checks it between steps and
/// never interrupts a dwell already in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One step of a scripted demonstration.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoStep {
    /// Instant to jump the clock to.
    pub target: Epoch,
    /// Wall-clock dwell before the next step.
    pub dwell: Duration,
    /// On-screen label for the step.
    pub label: String,
}

/// A guided tour of one transit, one step per curated keypoint.
pub fn keypoint_tour(navigator: &Navigator, year: i32, dwell: Duration) -> Vec<DemoStep> {
    navigator
        .keypoints()
        .iter()
        .filter(|k| k.label.ends_with(&format!("({year})")))
        .map(|k| DemoStep {
            target: k.epoch,
            dwell,
            label: k.label.clone(),
        })
        .collect()
}

/// Run a scripted demonstration sequence.
///
/// Jumps the controller to each step's target, then waits the step's
/// dwell before proceeding. The cancellation flag is checked between
/// steps (cooperative, not preemptive). Returns the number of steps
/// whose jump was performed.
pub async fn run_demo(
    controller: &mut TimeController,
    steps: &[DemoStep],
    cancel: &CancelFlag,
) -> usize {
    let mut performed = 0;
    for step in steps {
        if cancel.is_cancelled() {
            break;
        }
        controller.set_time(step.target);
        performed += 1;
        tokio::time::sleep(step.dwell).await;
    }
    performed
}
