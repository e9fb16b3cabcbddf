//! # Simulation clock and playback engine
//!
//! [`TimeController`] owns the authoritative simulation clock: current
//! time, playback speed, the observable window bounds, and the play/pause
//! state. The host render loop drives it with wall-clock deltas through
//! [`TimeController::advance`]; UI collaborators mutate it through the
//! setters. Every accepted time change produces a [`TimeUpdate`] that is
//! returned to the caller and delivered to registered listeners in
//! mutation order.
//!
//! The controller is an explicitly constructed, explicitly owned object:
//! collaborators receive a reference, never a global. It is single-writer
//! and single-threaded; cross-thread readers take a [`SimulationClock`]
//! snapshot by value.
//!
//! ## Boundary behavior
//!
//! When a playback tick would carry the clock past either end of the
//! window, the time is clamped to that bound **and playback pauses**:
//! the observable window is a terminal region, playback neither wraps
//! nor oscillates.

use hifitime::{Duration, Epoch};

use crate::constants::{JulianDate, MAX_SPEED, MILLIS_PER_DAY, MIN_SPEED};
use crate::time::{epoch_to_jd, format_jd, jd_from_gregorian, jd_to_epoch};
use crate::transit_errors::TransitError;

/// Snapshot of the simulation clock state.
///
/// `Copy`-able: cross-thread consumers read a snapshot, never a shared
/// reference into the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    /// Current simulation instant, always within `[start, end]`.
    pub current: Epoch,
    /// Start of the observable window.
    pub start: Epoch,
    /// End of the observable window.
    pub end: Epoch,
    /// Playback speed, simulated days per wall-clock second.
    pub speed: f64,
    /// Whether the per-frame advance loop is active.
    pub playing: bool,
}

/// Payload of a time-changed notification.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUpdate {
    /// The new simulation instant.
    pub epoch: Epoch,
    /// The same instant as a Julian Date.
    pub julian_date: JulianDate,
    /// Human-readable rendering (`YYYY-MM-DD HH:MM:SS UTC`).
    pub formatted: String,
    /// Normalized progress across the window, 0–100.
    pub progress_percent: f64,
}

type Listener = Box<dyn FnMut(&TimeUpdate)>;

/// Owner of the simulation clock. See the module docs for semantics.
pub struct TimeController {
    clock: SimulationClock,
    listeners: Vec<Listener>,
}

impl TimeController {
    /// Controller over an explicit window, positioned at `start`, paused,
    /// at unit speed.
    ///
    /// Errors
    /// ------
    /// * [`TransitError::EmptyTimeRange`] if `start` is not before `end`.
    pub fn new(start: Epoch, end: Epoch) -> Result<Self, TransitError> {
        if start >= end {
            return Err(TransitError::EmptyTimeRange {
                start: epoch_to_jd(&start),
                end: epoch_to_jd(&end),
            });
        }
        Ok(Self {
            clock: SimulationClock {
                current: start,
                start,
                end,
                speed: 1.0,
                playing: false,
            },
            listeners: Vec::new(),
        })
    }

    /// Controller over the default ten-day window around a transit year
    /// (1761 or 1769).
    ///
    /// Errors
    /// ------
    /// * [`TransitError::UnknownTransitYear`] for any other year.
    pub fn for_transit_year(year: i32) -> Result<Self, TransitError> {
        let (start_jd, end_jd) = match year {
            1761 => (
                jd_from_gregorian(1761, 6, 1, 0, 0, 0),
                jd_from_gregorian(1761, 6, 11, 0, 0, 0),
            ),
            1769 => (
                jd_from_gregorian(1769, 5, 30, 0, 0, 0),
                jd_from_gregorian(1769, 6, 9, 0, 0, 0),
            ),
            other => return Err(TransitError::UnknownTransitYear(other)),
        };
        Self::new(jd_to_epoch(start_jd), jd_to_epoch(end_jd))
    }

    /// Snapshot of the clock state, by value.
    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn current_time(&self) -> Epoch {
        self.clock.current
    }

    pub fn current_jd(&self) -> JulianDate {
        epoch_to_jd(&self.clock.current)
    }

    pub fn is_playing(&self) -> bool {
        self.clock.playing
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed
    }

    /// Normalized position of the current time across the window, 0–100.
    pub fn progress_percent(&self) -> f64 {
        let span = (self.clock.end - self.clock.start).to_seconds();
        let elapsed = (self.clock.current - self.clock.start).to_seconds();
        elapsed / span * 100.0
    }

    /// Register a time-changed listener. Listeners are invoked in
    /// registration order, on every accepted change, in mutation order.
    pub fn subscribe(&mut self, listener: impl FnMut(&TimeUpdate) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Set the current time, clamped into the window.
    ///
    /// Returns the notification payload, or `None` when the clamped value
    /// equals the current time (accepted no-op, nothing fires). The play
    /// state is never touched by a direct set.
    pub fn set_time(&mut self, time: Epoch) -> Option<TimeUpdate> {
        let clamped = clamp_epoch(time, self.clock.start, self.clock.end);
        self.commit(clamped)
    }

    /// Set the current time from a Julian Date.
    ///
    /// Errors
    /// ------
    /// * [`TransitError::InvalidTimeValue`] if `jd` is not finite. The
    ///   clock is left untouched; rejected input is an explicit error,
    ///   not a silent no-op.
    pub fn set_time_jd(&mut self, jd: JulianDate) -> Result<Option<TimeUpdate>, TransitError> {
        if !jd.is_finite() {
            return Err(TransitError::InvalidTimeValue(jd));
        }
        Ok(self.set_time(jd_to_epoch(jd)))
    }

    /// Replace the window bounds and re-clamp the current time into them.
    ///
    /// Returns the notification payload if re-clamping moved the clock.
    ///
    /// Errors
    /// ------
    /// * [`TransitError::EmptyTimeRange`] if `start` is not before `end`.
    pub fn set_time_range(
        &mut self,
        start: Epoch,
        end: Epoch,
    ) -> Result<Option<TimeUpdate>, TransitError> {
        if start >= end {
            return Err(TransitError::EmptyTimeRange {
                start: epoch_to_jd(&start),
                end: epoch_to_jd(&end),
            });
        }
        self.clock.start = start;
        self.clock.end = end;
        let clamped = clamp_epoch(self.clock.current, start, end);
        Ok(self.commit(clamped))
    }

    /// Start or stop playback. Idempotent.
    pub fn set_play_state(&mut self, playing: bool) {
        if self.clock.playing != playing {
            log::debug!(
                "playback {} at {}",
                if playing { "started" } else { "stopped" },
                format_jd(self.current_jd())
            );
            self.clock.playing = playing;
        }
    }

    /// Set the playback speed, clamped into `[MIN_SPEED, MAX_SPEED]`
    /// simulated days per wall-clock second. Returns the effective speed.
    ///
    /// Errors
    /// ------
    /// * [`TransitError::InvalidSpeed`] for non-finite input.
    pub fn set_speed(&mut self, speed: f64) -> Result<f64, TransitError> {
        if !speed.is_finite() {
            return Err(TransitError::InvalidSpeed(speed));
        }
        self.clock.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        Ok(self.clock.speed)
    }

    /// Per-tick playback transition.
    ///
    /// Converts the wall-clock delta into simulated time
    /// (`Δsim = Δreal · speed · 86 400 s/day`) and proposes the advanced
    /// instant. When the proposal lands past either bound the clock is
    /// clamped to that bound **and playback pauses**.
    ///
    /// A paused controller ignores ticks and returns `Ok(None)`.
    ///
    /// Errors
    /// ------
    /// * [`TransitError::InvalidTimeValue`] for a non-finite delta.
    pub fn advance(&mut self, real_delta_seconds: f64) -> Result<Option<TimeUpdate>, TransitError> {
        if !real_delta_seconds.is_finite() {
            return Err(TransitError::InvalidTimeValue(real_delta_seconds));
        }
        if !self.clock.playing {
            return Ok(None);
        }

        let simulated_millis = real_delta_seconds * self.clock.speed * MILLIS_PER_DAY;
        let proposed = self.clock.current + Duration::from_milliseconds(simulated_millis);

        if proposed < self.clock.start || proposed > self.clock.end {
            let bound = if proposed > self.clock.end {
                self.clock.end
            } else {
                self.clock.start
            };
            self.clock.playing = false;
            log::debug!("playback reached the window edge, pausing at {bound}");
            return Ok(self.commit(bound));
        }

        Ok(self.commit(proposed))
    }

    /// Apply an already-clamped time value; fires listeners when it
    /// differs from the current time.
    fn commit(&mut self, new_time: Epoch) -> Option<TimeUpdate> {
        if new_time == self.clock.current {
            return None;
        }
        self.clock.current = new_time;

        let julian_date = epoch_to_jd(&new_time);
        let update = TimeUpdate {
            epoch: new_time,
            julian_date,
            formatted: format_jd(julian_date),
            progress_percent: self.progress_percent(),
        };
        for listener in &mut self.listeners {
            listener(&update);
        }
        Some(update)
    }
}

fn clamp_epoch(time: Epoch, start: Epoch, end: Epoch) -> Epoch {
    if time < start {
        start
    } else if time > end {
        end
    } else {
        time
    }
}
