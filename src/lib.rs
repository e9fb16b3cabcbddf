//! # transit-core
//!
//! Orbital mechanics and transit-timing core for an interactive
//! reconstruction of the 1761/1769 Venus transits — the historical
//! campaign that measured the Astronomical Unit by parallax.
//!
//! The crate owns the numerical heart of the simulation: the Kepler
//! solver, the heliocentric ephemeris, Julian Date conversion, the
//! simulation clock, the contact/transit classification, and the
//! parallax reduction over the historical station records. Rendering,
//! UI, and scene management are external collaborators that feed the
//! clock wall-time deltas and consume positions and status payloads.

pub mod constants;
pub mod ephemeris;
pub mod kepler;
pub mod observers;
pub mod orbital_elements;
pub mod stepping;
pub mod time;
pub mod time_controller;
pub mod transit;
pub mod transit_errors;
