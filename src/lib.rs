//! Flyby - Probe Flight Simulator
//!
//! A library crate providing the physics core of a scaled solar-system
//! probe simulator: Keplerian body positions, probe gravity integration,
//! collision handling, and impact effects.

pub mod collision;
pub mod effects;
pub mod ephemeris;
pub mod physics;
pub mod probe;
pub mod time;
pub mod types;

#[cfg(test)]
pub mod test_utils;
