//! Simulation clock driving the body catalogue.
//!
//! Converts real frame time into simulated days using an adjustable
//! multiplier, then refreshes body positions for the probe step.

use bevy::prelude::*;

use crate::ephemeris::BodyTable;
use crate::types::{BodySnapshots, SECONDS_PER_DAY, SimulationSet};

/// Simulation clock state.
#[derive(Resource, Clone, Debug)]
pub struct SimulationTime {
    /// Simulated seconds per real second.
    multiplier: f64,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Simulated days elapsed since start.
    pub elapsed_days: f64,
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::with_multiplier(SECONDS_PER_DAY)
    }
}

impl SimulationTime {
    pub fn with_multiplier(multiplier: f64) -> Self {
        Self {
            multiplier,
            paused: false,
            elapsed_days: 0.0,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Takes effect from the next frame on.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Simulated days covered by `dt` real seconds, or `None` if non-finite.
    pub fn delta_days(&self, dt: f64) -> Option<f64> {
        let days = dt / SECONDS_PER_DAY * self.multiplier;
        days.is_finite().then_some(days)
    }

    /// Reset the elapsed counter and pause.
    pub fn reset(&mut self) {
        self.elapsed_days = 0.0;
        self.paused = true;
    }
}

/// Plugin advancing the simulation clock and body positions.
pub struct TimeControlPlugin;

impl Plugin for TimeControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationTime>()
            .init_resource::<BodyTable>()
            .init_resource::<BodySnapshots>()
            .add_systems(Update, advance_time.in_set(SimulationSet::Orbits));
    }
}

/// Advance the clock and refresh body positions for this frame.
///
/// A non-finite day delta leaves every body where it was.
pub fn advance_time(
    mut sim_time: ResMut<SimulationTime>,
    mut bodies: ResMut<BodyTable>,
    mut snapshots: ResMut<BodySnapshots>,
    time: Res<Time>,
) {
    if sim_time.paused {
        return;
    }

    let Some(delta_days) = sim_time.delta_days(time.delta_secs_f64()) else {
        warn!(
            "skipping body refresh: non-finite day delta (multiplier {})",
            sim_time.multiplier()
        );
        return;
    };

    sim_time.elapsed_days += delta_days;
    bodies.advance(delta_days);
    snapshots.0 = bodies.snapshots();
}
