//! Collision detection for probe-celestial body impacts.
//!
//! Probes are tested against every body's scaled collision sphere each
//! frame. On collision:
//! - An explosion is spawned at the probe's position
//! - The probe is retired
//! - A [`CollisionEvent`] is written for UI and audio cues

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::probe::ProbeId;
use crate::types::BodySnapshot;

/// Find the first body whose collision sphere contains `probe_abs`.
///
/// Body positions are shifted by `frame_offset` before the test, and each
/// body's radius is multiplied by `size_scale`. Bodies with a non-finite
/// position are ignored. Returns the body's index in `bodies`.
pub fn find_collision(
    probe_abs: DVec3,
    bodies: &[BodySnapshot],
    frame_offset: DVec3,
    size_scale: f64,
) -> Option<usize> {
    bodies.iter().position(|body| {
        let body_abs = body.position + frame_offset;
        body_abs.is_finite() && probe_abs.distance(body_abs) <= body.collision_radius(size_scale)
    })
}

/// Message written when a probe hits a celestial body.
#[derive(Message, Clone, Debug)]
pub struct CollisionEvent {
    /// The probe that was destroyed.
    pub probe: ProbeId,
    /// Index of the body hit in the frame's body list.
    pub body: usize,
    /// Name of the body hit, when known.
    pub body_name: Option<String>,
    /// Probe position at impact (probe frame, working units).
    pub position: DVec3,
}

/// Resource tracking collision state for UI display.
///
/// Stores the most recent collision event so the UI can display
/// impact information even after the event has been consumed.
#[derive(Resource, Default)]
pub struct CollisionState {
    /// Most recent collision, if any.
    pub last_collision: Option<CollisionEvent>,
    /// Collisions seen since the last reset.
    pub total: u32,
}

impl CollisionState {
    /// Clear the collision state (e.g., when resetting the session).
    pub fn clear(&mut self) {
        self.last_collision = None;
        self.total = 0;
    }

    /// Check if there's an active collision.
    pub fn has_collision(&self) -> bool {
        self.last_collision.is_some()
    }
}

/// Log each collision and remember the latest one.
pub fn record_collisions(
    mut events: MessageReader<CollisionEvent>,
    mut state: ResMut<CollisionState>,
) {
    for event in events.read() {
        info!(
            "IMPACT! probe {:?} hit {} at ({:.1}, {:.1}, {:.1})",
            event.probe,
            event.body_name.as_deref().unwrap_or("unknown body"),
            event.position.x,
            event.position.y,
            event.position.z,
        );
        state.total += 1;
        state.last_collision = Some(event.clone());
    }
}

/// Plugin providing collision reporting for probes.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CollisionEvent>()
            .init_resource::<CollisionState>()
            .add_systems(Update, record_collisions.after(crate::types::SimulationSet::Probes));
    }
}
