//! Per-frame probe physics driven by the Bevy schedule.
//!
//! Probes live in the [`ProbePool`] resource; this module wires the pool,
//! the effect manager, and the body snapshots into systems that run once
//! per frame after the body catalogue has been refreshed.

mod gravity;
mod integrator;

#[cfg(test)]
mod proptest_physics;

use bevy::math::DVec3;
use bevy::prelude::*;

pub use gravity::compute_acceleration;
pub use integrator::{Instability, semi_implicit_euler};

use crate::collision::CollisionEvent;
use crate::effects::{self, EffectManager, step_effects};
use crate::ephemeris::{BodyId, BodyTable};
use crate::probe::{Probe, ProbeId, ProbePool};
use crate::time::SimulationTime;
use crate::types::{BodySnapshots, FrameOffset, ProbeConfig, SimulationSet, UnitSystem};

/// Plugin providing probe flight and impact effects.
///
/// Reads [`ProbeConfig`] and [`UnitSystem`] if they were inserted before the
/// plugin, otherwise installs the defaults.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<ProbeConfig>()
            .cloned()
            .unwrap_or_default();
        let units = app
            .world()
            .get_resource::<UnitSystem>()
            .copied()
            .unwrap_or_default();

        app.insert_resource(ProbePool::new(config.clone(), units.gravitational_constant()))
            .insert_resource(config)
            .insert_resource(units)
            .init_resource::<EffectManager>()
            .init_resource::<FrameOffset>()
            .init_resource::<BodySnapshots>()
            .init_resource::<BodyTable>()
            .init_resource::<SimulationTime>()
            .add_message::<LaunchProbe>()
            .add_message::<CollisionEvent>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Orbits,
                    SimulationSet::Probes,
                    SimulationSet::Effects,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (handle_launch_requests, step_probes, sync_probe_visuals)
                    .chain()
                    .in_set(SimulationSet::Probes),
            )
            .add_systems(Update, step_effects.in_set(SimulationSet::Effects));
    }
}

/// Request to launch a probe.
#[derive(Message, Clone, Debug)]
pub struct LaunchProbe {
    /// Start position in the probes' frame (working units).
    pub position: DVec3,
    /// Launch direction; normalized on launch.
    pub direction: DVec3,
    pub speed_km_per_sec: f64,
    /// Probe mass in kilograms.
    pub mass: f64,
}

/// Marker on the entity rendering a probe.
#[derive(Component, Debug)]
pub struct ProbeMarker {
    pub id: ProbeId,
}

/// Trail polyline for a probe entity, rebuilt when the trail changes.
#[derive(Component, Debug, Default)]
pub struct TrailGeometry {
    pub points: Vec<Vec3>,
    /// Trail revision the points were built from.
    pub revision: u64,
}

impl TrailGeometry {
    fn from_probe(probe: &Probe) -> Self {
        Self {
            points: probe.trail.points().map(|p| p.as_vec3()).collect(),
            revision: probe.trail.revision(),
        }
    }
}

/// Release a probe's rendering entity.
pub fn release_probe(commands: &mut Commands, probe: Probe) {
    if let Some(entity) = probe.visual {
        commands.entity(entity).despawn();
    }
}

/// Launch probes for every pending request.
fn handle_launch_requests(
    mut commands: Commands,
    mut requests: MessageReader<LaunchProbe>,
    mut pool: ResMut<ProbePool>,
    units: Res<UnitSystem>,
) {
    for request in requests.read() {
        let speed = units.km_to_units(request.speed_km_per_sec);
        match pool.launch(request.position, request.direction, speed, request.mass) {
            Ok(launched) => {
                debug!("launched probe {:?}", launched.id);
                if let Some(evicted) = launched.evicted {
                    release_probe(&mut commands, evicted);
                }
            }
            Err(err) => warn!("rejected probe launch: {err}"),
        }
    }
}

/// Integrate every probe and release whatever the step retired.
fn step_probes(
    mut commands: Commands,
    mut pool: ResMut<ProbePool>,
    mut effects: ResMut<EffectManager>,
    mut collisions: MessageWriter<CollisionEvent>,
    snapshots: Res<BodySnapshots>,
    offset: Res<FrameOffset>,
    bodies: Res<BodyTable>,
    sim_time: Res<SimulationTime>,
    time: Res<Time>,
) {
    if sim_time.paused {
        return;
    }

    let report = pool.step(time.delta_secs_f64(), &snapshots.0, offset.0, &mut effects);

    for collision in &report.collisions {
        collisions.write(CollisionEvent {
            probe: collision.probe,
            body: collision.body,
            body_name: bodies.get(BodyId(collision.body)).map(|b| b.name.clone()),
            position: collision.position,
        });
    }
    for retired in report.retired {
        release_probe(&mut commands, retired.probe);
    }
    for explosion in report.evicted_explosions {
        effects::release(&mut commands, explosion);
    }
}

/// Spawn entities for new probes and sync transforms and trails.
fn sync_probe_visuals(
    mut commands: Commands,
    mut pool: ResMut<ProbePool>,
    mut visuals: Query<(&mut Transform, &mut TrailGeometry), With<ProbeMarker>>,
) {
    for probe in pool.iter_mut() {
        let Some(entity) = probe.visual else {
            let entity = commands
                .spawn((
                    ProbeMarker { id: probe.id },
                    Transform::from_translation(probe.position.as_vec3()),
                    TrailGeometry::from_probe(probe),
                ))
                .id();
            probe.visual = Some(entity);
            continue;
        };

        if let Ok((mut transform, mut geometry)) = visuals.get_mut(entity) {
            transform.translation = probe.position.as_vec3();
            if probe.trail.is_drawable() && geometry.revision != probe.trail.revision() {
                *geometry = TrailGeometry::from_probe(probe);
            }
        }
    }
}
