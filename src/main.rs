//! Flyby - Probe Flight Simulator
//!
//! Runs the probe simulation headless at 60 Hz against the built-in solar
//! system, launching a probe from near Earth every second. Set `RUST_LOG`
//! to see impacts and retirements.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::math::DVec3;
use bevy::prelude::*;

use flyby::collision::CollisionPlugin;
use flyby::ephemeris::{BodyTable, BodyTableError, solar_system};
use flyby::physics::{LaunchProbe, PhysicsPlugin};
use flyby::time::TimeControlPlugin;
use flyby::types::{SimulationSet, UnitSystem};

/// Seconds between automatic launches.
const LAUNCH_INTERVAL: f64 = 1.0;

/// Launch speed toward the Sun.
///
/// Visual tuning, not a physical speed: at 1e5 km per unit this is 20 units/s,
/// so probes cross the inner solar system in about a minute.
const LAUNCH_SPEED_KM_PER_SEC: f64 = 2.0e6;

/// Launch point distance from Earth's center (km).
const LAUNCH_STANDOFF_KM: f64 = 500_000.0;

fn main() -> Result<(), BodyTableError> {
    let units = UnitSystem::default();
    let bodies = solar_system(&units)?;

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        // Insert resources before plugins that read them
        .insert_resource(units)
        .insert_resource(bodies)
        .add_plugins((TimeControlPlugin, PhysicsPlugin, CollisionPlugin))
        .add_systems(
            Update,
            launch_from_earth
                .after(SimulationSet::Orbits)
                .before(SimulationSet::Probes),
        )
        .run();

    Ok(())
}

/// Periodically launch a probe from beside Earth toward the Sun.
fn launch_from_earth(
    mut elapsed: Local<f64>,
    mut launches: MessageWriter<LaunchProbe>,
    bodies: Res<BodyTable>,
    units: Res<UnitSystem>,
    time: Res<Time>,
) {
    *elapsed += time.delta_secs_f64();
    if *elapsed < LAUNCH_INTERVAL {
        return;
    }
    *elapsed -= LAUNCH_INTERVAL;

    let Some(earth) = bodies
        .find_by_name("Earth")
        .and_then(|id| bodies.absolute_position(id))
    else {
        return;
    };

    let sunward = -earth.normalize_or_zero();
    let standoff = units.km_to_units(LAUNCH_STANDOFF_KM);
    launches.write(LaunchProbe {
        position: earth + sunward.cross(DVec3::Z).normalize_or(DVec3::X) * standoff,
        direction: sunward,
        speed_km_per_sec: LAUNCH_SPEED_KM_PER_SEC,
        mass: 720.0,
    });
}
