//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec3;
use flyby::effects::EffectManager;
use flyby::probe::{ProbePool, StepReport};
use flyby::types::{BodySnapshot, ProbeConfig};

/// Frame delta used by the tests, 60 Hz.
pub const DT: f64 = 1.0 / 60.0;

/// A pool with default limits and a chosen gravitational constant.
pub fn pool_with_g(g: f64) -> ProbePool {
    ProbePool::new(ProbeConfig::default(), g)
}

/// A massive body with a tiny radius so it never swallows nearby probes.
pub fn point_mass(position: DVec3, mass: f64) -> BodySnapshot {
    BodySnapshot::new(position, 1e-4, mass)
}

/// Step `frames` times at [`DT`], collecting every report.
pub fn run_frames(
    pool: &mut ProbePool,
    effects: &mut EffectManager,
    bodies: &[BodySnapshot],
    frame_offset: DVec3,
    frames: usize,
) -> Vec<StepReport> {
    (0..frames)
        .map(|_| pool.step(DT, bodies, frame_offset, effects))
        .collect()
}

/// Distance travelled by a constant velocity over `frames` frames.
pub fn straight_line_distance(speed: f64, frames: usize) -> f64 {
    speed * DT * frames as f64
}
