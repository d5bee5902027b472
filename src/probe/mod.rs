//! Launched probes and their bounded pool.
//!
//! The pool integrates every live probe once per frame against the current
//! body list, retires probes that go unstable, hit a body, or fly out of
//! range, and evicts the oldest probe when a launch would exceed capacity.
//! Retired and evicted probes are moved out of the pool and handed back to
//! the caller, which releases their rendering entity exactly once.

pub mod trail;

use std::collections::VecDeque;

use bevy::log::{debug, warn};
use bevy::math::DVec3;
use bevy::prelude::*;

pub use trail::Trail;

use crate::collision::find_collision;
use crate::effects::{EffectManager, Explosion};
use crate::physics::{Instability, compute_acceleration, semi_implicit_euler};
use crate::types::{BodySnapshot, ProbeConfig, UnitSystem};

/// Stable identifier of a launched probe, unique within its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProbeId(pub u64);

/// Errors raised by invalid launch requests.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum LaunchError {
    #[error("launch direction {0:?} has no usable length")]
    ZeroDirection(DVec3),
    #[error("launch {0} is not finite")]
    NonFinite(&'static str),
}

/// Why a probe left the pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RetireReason {
    /// Integration produced a non-finite value.
    Unstable(Instability),
    /// The probe entered a body's collision sphere (index into the body list).
    Collision { body: usize },
    /// The probe flew farther than the range limit.
    OutOfRange,
}

/// A launched probe.
#[derive(Clone, Debug)]
pub struct Probe {
    pub id: ProbeId,
    /// Position in the probes' local frame (working units).
    pub position: DVec3,
    /// Velocity in working units per second.
    pub velocity: DVec3,
    /// Mass in kilograms. Carried for display; gravity does not depend on it.
    pub mass: f64,
    pub trail: Trail,
    /// Rendering entity owned by this probe.
    pub visual: Option<Entity>,
    alive: bool,
}

impl Probe {
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

/// A probe removed during a step, with the reason it was removed.
#[derive(Debug)]
pub struct RetiredProbe {
    pub probe: Probe,
    pub reason: RetireReason,
}

/// A probe-body impact raised during a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub probe: ProbeId,
    /// Index of the body hit in the frame's body list.
    pub body: usize,
    /// Probe position at impact (probe frame).
    pub position: DVec3,
}

/// Everything that happened to the pool during one step.
#[derive(Debug, Default)]
pub struct StepReport {
    pub retired: Vec<RetiredProbe>,
    pub collisions: Vec<Collision>,
    /// Explosions pushed out of the effect cap by new impacts.
    pub evicted_explosions: Vec<Explosion>,
}

/// Result of a successful launch.
#[derive(Debug)]
pub struct Launched {
    pub id: ProbeId,
    /// Oldest probe evicted to make room, if the pool was full.
    pub evicted: Option<Probe>,
}

/// Resource owning every live probe, oldest first.
#[derive(Resource, Debug)]
pub struct ProbePool {
    probes: VecDeque<Probe>,
    config: ProbeConfig,
    /// Gravitational constant in working units.
    g: f64,
    next_id: u64,
}

impl Default for ProbePool {
    fn default() -> Self {
        Self::new(
            ProbeConfig::default(),
            UnitSystem::default().gravitational_constant(),
        )
    }
}

impl ProbePool {
    pub fn new(config: ProbeConfig, g: f64) -> Self {
        Self {
            probes: VecDeque::with_capacity(config.max_probes),
            config,
            g,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    /// Live probe capacity (at least one).
    pub fn capacity(&self) -> usize {
        self.config.max_probes.max(1)
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Live probes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Probe> {
        self.probes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Probe> {
        self.probes.iter_mut()
    }

    pub fn get(&self, id: ProbeId) -> Option<&Probe> {
        self.probes.iter().find(|p| p.id == id)
    }

    /// Launch a probe from `position` along `direction` at `speed` units/s.
    ///
    /// When the pool is full the oldest probe is evicted first and returned in
    /// [`Launched::evicted`]. Invalid requests leave the pool untouched.
    pub fn launch(
        &mut self,
        position: DVec3,
        direction: DVec3,
        speed: f64,
        mass: f64,
    ) -> Result<Launched, LaunchError> {
        if !position.is_finite() {
            return Err(LaunchError::NonFinite("position"));
        }
        if !speed.is_finite() {
            return Err(LaunchError::NonFinite("speed"));
        }
        if !mass.is_finite() {
            return Err(LaunchError::NonFinite("mass"));
        }
        let direction = direction
            .try_normalize()
            .ok_or(LaunchError::ZeroDirection(direction))?;

        let evicted = if self.probes.len() >= self.capacity() {
            self.probes.pop_front()
        } else {
            None
        };
        if let Some(evicted) = &evicted {
            debug!("probe pool full, evicting oldest probe {:?}", evicted.id);
        }

        let id = ProbeId(self.next_id);
        self.next_id += 1;

        self.probes.push_back(Probe {
            id,
            position,
            velocity: direction * speed,
            mass,
            trail: Trail::new(position, self.config.trail_capacity),
            visual: None,
            alive: true,
        });

        Ok(Launched { id, evicted })
    }

    /// Advance every live probe by `dt` real seconds.
    ///
    /// `bodies` are positioned in the bodies' frame and `frame_offset` is the
    /// translation of the probes' frame relative to it. Impacts spawn an
    /// explosion in `effects`. Retired probes are removed and returned in the
    /// report; a non-finite or negative `dt` skips the frame entirely.
    pub fn step(
        &mut self,
        dt: f64,
        bodies: &[BodySnapshot],
        frame_offset: DVec3,
        effects: &mut EffectManager,
    ) -> StepReport {
        let mut report = StepReport::default();
        if !dt.is_finite() || dt < 0.0 {
            warn!("skipping probe step: invalid frame delta {dt}");
            return report;
        }

        let mut live = VecDeque::with_capacity(self.probes.len());
        for mut probe in self.probes.drain(..) {
            let retirement =
                advance_probe(&mut probe, dt, bodies, frame_offset, &self.config, self.g);
            let Some(reason) = retirement else {
                live.push_back(probe);
                continue;
            };

            probe.alive = false;
            if let RetireReason::Collision { body } = reason {
                report.collisions.push(Collision {
                    probe: probe.id,
                    body,
                    position: probe.position,
                });
                report
                    .evicted_explosions
                    .extend(effects.spawn(probe.position));
            }
            report.retired.push(RetiredProbe { probe, reason });
        }
        self.probes = live;

        report
    }

    /// Retire every live probe (session reset).
    pub fn clear(&mut self) -> Vec<Probe> {
        self.probes
            .drain(..)
            .map(|mut probe| {
                probe.alive = false;
                probe
            })
            .collect()
    }
}

/// Integrate one probe for one frame and decide whether it survives.
fn advance_probe(
    probe: &mut Probe,
    dt: f64,
    bodies: &[BodySnapshot],
    frame_offset: DVec3,
    config: &ProbeConfig,
    g: f64,
) -> Option<RetireReason> {
    let acc = compute_acceleration(probe.position + frame_offset, bodies, g);

    if let Err(instability) = semi_implicit_euler(&mut probe.position, &mut probe.velocity, acc, dt) {
        warn!("probe {:?} retired: {instability}", probe.id);
        return Some(RetireReason::Unstable(instability));
    }

    probe.trail.push(probe.position);

    if let Some(body) = find_collision(
        probe.position + frame_offset,
        bodies,
        frame_offset,
        config.size_scale,
    ) {
        return Some(RetireReason::Collision { body });
    }

    if probe.position.length() > config.max_range {
        debug!("probe {:?} out of range", probe.id);
        return Some(RetireReason::OutOfRange);
    }

    None
}
