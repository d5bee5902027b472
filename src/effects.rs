//! Visual afterglow for probe impacts.
//!
//! Every collision spawns one explosion marker that grows and fades over
//! one second of real time, then releases its entity.

use std::collections::VecDeque;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::types::MAX_EXPLOSIONS;

/// Life an explosion starts with, in seconds.
pub const EXPLOSION_LIFE: f64 = 1.0;

/// Growth rate of the explosion scale per second.
const GROWTH_RATE: f64 = 2.0;

/// Remaining life at or below this counts as burned out, absorbing the
/// rounding left over from summing frame deltas.
const LIFE_TOLERANCE: f64 = EXPLOSION_LIFE * 1e-9;

/// A transient explosion marker.
#[derive(Clone, Debug)]
pub struct Explosion {
    /// Impact position (probe frame, working units).
    pub position: DVec3,
    /// Remaining life, starting at 1.0.
    pub life: f64,
    /// Visual scale, grows multiplicatively each step.
    pub scale: f64,
    /// Opacity, `max(life, 0)`.
    pub fade: f64,
    /// Rendering entity owned by this explosion.
    pub visual: Option<Entity>,
}

impl Explosion {
    fn new(position: DVec3) -> Self {
        Self {
            position,
            life: EXPLOSION_LIFE,
            scale: 1.0,
            fade: 1.0,
            visual: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > LIFE_TOLERANCE
    }

    /// Decay by `dt` seconds.
    fn advance(&mut self, dt: f64) {
        self.life -= dt;
        self.scale *= 1.0 + dt * GROWTH_RATE;
        self.fade = if self.is_alive() { self.life } else { 0.0 };
    }
}

/// Resource owning every live explosion, oldest first.
#[derive(Resource, Debug)]
pub struct EffectManager {
    explosions: VecDeque<Explosion>,
    capacity: usize,
}

impl Default for EffectManager {
    fn default() -> Self {
        Self::with_capacity(MAX_EXPLOSIONS)
    }
}

impl EffectManager {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            explosions: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Start an explosion at `position`.
    ///
    /// Returns the oldest explosion if the cap forced it out; its visual must
    /// be released by the caller.
    pub fn spawn(&mut self, position: DVec3) -> Option<Explosion> {
        let evicted = if self.explosions.len() >= self.capacity {
            self.explosions.pop_front()
        } else {
            None
        };
        self.explosions.push_back(Explosion::new(position));
        evicted
    }

    /// Decay every explosion by `dt` seconds and return those that burned out.
    ///
    /// A non-finite or negative `dt` skips the frame.
    pub fn step(&mut self, dt: f64) -> Vec<Explosion> {
        if !dt.is_finite() || dt < 0.0 {
            return Vec::new();
        }

        let mut expired = Vec::new();
        let mut live = VecDeque::with_capacity(self.explosions.len());
        for mut explosion in self.explosions.drain(..) {
            explosion.advance(dt);
            if explosion.is_alive() {
                live.push_back(explosion);
            } else {
                expired.push(explosion);
            }
        }
        self.explosions = live;
        expired
    }

    /// Remove every explosion (session reset).
    pub fn clear(&mut self) -> Vec<Explosion> {
        self.explosions.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.explosions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Explosion> {
        self.explosions.iter_mut()
    }
}

/// Marker on the entity rendering an explosion.
#[derive(Component, Debug)]
pub struct ExplosionMarker;

/// Opacity of an explosion entity, in `[0, 1]`.
#[derive(Component, Debug, Default)]
pub struct Fade(pub f32);

/// Decay explosions, sync their entities, and despawn burned-out ones.
pub fn step_effects(
    mut commands: Commands,
    mut effects: ResMut<EffectManager>,
    mut visuals: Query<(&mut Transform, &mut Fade), With<ExplosionMarker>>,
    time: Res<Time>,
) {
    for expired in effects.step(time.delta_secs_f64()) {
        release(&mut commands, expired);
    }

    for explosion in effects.iter_mut() {
        let visual = match explosion.visual {
            Some(entity) => entity,
            None => {
                let entity = commands
                    .spawn((
                        ExplosionMarker,
                        Transform::from_translation(explosion.position.as_vec3()),
                        Fade(explosion.fade as f32),
                    ))
                    .id();
                explosion.visual = Some(entity);
                continue;
            }
        };

        if let Ok((mut transform, mut fade)) = visuals.get_mut(visual) {
            transform.scale = Vec3::splat(explosion.scale as f32);
            fade.0 = explosion.fade as f32;
        }
    }
}

/// Release an explosion's rendering entity.
pub fn release(commands: &mut Commands, explosion: Explosion) {
    if let Some(entity) = explosion.visual {
        commands.entity(entity).despawn();
    }
}
