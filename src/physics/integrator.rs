//! Numerical integrator for probe motion.
//!
//! Probes advance with semi-implicit (symplectic) Euler once per frame:
//! velocity first from the sampled acceleration, then position from the new
//! velocity. Every step is checked for non-finite results so NaN or infinity
//! never leaks into a probe's state.

use bevy::math::DVec3;

/// Why an integration step was rejected.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instability {
    #[error("velocity became non-finite")]
    Velocity,
    #[error("position became non-finite")]
    Position,
}

/// Advance `pos` and `vel` by one semi-implicit Euler step.
///
/// `vel += acc·dt`, then `pos += vel·dt`. On a non-finite velocity the state
/// is left untouched and [`Instability::Velocity`] is returned; the position
/// is never computed from it. A non-finite position is rejected the same way.
#[inline]
pub fn semi_implicit_euler(
    pos: &mut DVec3,
    vel: &mut DVec3,
    acc: DVec3,
    dt: f64,
) -> Result<(), Instability> {
    let vel_new = *vel + acc * dt;
    if !vel_new.is_finite() {
        return Err(Instability::Velocity);
    }

    let pos_new = *pos + vel_new * dt;
    if !pos_new.is_finite() {
        return Err(Instability::Position);
    }

    *vel = vel_new;
    *pos = pos_new;
    Ok(())
}
