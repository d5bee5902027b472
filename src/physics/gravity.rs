//! Gravity calculation for probe physics.
//!
//! Sums the attraction of every positioned, massive body on a test point.
//! Bodies do not attract each other and the probe's own mass never enters
//! the result.

use bevy::math::DVec3;

use crate::types::{BodySnapshot, MIN_GRAVITY_DISTANCE};

/// Compute gravitational acceleration at a given position.
///
/// # Arguments
/// * `pos` - Test position in the bodies' frame (working units)
/// * `bodies` - Bodies positioned for the current frame
/// * `g` - Gravitational constant expressed in working units
///
/// # Returns
/// Acceleration vector in working units per second²
///
/// Bodies without a finite mass or position are skipped, and so is any body
/// closer than [`MIN_GRAVITY_DISTANCE`] to avoid the singular force.
#[inline]
pub fn compute_acceleration(pos: DVec3, bodies: &[BodySnapshot], g: f64) -> DVec3 {
    let mut acc = DVec3::ZERO;

    for body in bodies {
        let Some(mass) = body.mass.filter(|m| m.is_finite()) else {
            continue;
        };
        if !body.position.is_finite() {
            continue;
        }

        let delta = body.position - pos;
        let r = delta.length();

        if r > MIN_GRAVITY_DISTANCE {
            // a = G·m/r² along delta/r
            acc += delta * (g * mass / (r * r * r));
        }
    }

    acc
}
