//! Test utilities for probe flight tests.
//!
//! Provides fixtures for bodies and probe states, plus assertions for
//! physical invariants like energy and angular momentum conservation.

use bevy::math::DVec3;

use crate::types::BodySnapshot;

/// Position and velocity of a test particle.
#[derive(Clone, Copy, Debug)]
pub struct ProbeState {
    pub pos: DVec3,
    pub vel: DVec3,
}

/// Fixtures for creating test bodies and probe states.
pub mod fixtures {
    use super::*;

    /// A massive body at the origin with a small radius.
    pub fn central_body(mass: f64) -> BodySnapshot {
        BodySnapshot::new(DVec3::ZERO, 0.01, mass)
    }

    /// A probe in a circular orbit of radius `r` around a central `gm`.
    ///
    /// The probe sits on the positive x-axis moving along +y.
    pub fn circular_orbit(r: f64, gm: f64) -> ProbeState {
        // Circular orbit velocity: v = sqrt(GM/r)
        ProbeState {
            pos: DVec3::new(r, 0.0, 0.0),
            vel: DVec3::new(0.0, (gm / r).sqrt(), 0.0),
        }
    }

    /// A probe at `r` moving along +y at 1.1x escape velocity.
    pub fn escape_trajectory(r: f64, gm: f64) -> ProbeState {
        let v_esc = (2.0 * gm / r).sqrt();
        ProbeState {
            pos: DVec3::new(r, 0.0, 0.0),
            vel: DVec3::new(0.0, v_esc * 1.1, 0.0),
        }
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy around a central `gm` at the origin.
    ///
    /// E = v²/2 - GM/r
    pub fn orbital_energy(state: ProbeState, gm: f64) -> f64 {
        0.5 * state.vel.length_squared() - gm / state.pos.length()
    }

    /// Specific angular momentum vector, L = r × v.
    pub fn angular_momentum(state: ProbeState) -> DVec3 {
        state.pos.cross(state.vel)
    }

    /// Orbital period for semi-major axis `a`, T = 2π·sqrt(a³/GM).
    pub fn orbital_period(a: f64, gm: f64) -> f64 {
        std::f64::consts::TAU * (a.powi(3) / gm).sqrt()
    }

    /// Assert that relative energy drift stays within `tolerance`.
    ///
    /// # Panics
    /// Panics if relative energy drift exceeds tolerance.
    pub fn assert_energy_conserved(initial: f64, last: f64, tolerance: f64) {
        let drift = if initial.abs() > 1e-10 {
            ((last - initial) / initial).abs()
        } else {
            (last - initial).abs()
        };
        assert!(
            drift <= tolerance,
            "Energy not conserved: initial={initial:.6e}, final={last:.6e}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_orbit_energy_is_half_potential() {
        let state = fixtures::circular_orbit(4.0, 16.0);
        assert_relative_eq!(state.vel.length(), 2.0);
        // Circular: E = -GM/(2r)
        assert_relative_eq!(assertions::orbital_energy(state, 16.0), -2.0);
    }

    #[test]
    fn test_escape_trajectory_is_unbound() {
        let state = fixtures::escape_trajectory(10.0, 5.0);
        assert!(assertions::orbital_energy(state, 5.0) > 0.0);
    }

    #[test]
    fn test_angular_momentum_is_perpendicular() {
        let state = fixtures::circular_orbit(2.0, 8.0);
        let l = assertions::angular_momentum(state);
        assert_relative_eq!(l.z, 4.0);
        assert_eq!(l.x, 0.0);
    }
}
