//! Core physics types and constants for the probe flight simulation.

use bevy::math::DVec3;
use bevy::prelude::*;

/// System sets ordering the per-frame simulation.
///
/// Body positions must be refreshed before probes sample gravity, so the
/// sets are chained `Orbits -> Probes -> Effects`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Simulation clock advance and body position refresh.
    Orbits,
    /// Launch handling and probe integration.
    Probes,
    /// Explosion afterglow decay.
    Effects,
}

// Physical constants (SI units)

/// Gravitational constant (m³·kg⁻¹·s⁻²)
pub const G: f64 = 6.67430e-11;

/// Astronomical unit in kilometers
pub const AU_TO_KM: f64 = 1.495978707e8;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

// Simulation limits

/// Hard capacity of the live probe pool.
pub const MAX_PROBES: usize = 50;

/// Maximum number of points retained in a probe trail.
pub const TRAIL_CAPACITY: usize = 100;

/// Probes farther than this from their local origin are culled (working units).
pub const MAX_RANGE: f64 = 20_000.0;

/// Defensive cap on simultaneously live explosions.
pub const MAX_EXPLOSIONS: usize = 64;

/// Kepler solver: stop when the Newton correction drops below this (radians).
pub const KEPLER_TOLERANCE: f64 = 1e-8;

/// Kepler solver: hard iteration limit.
pub const KEPLER_MAX_ITERATIONS: usize = 100;

/// Kepler solver: abort when |1 - e·cos E| falls below this.
pub const KEPLER_MIN_DERIVATIVE: f64 = 1e-12;

/// Largest eccentricity the solver accepts; anything above is clamped.
pub const MAX_ECCENTRICITY: f64 = 0.999_999;

/// Below this separation (working units) a body exerts no force.
pub const MIN_GRAVITY_DISTANCE: f64 = 1e-6;

/// Conversion between physical kilometers and simulation working units.
///
/// All positions, radii, and velocities inside the simulation are expressed
/// in working units (and working units per second).
#[derive(Resource, Clone, Copy, Debug)]
pub struct UnitSystem {
    /// Kilometers represented by one working unit.
    pub km_per_unit: f64,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self { km_per_unit: 1.0e5 }
    }
}

impl UnitSystem {
    pub fn km_to_units(&self, km: f64) -> f64 {
        km / self.km_per_unit
    }

    pub fn units_to_km(&self, units: f64) -> f64 {
        units * self.km_per_unit
    }

    /// Astronomical units to working units.
    pub fn au_to_units(&self, au: f64) -> f64 {
        self.km_to_units(au * AU_TO_KM)
    }

    /// Gravitational constant in working units (units³·kg⁻¹·s⁻²).
    ///
    /// Masses stay in kilograms and time in seconds, so only the length
    /// dimension is rescaled.
    pub fn gravitational_constant(&self) -> f64 {
        let meters_per_unit = self.km_per_unit * 1000.0;
        G / (meters_per_unit * meters_per_unit * meters_per_unit)
    }
}

/// Tunables for the probe simulation.
#[derive(Resource, Clone, Debug)]
pub struct ProbeConfig {
    /// Live probe capacity; launching past it evicts the oldest probe.
    pub max_probes: usize,
    /// Points kept per trail.
    pub trail_capacity: usize,
    /// Range cull threshold in working units.
    pub max_range: f64,
    /// Multiplier applied to physical body radii for collision tests.
    pub size_scale: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_probes: MAX_PROBES,
            trail_capacity: TRAIL_CAPACITY,
            max_range: MAX_RANGE,
            size_scale: 20.0,
        }
    }
}

/// A celestial body as seen by the probe simulation for one frame.
///
/// Produced by the body table each frame and treated as read-only by
/// gravity and collision code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    /// Position in the bodies' frame (working units).
    pub position: DVec3,
    /// Physical radius (working units), before the size scale is applied.
    pub radius: f64,
    /// Mass in kilograms. Bodies without a mass exert no gravity.
    pub mass: Option<f64>,
}

impl BodySnapshot {
    pub fn new(position: DVec3, radius: f64, mass: f64) -> Self {
        Self {
            position,
            radius,
            mass: Some(mass),
        }
    }

    /// Collision radius once the active size scale is applied.
    pub fn collision_radius(&self, size_scale: f64) -> f64 {
        self.radius * size_scale
    }
}

/// Bodies refreshed for the current frame, in body-table order.
#[derive(Resource, Clone, Debug, Default)]
pub struct BodySnapshots(pub Vec<BodySnapshot>);

/// Translation of the probes' local frame relative to the bodies' frame.
///
/// Probes store positions relative to a frame that may itself be moving
/// (for example with the viewpoint), so every gravity and collision query
/// adds this offset first.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct FrameOffset(pub DVec3);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_conversions() {
        let units = UnitSystem { km_per_unit: 1000.0 };
        assert_relative_eq!(units.km_to_units(5000.0), 5.0);
        assert_relative_eq!(units.units_to_km(5.0), 5000.0);
        assert_relative_eq!(units.au_to_units(1.0), AU_TO_KM / 1000.0);
    }

    #[test]
    fn test_gravitational_constant_scales_with_length_cubed() {
        // One working unit = one meter leaves G unchanged.
        let meters = UnitSystem { km_per_unit: 0.001 };
        assert_relative_eq!(meters.gravitational_constant(), G, max_relative = 1e-12);

        // One working unit = one kilometer divides by 1000³.
        let km = UnitSystem { km_per_unit: 1.0 };
        assert_relative_eq!(km.gravitational_constant(), G * 1e-9, max_relative = 1e-12);
    }

    #[test]
    fn test_collision_radius_applies_size_scale() {
        let body = BodySnapshot::new(DVec3::ZERO, 2.5, 1.0);
        assert_relative_eq!(body.collision_radius(4.0), 10.0);
    }

    #[test]
    fn test_probe_config_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.max_probes, 50);
        assert_eq!(config.trail_capacity, 100);
        assert_eq!(config.max_range, 20_000.0);
    }
}
