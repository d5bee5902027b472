//! Ephemeris module for computing celestial body positions.
//!
//! Bodies live in a flat [`BodyTable`] indexed by [`BodyId`]. Each body's
//! orbit is analytic (see [`kepler`]) and relative to its parent; absolute
//! positions are resolved by walking parent links. Bodies do not attract
//! each other, they only follow their fixed orbits.

pub mod data;
pub mod kepler;

#[cfg(test)]
mod proptest_ephemeris;

pub use data::solar_system;
pub use kepler::{OrbitalElements, solve_eccentric_anomaly, solve_position};

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::types::BodySnapshot;

/// Index of a body in its [`BodyTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// Errors raised while building a body table.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BodyTableError {
    #[error("parent {parent:?} of body '{name}' is not in the table")]
    UnknownParent { name: String, parent: BodyId },
    #[error("a body named '{0}' already exists")]
    DuplicateName(String),
    #[error("body '{name}' has invalid radius {radius}")]
    InvalidRadius { name: String, radius: f64 },
}

/// A body following a fixed Keplerian orbit around an optional parent.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub name: String,
    pub parent: Option<BodyId>,
    pub elements: OrbitalElements,
    /// Mass in kilograms.
    pub mass: Option<f64>,
    /// Physical radius in working units.
    pub radius: f64,
    /// Simulated days accumulated since the epoch of the elements.
    pub elapsed_days: f64,
    /// Position relative to the parent, refreshed by [`BodyTable::advance`].
    local_position: DVec3,
}

impl CelestialBody {
    pub fn new(name: impl Into<String>, elements: OrbitalElements, mass: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            parent: None,
            elements,
            mass: Some(mass),
            radius,
            elapsed_days: 0.0,
            local_position: DVec3::ZERO,
        }
    }

    /// A body without mass: it can be hit but exerts no gravity.
    pub fn massless(name: impl Into<String>, elements: OrbitalElements, radius: f64) -> Self {
        Self {
            mass: None,
            ..Self::new(name, elements, 0.0, radius)
        }
    }

    /// A body fixed at the origin of its parent (or of the table).
    pub fn stationary(name: impl Into<String>, mass: f64, radius: f64) -> Self {
        Self::new(name, OrbitalElements::default(), mass, radius)
    }

    pub fn orbiting(mut self, parent: BodyId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Position relative to the parent at the current elapsed time.
    pub fn local_position(&self) -> DVec3 {
        self.local_position
    }

    fn refresh(&mut self) {
        self.local_position = solve_position(&self.elements, self.elapsed_days);
    }
}

/// Resource holding every celestial body, in insertion order.
///
/// A parent must be inserted before its children, so parent links always
/// point to lower indices and the hierarchy cannot contain cycles.
#[derive(Resource, Clone, Debug, Default)]
pub struct BodyTable {
    bodies: Vec<CelestialBody>,
}

impl BodyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its id.
    pub fn insert(&mut self, mut body: CelestialBody) -> Result<BodyId, BodyTableError> {
        if let Some(parent) = body.parent
            && parent.0 >= self.bodies.len()
        {
            return Err(BodyTableError::UnknownParent {
                name: body.name,
                parent,
            });
        }
        if self.find_by_name(&body.name).is_some() {
            return Err(BodyTableError::DuplicateName(body.name));
        }
        if !body.radius.is_finite() || body.radius < 0.0 {
            return Err(BodyTableError::InvalidRadius {
                radius: body.radius,
                name: body.name,
            });
        }

        body.refresh();
        self.bodies.push(body);
        Ok(BodyId(self.bodies.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(BodyId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Advance every body's clock by `delta_days` and recompute its orbit.
    ///
    /// A non-finite delta is ignored so body positions are never corrupted.
    pub fn advance(&mut self, delta_days: f64) {
        if !delta_days.is_finite() {
            return;
        }
        for body in &mut self.bodies {
            body.elapsed_days += delta_days;
            body.refresh();
        }
    }

    /// Position in the table frame, summing local positions up the parent chain.
    pub fn absolute_position(&self, id: BodyId) -> Option<DVec3> {
        let mut body = self.get(id)?;
        let mut position = body.local_position;
        // Parents always have lower indices, so the walk is bounded by the table size.
        for _ in 0..self.bodies.len() {
            let Some(parent) = body.parent else {
                return Some(position);
            };
            body = self.get(parent)?;
            position += body.local_position;
        }
        None
    }

    /// Per-frame view of every body, indexed like the table.
    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.iter()
            .map(|(id, body)| BodySnapshot {
                // Unresolvable bodies keep their slot so indices match ids
                position: self.absolute_position(id).unwrap_or(DVec3::NAN),
                radius: body.radius,
                mass: body.mass,
            })
            .collect()
    }
}
