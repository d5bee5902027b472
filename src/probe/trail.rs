//! Bounded history of recent probe positions, drawn as a ribbon.

use std::collections::VecDeque;

use bevy::math::DVec3;

/// Ordered trail of recent positions, oldest first.
///
/// Trails start with two coincident points because a single point is a
/// degenerate curve that ribbon generation cannot handle.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<DVec3>,
    capacity: usize,
    /// Bumped whenever the drawable geometry changes.
    revision: u64,
}

impl Trail {
    /// Start a trail at `origin`. Capacity is at least two points.
    pub fn new(origin: DVec3, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut points = VecDeque::with_capacity(capacity + 1);
        points.push_back(origin);
        points.push_back(origin);
        Self {
            points,
            capacity,
            revision: 0,
        }
    }

    /// Append a point, dropping the oldest once the capacity is exceeded.
    pub fn push(&mut self, point: DVec3) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
        if self.is_drawable() {
            self.revision += 1;
        }
    }

    /// A ribbon needs at least two points.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = &DVec3> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<DVec3> {
        self.points.back().copied()
    }
}
