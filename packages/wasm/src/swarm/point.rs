//! Point type and related structures.
//!
//! A point is one circle of the swarm. Each point has:
//! - A target position (shared x, per-point y) it is pulled toward
//! - A current position (x, y), initialized to the target
//! - A velocity (vx, vy) carried between simulation ticks

use std::fmt;

/// Stable point identifier.
///
/// Points are never removed individually, so the ID doubles as the index
/// into the engine's point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u32);

impl PointId {
    /// Create a new PointId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into the engine's point buffer.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", self.0)
    }
}

impl From<u32> for PointId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<PointId> for u32 {
    #[inline]
    fn from(id: PointId) -> Self {
        id.0
    }
}

/// A simulated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X position the point is pulled toward (shared by the whole swarm).
    pub target_x: f64,
    /// Y position the point is pulled toward.
    pub target_y: f64,
    /// Current X position.
    pub x: f64,
    /// Current Y position.
    pub y: f64,
    /// X velocity.
    pub vx: f64,
    /// Y velocity.
    pub vy: f64,
}

impl Point {
    /// Create a point resting at its target.
    #[inline]
    pub fn new(target_x: f64, target_y: f64) -> Self {
        Self {
            target_x,
            target_y,
            x: target_x,
            y: target_y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Put the point back at its target with zero velocity.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new(self.target_x, self.target_y);
    }

    /// Euclidean distance between the current positions of two points.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
