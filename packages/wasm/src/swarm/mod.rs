//! Swarm data structures.
//!
//! This module provides the point type and the engine that owns a point set,
//! runs layouts over it and answers hit-test queries against the result.

mod engine;
mod point;

pub use engine::SwarmEngine;
pub use point::{Point, PointId};
