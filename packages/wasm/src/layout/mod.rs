//! Beeswarm layout.
//!
//! This module computes collision-free positions for circles that are pulled
//! toward per-point y targets and a shared x target. It is a pure, in-memory
//! computation: the caller owns the point buffer and the simulation mutates
//! it in place.

pub mod collide;
pub mod params;
pub mod simulation;

pub use collide::{min_pairwise_distance, total_overlap};
pub use params::LayoutParams;
pub use simulation::compute_layout;
