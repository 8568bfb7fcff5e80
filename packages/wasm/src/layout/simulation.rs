//! One-shot force relaxation for beeswarm layouts.
//!
//! Every point is pulled toward its own y target and a shared x target while
//! a pairwise collision pass keeps circles from overlapping. The forces run
//! for a fixed number of ticks; only the final settling has a stop condition.
//!
//! # Tick
//!
//! 1. **Cool:** `alpha += (alpha_target - alpha) * alpha_decay`.
//! 2. **Attract:** each velocity gains `(target - position) * strength * alpha`
//!    per axis, loses `velocity_decay` of itself, then moves the point.
//! 3. **Collide:** `collision_iterations` passes of pairwise relaxation, see
//!    [`super::collide`].
//!
//! After the last tick, collision-only passes run until every pair sits at
//! least `min_separation` apart (within a small tolerance), bounded by
//! `max_settle_passes`. The attraction pulls a dense column back together
//! every tick, so the per-tick passes alone can end with overlap.

use log::{debug, trace, warn};

use super::collide::{Jiggle, resolve_collisions, settle, total_overlap};
use super::params::LayoutParams;
use crate::error::{LayoutError, Result};
use crate::swarm::Point;

/// Run the simulation in place and hand the same slice back.
///
/// Inputs are validated before anything is mutated. An empty slice is
/// returned untouched.
pub fn compute_layout<'a>(
    points: &'a mut [Point],
    params: &LayoutParams,
) -> Result<&'a mut [Point]> {
    validate_points(points)?;
    params.validate()?;

    if points.is_empty() {
        return Ok(points);
    }

    let mut alpha = params.alpha;
    let mut jiggle = Jiggle::new();
    let retain = 1.0 - params.velocity_decay;
    let mut corrections = 0;

    for tick in 0..params.tick_count {
        alpha += (params.alpha_target - alpha) * params.alpha_decay;
        trace!("tick {tick}: alpha={alpha:.5}");

        for p in points.iter_mut() {
            p.vx += (p.target_x - p.x) * params.strength_x * alpha;
            p.vy += (p.target_y - p.y) * params.strength_y * alpha;
            p.vx *= retain;
            p.vy *= retain;
            p.x += p.vx;
            p.y += p.vy;
        }

        if params.collisions_enabled() {
            corrections += resolve_collisions(
                points,
                params.min_separation,
                params.collision_iterations,
                &mut jiggle,
            );
        }
    }

    let mut settle_passes = 0;
    if params.collisions_enabled() && params.tick_count > 0 {
        let settled = settle(
            points,
            params.min_separation,
            params.settle_tolerance(),
            params.max_settle_passes,
            &mut jiggle,
        );
        settle_passes = settled.passes;
        if !settled.converged && params.max_settle_passes > 0 {
            warn!(
                "layout still overlaps after {} settle passes; residual overlap {:.3}",
                settled.passes,
                total_overlap(points, params.min_separation)
            );
        }
    }

    debug!(
        "layout of {} points: {} ticks, {} corrections, {} settle passes, overlap {:.4}",
        points.len(),
        params.tick_count,
        corrections,
        settle_passes,
        total_overlap(points, params.min_separation)
    );

    Ok(points)
}

fn validate_points(points: &[Point]) -> Result<()> {
    for (index, p) in points.iter().enumerate() {
        if !p.target_x.is_finite() {
            return Err(LayoutError::non_finite(index, "target_x", p.target_x));
        }
        if !p.target_y.is_finite() {
            return Err(LayoutError::non_finite(index, "target_y", p.target_y));
        }
    }
    Ok(())
}
