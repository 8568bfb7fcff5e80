//! Pairwise collision relaxation.
//!
//! Each pass visits every unordered pair `(i, j)` with `i < j` in index order
//! and, when the two centres are closer than the minimum separation, pushes
//! both points apart along their connecting line until they sit exactly at
//! that separation. Corrections are applied in place (Gauss-Seidel style),
//! so later pairs in the same pass see the already corrected positions.
//!
//! A connecting vector with a zero component has that component replaced by
//! a tiny jiggle from a seeded LCG. Without it, points sharing an x target
//! would only ever be pushed vertically and stack into a single column.
//! If the vector still has no usable length, the pair is split vertically.
//!
//! [`settle`] repeats passes until every pair is within tolerance of the
//! minimum separation, for crowds the per-tick passes leave overlapping.

use crate::swarm::Point;

/// Deterministic source of sub-pixel perturbations.
///
/// Linear congruential generator (a = 1664525, c = 1013904223, m = 2^32)
/// seeded with 1, so every layout run sees the same sequence.
#[derive(Debug, Clone)]
pub struct Jiggle {
    state: u64,
}

impl Jiggle {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub fn new() -> Self {
        Self { state: 1 }
    }

    #[cfg(test)]
    fn with_state(state: u64) -> Self {
        Self { state }
    }

    /// Next value in [0, 1).
    fn next_unit(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }

    /// Perturbation in (-5e-7, 5e-7).
    pub fn sample(&mut self) -> f64 {
        (self.next_unit() - 0.5) * 1e-6
    }
}

impl Default for Jiggle {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `iterations` relaxation passes.
///
/// Returns the number of pair corrections applied. A non-positive
/// `min_separation` makes this a no-op.
pub fn resolve_collisions(
    points: &mut [Point],
    min_separation: f64,
    iterations: u32,
    jiggle: &mut Jiggle,
) -> usize {
    if min_separation <= 0.0 || points.len() < 2 {
        return 0;
    }

    let min_sq = min_separation * min_separation;
    let mut corrections = 0;

    for _ in 0..iterations {
        corrections += relax_pass(points, min_separation, min_sq, jiggle);
    }

    corrections
}

/// Outcome of [`settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    /// Passes run.
    pub passes: u32,
    /// Whether every pair ended within tolerance of the separation.
    pub converged: bool,
}

/// Run relaxation passes until no pair is closer than
/// `min_separation - tolerance`, or `max_passes` is exhausted.
///
/// Unlike the per-tick passes there are no forces in between, so a crowded
/// swarm can only expand.
pub fn settle(
    points: &mut [Point],
    min_separation: f64,
    tolerance: f64,
    max_passes: u32,
    jiggle: &mut Jiggle,
) -> Settled {
    if min_separation <= 0.0 || points.len() < 2 {
        return Settled {
            passes: 0,
            converged: true,
        };
    }

    let min_sq = min_separation * min_separation;
    let floor = min_separation - tolerance;
    let mut passes = 0;

    loop {
        let closest = min_pairwise_distance(points).unwrap_or(f64::INFINITY);
        if closest >= floor {
            return Settled {
                passes,
                converged: true,
            };
        }
        if passes == max_passes {
            return Settled {
                passes,
                converged: false,
            };
        }
        relax_pass(points, min_separation, min_sq, jiggle);
        passes += 1;
    }
}

/// One in-order sweep over every pair. Returns the corrections applied.
fn relax_pass(
    points: &mut [Point],
    min_separation: f64,
    min_sq: f64,
    jiggle: &mut Jiggle,
) -> usize {
    let mut corrections = 0;
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let (head, tail) = points.split_at_mut(j);
            if separate(&mut head[i], &mut tail[0], min_separation, min_sq, jiggle) {
                corrections += 1;
            }
        }
    }
    corrections
}

/// Push `a` and `b` apart if they overlap. Returns true if they moved.
fn separate(
    a: &mut Point,
    b: &mut Point,
    min_separation: f64,
    min_sq: f64,
    jiggle: &mut Jiggle,
) -> bool {
    let mut dx = b.x - a.x;
    let mut dy = b.y - a.y;
    if dx * dx + dy * dy >= min_sq {
        return false;
    }

    if dx == 0.0 {
        dx = jiggle.sample();
    }
    if dy == 0.0 {
        dy = jiggle.sample();
    }

    let distance = (dx * dx + dy * dy).sqrt();
    let (ux, uy, distance) = if distance > 0.0 {
        (dx / distance, dy / distance, distance)
    } else {
        // Jiggle landed on zero or the squares underflowed.
        (0.0, 1.0, 0.0)
    };
    let half = (min_separation - distance) / 2.0;

    a.x -= ux * half;
    a.y -= uy * half;
    b.x += ux * half;
    b.y += uy * half;
    true
}

/// Sum of separation shortfalls over all pairs.
pub fn total_overlap(points: &[Point], min_separation: f64) -> f64 {
    if min_separation <= 0.0 {
        return 0.0;
    }

    let mut total = 0.0;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.distance_to(b);
            if d < min_separation {
                total += min_separation - d;
            }
        }
    }
    total
}

/// Smallest centre-to-centre distance, or None for fewer than two points.
pub fn min_pairwise_distance(points: &[Point]) -> Option<f64> {
    let mut min: Option<f64> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.distance_to(b);
            min = Some(min.map_or(d, |m| m.min(d)));
        }
    }
    min
}
