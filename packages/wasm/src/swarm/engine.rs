//! SwarmEngine - owns a point set and its layout.
//!
//! The engine keeps the points in insertion order (which is also the
//! collision-resolution order), the parameters used for layout runs, and a
//! spatial index over the laid-out positions for hit testing.

use std::cell::{Cell, RefCell};

use log::debug;

use super::point::{Point, PointId};
use crate::error::Result;
use crate::layout::{LayoutParams, compute_layout, total_overlap};
use crate::spatial::SpatialIndex;

/// The core swarm engine.
pub struct SwarmEngine {
    /// Points in insertion order.
    points: Vec<Point>,

    /// Parameters for the next layout run.
    params: LayoutParams,

    /// Spatial index for hit testing, rebuilt lazily after positions change.
    spatial: RefCell<SpatialIndex>,

    /// Whether the spatial index needs rebuilding.
    spatial_dirty: Cell<bool>,
}

impl SwarmEngine {
    /// Create an empty engine with default layout parameters.
    pub fn new() -> Self {
        Self::with_params(LayoutParams::default())
    }

    /// Create an empty engine with the given layout parameters.
    pub fn with_params(params: LayoutParams) -> Self {
        Self {
            points: Vec::new(),
            params,
            spatial: RefCell::new(SpatialIndex::new()),
            spatial_dirty: Cell::new(false),
        }
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Add a point resting at its target.
    ///
    /// Non-finite targets are accepted here and rejected by the next
    /// `run_layout`; such points are never returned by spatial queries.
    pub fn add_point(&mut self, target_x: f64, target_y: f64) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points.push(Point::new(target_x, target_y));
        self.mark_dirty();
        id
    }

    /// Add one point per y target, all sharing `target_x`.
    ///
    /// Returns the number of points added.
    pub fn add_points_from_targets(&mut self, targets_y: &[f64], target_x: f64) -> u32 {
        self.points.reserve(targets_y.len());
        for &target_y in targets_y {
            self.points.push(Point::new(target_x, target_y));
        }
        self.mark_dirty();
        targets_y.len() as u32
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.index())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.spatial.borrow_mut().clear();
        self.spatial_dirty.set(false);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn set_params(&mut self, params: LayoutParams) {
        self.params = params;
    }

    /// Reset every point to its target and run a fresh layout.
    ///
    /// On error the points are left at their targets.
    pub fn run_layout(&mut self) -> Result<()> {
        for p in &mut self.points {
            p.reset();
        }
        self.mark_dirty();

        compute_layout(&mut self.points, &self.params)?;
        debug!("engine laid out {} points", self.points.len());
        Ok(())
    }

    /// Current positions as `[x0, y0, x1, y1, ...]`.
    pub fn positions(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Sum of separation shortfalls at the current positions.
    pub fn total_overlap(&self) -> f64 {
        total_overlap(&self.points, self.params.min_separation)
    }

    /// Bounding box of the current positions as (min_x, min_y, max_x, max_y).
    pub fn get_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.points.iter().fold(init, |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        }))
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the point nearest to a location.
    pub fn find_nearest(&self, x: f64, y: f64) -> Option<PointId> {
        self.ensure_spatial_index();
        self.spatial.borrow().nearest(x, y)
    }

    /// Find the nearest point within a maximum distance.
    pub fn find_nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<PointId> {
        self.ensure_spatial_index();
        self.spatial.borrow().nearest_within(x, y, max_distance)
    }

    /// Find all points inside a rectangle.
    pub fn find_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<PointId> {
        self.ensure_spatial_index();
        self.spatial.borrow().in_rect(min_x, min_y, max_x, max_y)
    }

    /// Rebuild the spatial index now instead of on the next query.
    pub fn rebuild_spatial_index(&self) {
        let points: Vec<_> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId(i as u32), p.x, p.y))
            .collect();
        self.spatial.borrow_mut().rebuild(&points);
        self.spatial_dirty.set(false);
    }

    fn ensure_spatial_index(&self) {
        if self.spatial_dirty.get() {
            self.rebuild_spatial_index();
        }
    }

    fn mark_dirty(&self) {
        self.spatial_dirty.set(true);
    }
}

impl Default for SwarmEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::layout::min_pairwise_distance;

    #[test]
    fn test_add_points() {
        let mut engine = SwarmEngine::new();
        let a = engine.add_point(50.0, 10.0);
        let b = engine.add_point(50.0, 20.0);
        assert_eq!(a, PointId(0));
        assert_eq!(b, PointId(1));
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.point(b).map(|p| p.y), Some(20.0));
        assert!(engine.point(PointId(2)).is_none());
    }

    #[test]
    fn test_add_points_from_targets() {
        let mut engine = SwarmEngine::new();
        let added = engine.add_points_from_targets(&[1.0, 2.0, 3.0], 7.0);
        assert_eq!(added, 3);
        assert_eq!(engine.positions(), vec![7.0, 1.0, 7.0, 2.0, 7.0, 3.0]);
    }

    #[test]
    fn test_run_layout_separates_points() {
        let mut engine = SwarmEngine::with_params(LayoutParams {
            min_separation: 5.0,
            ..Default::default()
        });
        engine.add_points_from_targets(&[100.0, 100.0, 100.0], 50.0);
        engine.run_layout().unwrap();

        let min = min_pairwise_distance(engine.points()).unwrap();
        assert!(min >= 5.0 - 1e-6);
        assert!(engine.total_overlap() < 1e-6);
    }

    #[test]
    fn test_run_layout_twice_is_repeatable() {
        let mut engine = SwarmEngine::new();
        engine.add_points_from_targets(&[40.0, 41.0, 42.0, 40.0, 44.0, 41.5], 30.0);

        engine.run_layout().unwrap();
        let first = engine.positions();
        engine.run_layout().unwrap();
        assert_eq!(first, engine.positions());
    }

    #[test]
    fn test_run_layout_error_leaves_targets() {
        let mut engine = SwarmEngine::new();
        engine.add_point(0.0, 0.0);
        engine.add_point(0.0, f64::INFINITY);
        assert!(matches!(
            engine.run_layout(),
            Err(LayoutError::InvalidInput { index: 1, .. })
        ));
        assert_eq!(engine.point(PointId(0)), Some(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_non_finite_point_does_not_break_queries() {
        let mut engine = SwarmEngine::new();
        let targets: Vec<f64> = (0..30).map(|i| i as f64 * 10.0).collect();
        engine.add_points_from_targets(&targets, 0.0);
        let bad = engine.add_point(0.0, f64::NAN);

        assert!(matches!(
            engine.run_layout(),
            Err(LayoutError::InvalidInput { index: 30, .. })
        ));
        assert_eq!(engine.find_nearest(3.0, 3.0), Some(PointId(0)));
        assert_eq!(engine.find_nearest_within(0.0, 291.0, 5.0), Some(PointId(29)));
        assert!(!engine.find_in_rect(-1.0, -1.0, 1.0, 1000.0).contains(&bad));
    }

    #[test]
    fn test_nearest_follows_layout() {
        let mut engine = SwarmEngine::with_params(LayoutParams {
            min_separation: 10.0,
            ..Default::default()
        });
        engine.add_points_from_targets(&[0.0, 0.0], 0.0);
        engine.run_layout().unwrap();

        for (i, p) in engine.points().iter().enumerate() {
            assert_eq!(engine.find_nearest(p.x, p.y), Some(PointId(i as u32)));
        }
        assert_eq!(engine.find_nearest_within(500.0, 500.0, 10.0), None);
    }

    #[test]
    fn test_bounds() {
        let mut engine = SwarmEngine::new();
        assert_eq!(engine.get_bounds(), None);

        engine.add_point(1.0, 5.0);
        engine.add_point(-2.0, 3.0);
        engine.add_point(4.0, -1.0);
        assert_eq!(engine.get_bounds(), Some((-2.0, -1.0, 4.0, 5.0)));
    }

    #[test]
    fn test_find_in_rect() {
        let mut engine = SwarmEngine::new();
        engine.add_point(0.0, 0.0);
        engine.add_point(5.0, 5.0);
        engine.add_point(10.0, 10.0);
        assert_eq!(
            engine.find_in_rect(-1.0, -1.0, 6.0, 6.0),
            vec![PointId(0), PointId(1)]
        );
    }

    #[test]
    fn test_clear() {
        let mut engine = SwarmEngine::new();
        engine.add_points_from_targets(&[1.0, 2.0], 0.0);
        assert_eq!(engine.find_nearest(0.0, 1.0), Some(PointId(0)));

        engine.clear();
        assert!(engine.is_empty());
        assert_eq!(engine.find_nearest(0.0, 1.0), None);

        // Ids restart after a clear.
        assert_eq!(engine.add_point(3.0, 3.0), PointId(0));
    }
}
