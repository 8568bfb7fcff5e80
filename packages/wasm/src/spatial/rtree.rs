//! R-tree based spatial index using the rstar crate.
//!
//! Nearest-point lookup stands in for a voronoi diagram: the cell a cursor
//! falls in is exactly the cell of its nearest point.
//!
//! rstar panics on NaN coordinates, so points with a non-finite coordinate
//! are never indexed and non-finite queries find nothing.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::swarm::PointId;

/// A laid-out point with its identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
}

impl IndexedPoint {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        (self.x - point[0]).abs() < f64::EPSILON && (self.y - point[1]).abs() < f64::EPSILON
    }
}

/// Spatial index over laid-out points.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load an index from `(id, x, y)` tuples.
    pub fn from_points(points: &[(PointId, f64, f64)]) -> Self {
        let mut index = Self::new();
        index.rebuild(points);
        index
    }

    /// Index a point. Returns false, leaving the index unchanged, if a
    /// coordinate is not finite.
    pub fn insert(&mut self, id: PointId, x: f64, y: f64) -> bool {
        if !is_finite(x, y) {
            return false;
        }
        self.tree.insert(IndexedPoint::new(id, x, y));
        true
    }

    /// Find the nearest point. Ties resolve to the lowest id.
    pub fn nearest(&self, x: f64, y: f64) -> Option<PointId> {
        if !is_finite(x, y) {
            return None;
        }
        let query = [x, y];
        let best = self.tree.nearest_neighbor(&query)?;
        let best_sq = best.distance_2(&query);
        // rstar breaks ties arbitrarily; keep hover stable for equidistant points.
        self.tree
            .locate_within_distance(query, best_sq)
            .map(|point| point.id)
            .min()
            .or(Some(best.id))
    }

    /// Find the nearest point within a maximum distance.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<PointId> {
        let max_distance_sq = max_distance * max_distance;
        let id = self.nearest(x, y)?;
        self.tree
            .locate_within_distance([x, y], max_distance_sq)
            .any(|point| point.id == id)
            .then_some(id)
    }

    /// Find all points inside a rectangle.
    pub fn in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<PointId> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut ids: Vec<PointId> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|point| point.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Find all points within a radius of a location.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<PointId> {
        if !is_finite(x, y) {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        let mut ids: Vec<PointId> = self
            .tree
            .locate_within_distance([x, y], radius_sq)
            .map(|point| point.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Replace the index contents; cheaper than incremental inserts.
    pub fn rebuild(&mut self, points: &[(PointId, f64, f64)]) {
        let indexed: Vec<_> = points
            .iter()
            .filter(|&&(_, x, y)| is_finite(x, y))
            .map(|&(id, x, y)| IndexedPoint::new(id, x, y))
            .collect();

        self.tree = RTree::bulk_load(indexed);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn is_finite(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_nearest() {
        let mut index = SpatialIndex::new();
        index.insert(PointId(0), 0.0, 0.0);
        index.insert(PointId(1), 10.0, 10.0);
        index.insert(PointId(2), 5.0, 5.0);

        assert_eq!(index.nearest(0.0, 0.0), Some(PointId(0)));
        assert_eq!(index.nearest(6.0, 6.0), Some(PointId(2)));
        assert_eq!(index.nearest(11.0, 11.0), Some(PointId(1)));
    }

    #[test]
    fn test_nearest_tie_prefers_lowest_id() {
        let index = SpatialIndex::from_points(&[
            (PointId(3), 2.0, 0.0),
            (PointId(1), -2.0, 0.0),
            (PointId(2), 0.0, 2.0),
        ]);
        assert_eq!(index.nearest(0.0, 0.0), Some(PointId(1)));
    }

    #[test]
    fn test_nearest_within() {
        let mut index = SpatialIndex::new();
        index.insert(PointId(0), 0.0, 0.0);
        index.insert(PointId(1), 10.0, 10.0);

        assert_eq!(index.nearest_within(0.0, 0.0, 5.0), Some(PointId(0)));
        assert_eq!(index.nearest_within(5.0, 5.0, 1.0), None);
        // ~7.07 away
        assert_eq!(index.nearest_within(5.0, 5.0, 8.0), Some(PointId(0)));
    }

    #[test]
    fn test_in_rect() {
        let index = SpatialIndex::from_points(&[
            (PointId(0), 0.0, 0.0),
            (PointId(1), 5.0, 5.0),
            (PointId(2), 10.0, 10.0),
        ]);

        assert_eq!(index.in_rect(-1.0, -1.0, 6.0, 6.0), vec![PointId(0), PointId(1)]);
    }

    #[test]
    fn test_in_radius() {
        let index = SpatialIndex::from_points(&[
            (PointId(0), 0.0, 0.0),
            (PointId(1), 3.0, 0.0),
            (PointId(2), 10.0, 0.0),
        ]);

        assert_eq!(index.in_radius(0.0, 0.0, 5.0), vec![PointId(0), PointId(1)]);
    }

    #[test]
    fn test_rebuild() {
        let mut index = SpatialIndex::new();
        index.insert(PointId(0), 0.0, 0.0);

        index.rebuild(&[
            (PointId(1), 1.0, 1.0),
            (PointId(2), 2.0, 2.0),
            (PointId(3), 3.0, 3.0),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.nearest(0.0, 0.0), Some(PointId(1)));
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let mut index = SpatialIndex::from_points(&[
            (PointId(0), 0.0, 0.0),
            (PointId(1), f64::NAN, 3.0),
            (PointId(2), 4.0, f64::INFINITY),
            (PointId(3), 6.0, 0.0),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.nearest(3.0, 3.0), Some(PointId(0)));

        assert!(!index.insert(PointId(4), f64::NAN, f64::NAN));
        assert!(index.insert(PointId(5), 3.0, 3.0));
        assert_eq!(index.len(), 3);
        assert_eq!(index.nearest(3.0, 3.0), Some(PointId(5)));
    }

    #[test]
    fn test_non_finite_query_finds_nothing() {
        let index = SpatialIndex::from_points(&[(PointId(0), 0.0, 0.0)]);
        assert_eq!(index.nearest(f64::NAN, 0.0), None);
        assert_eq!(index.nearest_within(0.0, f64::NAN, 10.0), None);
        assert!(index.in_radius(f64::NAN, f64::NAN, 10.0).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut index = SpatialIndex::new();
        index.insert(PointId(0), 0.0, 0.0);
        index.insert(PointId(1), 1.0, 1.0);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.nearest(0.0, 0.0), None);
    }
}
