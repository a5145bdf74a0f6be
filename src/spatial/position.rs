//! R-tree based position index using the rstar crate.
//!
//! Provides:
//! - Exact-coordinate occupancy lookup in O(log n)
//! - Point-in-radius queries for radio coverage

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::StationId;

/// A point in the index with its station handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationPoint {
    /// The station identifier.
    pub id: StationId,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl StationPoint {
    /// Create a new StationPoint.
    pub fn new(id: StationId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for StationPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for StationPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    // Occupancy is exact equality, never a tolerance.
    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.x == point[0] && self.y == point[1]
    }
}

/// Position index over live stations.
///
/// Holds one entry per station at its current position. The owner must call
/// [`relocate`](Self::relocate) whenever a station moves.
pub struct PositionIndex {
    tree: RTree<StationPoint>,
}

impl PositionIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert a station into the index.
    pub fn insert(&mut self, id: StationId, x: f64, y: f64) {
        self.tree.insert(StationPoint::new(id, x, y));
    }

    /// Remove a station from the index.
    ///
    /// Returns true if the entry was found and removed.
    pub fn remove(&mut self, id: StationId, x: f64, y: f64) -> bool {
        self.tree.remove(&StationPoint::new(id, x, y)).is_some()
    }

    /// Move a station's entry from `from` to `to`.
    pub fn relocate(&mut self, id: StationId, from: (f64, f64), to: (f64, f64)) {
        self.remove(id, from.0, from.1);
        self.insert(id, to.0, to.1);
    }

    /// Any station sitting exactly at `(x, y)`.
    pub fn occupant(&self, x: f64, y: f64) -> Option<StationId> {
        let envelope = AABB::from_point([x, y]);
        self.tree
            .locate_in_envelope(&envelope)
            .find(|point| point.contains_point(&[x, y]))
            .map(|point| point.id)
    }

    /// Check whether any station sits exactly at `(x, y)`.
    pub fn is_occupied(&self, x: f64, y: f64) -> bool {
        self.occupant(x, y).is_some()
    }

    /// Find all stations within a radius of a point, boundary included.
    ///
    /// A negative radius covers nothing.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<StationId> {
        if radius < 0.0 {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        self.tree
            .locate_within_distance([x, y], radius_sq)
            .map(|point| point.id)
            .collect()
    }

    /// Clear all stations from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of stations in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for PositionIndex {
    fn default() -> Self {
        Self::new()
    }
}
