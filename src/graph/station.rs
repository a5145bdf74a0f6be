//! Station type and related structures.
//!
//! Stations are the vertices of the network. Each station has:
//! - A stable unique identifier (survives removal of other stations)
//! - Position (x, y) on the map

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable station identifier.
///
/// Handles are handed out by the network and never reused, so a handle to a
/// removed station stays invalid even after its storage slot is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub u32);

impl StationId {
    /// Create a new StationId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.0)
    }
}

impl From<u32> for StationId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<StationId> for u32 {
    #[inline]
    fn from(id: StationId) -> Self {
        id.0
    }
}

/// A base station: its handle and current position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    id: StationId,
    x: f64,
    y: f64,
}

impl Station {
    pub(crate) fn new(id: StationId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// The handle this station was created with.
    #[inline]
    pub fn id(&self) -> StationId {
        self.id
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Current position as `(x, y)`.
    #[inline]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Overwrite the position. Collision checks belong to the network.
    pub(crate) fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// True if this station sits exactly at `(x, y)`.
    #[inline]
    pub fn is_at(&self, x: f64, y: f64) -> bool {
        self.x == x && self.y == y
    }

    /// Euclidean distance between two stations' current positions.
    #[inline]
    pub fn distance_to(&self, other: &Station) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
