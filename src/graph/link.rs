//! Link type.
//!
//! A link is a bidirectional radio connection between two stations. It has no
//! weight: the cost of crossing it is the distance between its endpoints'
//! current positions, computed when needed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::station::StationId;

/// Unordered pair of station handles.
///
/// `Link::new(a, b) == Link::new(b, a)`, and both hash the same.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Link {
    a: StationId,
    b: StationId,
}

impl Link {
    /// Create a link between `a` and `b`.
    #[inline]
    pub fn new(a: StationId, b: StationId) -> Self {
        Self { a, b }
    }

    /// Both endpoints, in construction order.
    #[inline]
    pub fn endpoints(self) -> (StationId, StationId) {
        (self.a, self.b)
    }

    /// Check whether `id` is one of the endpoints.
    #[inline]
    pub fn contains(self, id: StationId) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint across from `id`, or `None` if `id` is not on this link.
    pub fn opposite(self, id: StationId) -> Option<StationId> {
        if id == self.a {
            Some(self.b)
        } else if id == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Endpoints ordered low-high, used for symmetric equality and hashing.
    #[inline]
    fn key(self) -> (StationId, StationId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({} <-> {})", self.a.0, self.b.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_link_equality_is_symmetric() {
        let a = StationId(1);
        let b = StationId(2);
        assert_eq!(Link::new(a, b), Link::new(b, a));
        assert_ne!(Link::new(a, b), Link::new(a, StationId(3)));
    }

    #[test]
    fn test_link_hash_is_symmetric() {
        let mut set = HashSet::new();
        set.insert(Link::new(StationId(5), StationId(9)));
        assert!(set.contains(&Link::new(StationId(9), StationId(5))));
        assert!(!set.insert(Link::new(StationId(9), StationId(5))));
    }

    #[test]
    fn test_opposite() {
        let link = Link::new(StationId(0), StationId(1));
        assert_eq!(link.opposite(StationId(0)), Some(StationId(1)));
        assert_eq!(link.opposite(StationId(1)), Some(StationId(0)));
        assert_eq!(link.opposite(StationId(7)), None);
    }

    #[test]
    fn test_display() {
        let link = Link::new(StationId(3), StationId(4));
        assert_eq!(format!("{}", link), "Link(3 <-> 4)");
        assert!(link.contains(StationId(4)));
        assert!(!link.contains(StationId(2)));
        assert_eq!(link.endpoints(), (StationId(3), StationId(4)));
    }
}
