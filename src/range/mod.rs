//! Range-constrained reachability queries.
//!
//! Both queries measure range from the start station, never along the path:
//! a station is admissible at range `r` when it lies within `r` of the start.
//!
//! - `path`: range-bounded path search (breadth-first, or depth-first)
//! - `minimum`: smallest range that still admits a path

pub(crate) mod minimum;
pub(crate) mod path;

use serde::{Deserialize, Serialize};

/// Strategy used by `find_path`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathSearch {
    /// Layer-by-layer search. Returned paths have the fewest hops.
    #[default]
    BreadthFirst,
    /// Deepest-first search. Finds a path whenever one exists, hop count
    /// is not minimised.
    DepthFirst,
}

/// Configuration for range queries and position bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RangeConfig {
    /// Search used by `find_path` (default: breadth-first).
    pub path_search: PathSearch,
    /// Check move collisions against the R-tree instead of scanning every
    /// station (default: true).
    pub index_positions: bool,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            path_search: PathSearch::BreadthFirst,
            index_positions: true,
        }
    }
}
