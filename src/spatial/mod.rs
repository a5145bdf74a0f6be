//! Spatial indexing for station positions.
//!
//! This module provides an R-tree keyed on exact coordinates, used to detect
//! position collisions when stations move and to answer coverage queries.

mod position;

pub use position::PositionIndex;
