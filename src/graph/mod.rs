//! Station network data structures and operations.
//!
//! This module provides the network structure using petgraph's StableGraph
//! for slot storage, with stable station handles layered on top so a handle
//! never aliases a station inserted after its own was removed.

mod error;
mod link;
mod network;
mod station;

pub use error::{NetworkError, Result};
pub use link::Link;
pub use network::{NetworkSnapshot, StationNetwork};
pub use station::{Station, StationId};
