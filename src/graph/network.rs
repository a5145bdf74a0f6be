//! StationNetwork - core network data structure.
//!
//! The StationNetwork stores the topology using petgraph's StableGraph and
//! keeps an R-tree of station positions in step with every mutation.

use petgraph::Undirected;
use petgraph::stable_graph::{EdgeReference, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{NetworkError, Result};
use super::link::Link;
use super::station::{Station, StationId};
use crate::range::{PathSearch, RangeConfig, minimum, path};
use crate::spatial::PositionIndex;

/// Read-only export of every station and link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Stations in handle order.
    pub stations: Vec<Station>,
    /// Links in insertion order.
    pub links: Vec<Link>,
}

/// The network of base stations and radio links.
///
/// This struct manages:
/// - Topology via petgraph (undirected, no parallel links)
/// - Stable handles mapped onto petgraph's reusable slots
/// - Position index for collision checks and coverage queries
pub struct StationNetwork {
    /// The underlying graph structure.
    /// Nodes store their Station, edges store the link's insertion sequence.
    graph: StableGraph<Station, u64, Undirected>,

    /// Map from stable StationId to petgraph NodeIndex
    station_to_index: HashMap<StationId, NodeIndex>,

    /// Next station handle to assign
    next_station_id: u32,

    /// Next link sequence number; orders adjacency by insertion
    next_link_seq: u64,

    /// Exact-coordinate index of current positions
    positions: PositionIndex,

    config: RangeConfig,
}

impl StationNetwork {
    /// Create a new empty network with default configuration.
    pub fn new() -> Self {
        Self::with_config(RangeConfig::default())
    }

    /// Create a new empty network.
    pub fn with_config(config: RangeConfig) -> Self {
        Self::with_capacity(0, 0, config)
    }

    /// Create a network with pre-allocated capacity.
    pub fn with_capacity(station_capacity: usize, link_capacity: usize, config: RangeConfig) -> Self {
        Self {
            graph: StableGraph::with_capacity(station_capacity, link_capacity),
            station_to_index: HashMap::with_capacity(station_capacity),
            next_station_id: 0,
            next_link_seq: 0,
            positions: PositionIndex::new(),
            config,
        }
    }

    pub fn config(&self) -> &RangeConfig {
        &self.config
    }

    // =========================================================================
    // Station Operations
    // =========================================================================

    /// Add a station at the specified position.
    ///
    /// Always succeeds; positions are only checked for collisions on move.
    pub fn insert_station(&mut self, x: f64, y: f64) -> StationId {
        let id = StationId(self.next_station_id);
        self.next_station_id += 1;

        let index = self.graph.add_node(Station::new(id, x, y));
        self.station_to_index.insert(id, index);
        self.positions.insert(id, x, y);

        tracing::debug!(station = %id, x, y, "inserted station");
        id
    }

    /// Remove a station together with every link touching it.
    pub fn remove_station(&mut self, id: StationId) -> Result<()> {
        let index = self
            .station_to_index
            .remove(&id)
            .ok_or(NetworkError::UnknownStation(id))?;

        let detached = self.graph.edges(index).count();
        if let Some(station) = self.graph.remove_node(index) {
            self.positions.remove(id, station.x(), station.y());
        }

        tracing::debug!(station = %id, detached, "removed station");
        Ok(())
    }

    /// Move a station to `(x, y)`.
    ///
    /// Returns `Ok(false)` without changing anything if any station, this one
    /// included, already sits exactly at the destination.
    pub fn move_station(&mut self, id: StationId, x: f64, y: f64) -> Result<bool> {
        let index = self.index_of(id)?;

        if self.is_occupied(x, y) {
            tracing::debug!(station = %id, x, y, "move rejected, position occupied");
            return Ok(false);
        }

        let station = &mut self.graph[index];
        let from = station.position();
        station.move_to(x, y);
        self.positions.relocate(id, from, (x, y));

        tracing::debug!(station = %id, x, y, "moved station");
        Ok(true)
    }

    /// Check whether any station sits exactly at `(x, y)`.
    pub fn is_occupied(&self, x: f64, y: f64) -> bool {
        if self.config.index_positions {
            self.positions.is_occupied(x, y)
        } else {
            self.graph.node_weights().any(|station| station.is_at(x, y))
        }
    }

    /// Get the number of stations.
    pub fn station_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Check whether the handle refers to a live station.
    pub fn contains(&self, id: StationId) -> bool {
        self.station_to_index.contains_key(&id)
    }

    /// Handles of all live stations, oldest first.
    pub fn stations(&self) -> Vec<StationId> {
        let mut ids: Vec<_> = self.station_to_index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Look up a live station.
    pub fn station(&self, id: StationId) -> Result<&Station> {
        let index = self.index_of(id)?;
        Ok(&self.graph[index])
    }

    /// Get a station's position.
    pub fn position(&self, id: StationId) -> Result<(f64, f64)> {
        self.station(id).map(Station::position)
    }

    pub(crate) fn station_weights(&self) -> impl Iterator<Item = &Station> {
        self.graph.node_weights()
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Add a link between two stations.
    ///
    /// Fails with `DuplicateLink` if the pair is already linked, in either
    /// orientation.
    pub fn insert_link(&mut self, a: StationId, b: StationId) -> Result<Link> {
        let a_index = self.index_of(a)?;
        let b_index = self.index_of(b)?;

        if self.graph.find_edge(a_index, b_index).is_some() {
            return Err(NetworkError::DuplicateLink { a, b });
        }

        let seq = self.next_link_seq;
        self.next_link_seq += 1;
        self.graph.add_edge(a_index, b_index, seq);

        tracing::debug!(%a, %b, "inserted link");
        Ok(Link::new(a, b))
    }

    /// Links touching `id`, in insertion order.
    pub fn links(&self, id: StationId) -> Result<Vec<Link>> {
        let index = self.index_of(id)?;

        let mut links: Vec<(u64, Link)> = self
            .graph
            .edges(index)
            .map(|edge| self.sequenced(edge))
            .collect();
        links.sort_unstable_by_key(|&(seq, _)| seq);

        Ok(links.into_iter().map(|(_, link)| link).collect())
    }

    /// Get the number of links.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Euclidean distance between two stations' current positions.
    pub fn distance(&self, a: StationId, b: StationId) -> Result<f64> {
        Ok(self.station(a)?.distance_to(self.station(b)?))
    }

    /// The station across `link` from `id`, or `None` if `id` is not on it.
    pub fn opposite(&self, link: Link, id: StationId) -> Option<StationId> {
        link.opposite(id)
    }

    /// Stations within `range` of `id`, boundary included, ignoring links.
    pub fn stations_within(&self, id: StationId, range: f64) -> Result<Vec<StationId>> {
        let (x, y) = self.position(id)?;
        let mut ids = self.positions.in_radius(x, y, range);
        ids.sort_unstable();
        Ok(ids)
    }

    // =========================================================================
    // Range Queries
    // =========================================================================

    /// Distance from `id` to the farthest station in the network.
    ///
    /// This is the range a radio at `id` needs to reach every other station
    /// directly. Zero when `id` is the only station.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn find_emergency_range(&self, id: StationId) -> Result<f64> {
        let origin = self.station(id)?;
        Ok(self
            .graph
            .node_weights()
            .map(|station| origin.distance_to(station))
            .fold(0.0, f64::max))
    }

    /// Path from `start` to `target` over links, with every station on it
    /// within `range` of `start`.
    ///
    /// Returns `Ok(None)` when no such path exists. With the default
    /// breadth-first search the path has the fewest possible hops.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn find_path(
        &self,
        start: StationId,
        target: StationId,
        range: f64,
    ) -> Result<Option<Vec<StationId>>> {
        match self.config.path_search {
            PathSearch::BreadthFirst => path::breadth_first(self, start, target, range),
            PathSearch::DepthFirst => path::depth_first(self, start, target, range),
        }
    }

    /// Smallest range at which a path from `start` to `target` exists.
    ///
    /// Fails with `Unreachable` if the two stations are not connected at all.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn minimum_range(&self, start: StationId, target: StationId) -> Result<f64> {
        minimum::minimum_range(self, start, target)
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Export every station and link.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let mut stations: Vec<Station> = self.graph.node_weights().copied().collect();
        stations.sort_unstable_by_key(Station::id);

        let mut links: Vec<(u64, Link)> = self
            .graph
            .edge_references()
            .map(|edge| self.sequenced(edge))
            .collect();
        links.sort_unstable_by_key(|&(seq, _)| seq);

        NetworkSnapshot {
            stations,
            links: links.into_iter().map(|(_, link)| link).collect(),
        }
    }

    /// Remove all stations and links. Handles issued before the clear stay
    /// unknown.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.station_to_index.clear();
        self.positions.clear();
    }

    /// A petgraph edge as (insertion sequence, link).
    fn sequenced(&self, edge: EdgeReference<'_, u64>) -> (u64, Link) {
        let a = self.graph[edge.source()].id();
        let b = self.graph[edge.target()].id();
        (*edge.weight(), Link::new(a, b))
    }

    fn index_of(&self, id: StationId) -> Result<NodeIndex> {
        self.station_to_index
            .get(&id)
            .copied()
            .ok_or(NetworkError::UnknownStation(id))
    }
}

impl Default for StationNetwork {
    fn default() -> Self {
        Self::new()
    }
}
