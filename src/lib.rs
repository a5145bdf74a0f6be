//! Relay Range - WASM Module
//!
//! This module provides the station network and radio range queries for
//! Relay Range. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Station network using petgraph's StableGraph with stable handles
//! - `spatial`: R-tree position index for exact collision checks and coverage
//! - `range`: Range-bounded path search and minimum range search

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod graph;
pub mod range;
pub mod spatial;

pub use graph::{Link, NetworkError, NetworkSnapshot, Station, StationId, StationNetwork};
pub use range::{PathSearch, RangeConfig};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(err: NetworkError) -> JsValue {
    JsError::new(&err.to_string()).into()
}

/// Main entry point for the station network.
///
/// This struct wraps the internal StationNetwork and provides the public API
/// exposed to JavaScript. Stations are addressed by their raw `u32` handle.
#[wasm_bindgen]
pub struct RelayNetworkWasm {
    network: StationNetwork,
}

#[wasm_bindgen]
impl RelayNetworkWasm {
    /// Create a new empty network.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            network: StationNetwork::new(),
        }
    }

    /// Create a network from a configuration object.
    ///
    /// Accepts `{ pathSearch: "breadthFirst" | "depthFirst", indexPositions: bool }`;
    /// missing fields take their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<RelayNetworkWasm, JsValue> {
        let config: RangeConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            network: StationNetwork::with_config(config),
        })
    }

    // =========================================================================
    // Station Operations
    // =========================================================================

    /// Add a station at the specified position.
    ///
    /// Returns the stable station handle.
    #[wasm_bindgen(js_name = insertStation)]
    pub fn insert_station(&mut self, x: f64, y: f64) -> u32 {
        self.network.insert_station(x, y).raw()
    }

    /// Remove a station and every link touching it.
    #[wasm_bindgen(js_name = removeStation)]
    pub fn remove_station(&mut self, station: u32) -> Result<(), JsValue> {
        self.network.remove_station(StationId(station)).map_err(to_js)
    }

    /// Move a station.
    ///
    /// Returns false, and leaves the station where it was, if the destination
    /// is already occupied.
    #[wasm_bindgen(js_name = moveStation)]
    pub fn move_station(&mut self, station: u32, x: f64, y: f64) -> Result<bool, JsValue> {
        self.network
            .move_station(StationId(station), x, y)
            .map_err(to_js)
    }

    /// Get the number of stations.
    #[wasm_bindgen(js_name = stationCount)]
    pub fn station_count(&self) -> usize {
        self.network.station_count()
    }

    /// Get a station's X position.
    #[wasm_bindgen(js_name = getStationX)]
    pub fn get_station_x(&self, station: u32) -> Option<f64> {
        self.network.position(StationId(station)).ok().map(|(x, _)| x)
    }

    /// Get a station's Y position.
    #[wasm_bindgen(js_name = getStationY)]
    pub fn get_station_y(&self, station: u32) -> Option<f64> {
        self.network.position(StationId(station)).ok().map(|(_, y)| y)
    }

    /// Positions of all stations in handle order, as [x0, y0, x1, y1, ...].
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float64Array {
        let positions: Vec<f64> = self
            .network
            .snapshot()
            .stations
            .iter()
            .flat_map(|station| [station.x(), station.y()])
            .collect();
        Float64Array::from(&positions[..])
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Add a link between two stations.
    ///
    /// Throws if the stations are already linked.
    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&mut self, a: u32, b: u32) -> Result<(), JsValue> {
        self.network
            .insert_link(StationId(a), StationId(b))
            .map(|_| ())
            .map_err(to_js)
    }

    /// Get the number of links.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> usize {
        self.network.link_count()
    }

    /// Handles of the stations linked to `station`, in link insertion order.
    #[wasm_bindgen(js_name = getNeighbors)]
    pub fn get_neighbors(&self, station: u32) -> Result<Vec<u32>, JsValue> {
        let id = StationId(station);
        let links = self.network.links(id).map_err(to_js)?;
        Ok(links
            .into_iter()
            .filter_map(|link| self.network.opposite(link, id))
            .map(StationId::raw)
            .collect())
    }

    // =========================================================================
    // Range Queries
    // =========================================================================

    /// Euclidean distance between two stations.
    pub fn distance(&self, a: u32, b: u32) -> Result<f64, JsValue> {
        self.network
            .distance(StationId(a), StationId(b))
            .map_err(to_js)
    }

    /// Distance from a station to the farthest station in the network.
    #[wasm_bindgen(js_name = findEmergencyRange)]
    pub fn find_emergency_range(&self, station: u32) -> Result<f64, JsValue> {
        self.network
            .find_emergency_range(StationId(station))
            .map_err(to_js)
    }

    /// Path of station handles from `start` to `target` within `range` of
    /// `start`, or undefined if none exists.
    #[wasm_bindgen(js_name = findPath)]
    pub fn find_path(
        &self,
        start: u32,
        target: u32,
        range: f64,
    ) -> Result<Option<Vec<u32>>, JsValue> {
        let path = self
            .network
            .find_path(StationId(start), StationId(target), range)
            .map_err(to_js)?;
        Ok(path.map(|ids| ids.into_iter().map(StationId::raw).collect()))
    }

    /// Smallest range at which `target` is reachable from `start`.
    ///
    /// Throws if the two stations are not connected at all.
    #[wasm_bindgen(js_name = minimumRange)]
    pub fn minimum_range(&self, start: u32, target: u32) -> Result<f64, JsValue> {
        self.network
            .minimum_range(StationId(start), StationId(target))
            .map_err(to_js)
    }

    /// Stations within `range` of `station`, ignoring links.
    #[wasm_bindgen(js_name = stationsWithin)]
    pub fn stations_within(&self, station: u32, range: f64) -> Result<Vec<u32>, JsValue> {
        let ids = self
            .network
            .stations_within(StationId(station), range)
            .map_err(to_js)?;
        Ok(ids.into_iter().map(StationId::raw).collect())
    }

    // =========================================================================
    // Network Utilities
    // =========================================================================

    /// Export every station and link as a plain object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.network.snapshot())?)
    }

    /// Clear all stations and links.
    pub fn clear(&mut self) {
        self.network.clear();
    }
}

impl Default for RelayNetworkWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    const TOLERANCE: f64 = 0.001;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOLERANCE
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    /// Check that `path` starts at `start`, follows existing links, and stays
    /// within `range` of `start`.
    fn assert_is_path(network: &StationNetwork, start: StationId, path: &[StationId], range: f64) {
        assert_eq!(path.first(), Some(&start), "path {path:?} does not start at {start}");
        for pair in path.windows(2) {
            let linked = network
                .links(pair[0])
                .unwrap()
                .contains(&Link::new(pair[0], pair[1]));
            assert!(linked, "path {path:?} uses missing link {} -> {}", pair[0], pair[1]);
        }
        for &id in path {
            let distance = network.distance(start, id).unwrap();
            assert!(distance <= range, "{id} is {distance} from {start}, beyond {range}");
        }
    }

    /// Three layers: A; then B, C, D; then E, F.
    fn layered(c: (f64, f64), d: (f64, f64)) -> (StationNetwork, [StationId; 6]) {
        let mut network = StationNetwork::new();
        let a = network.insert_station(0.0, 0.0);
        let b = network.insert_station(2.0, 0.0);
        let c = network.insert_station(c.0, c.1);
        let d = network.insert_station(d.0, d.1);
        let e = network.insert_station(3.0, 3.0);
        let f = network.insert_station(4.0, 6.0);

        network.insert_link(a, b).unwrap();
        network.insert_link(a, c).unwrap();
        network.insert_link(a, d).unwrap();
        network.insert_link(c, e).unwrap();
        network.insert_link(c, f).unwrap();
        network.insert_link(d, f).unwrap();

        (network, [a, b, c, d, e, f])
    }

    /// Eight stations on a square of half-width 7 around m, chained
    /// m-a-b-c-d-e-f-g-h.
    fn ring() -> (StationNetwork, [StationId; 9]) {
        let mut network = StationNetwork::new();
        let coords = [
            (0.0, 0.0),
            (0.0, 7.0),
            (7.0, 7.0),
            (7.0, 0.0),
            (7.0, -7.0),
            (0.0, -7.0),
            (-7.0, -7.0),
            (-7.0, 0.0),
            (-7.0, 7.0),
        ];
        let ids = coords.map(|(x, y)| network.insert_station(x, y));
        for pair in ids.windows(2) {
            network.insert_link(pair[0], pair[1]).unwrap();
        }
        (network, ids)
    }

    #[test]
    fn test_path_move_path() {
        init_tracing();
        let (mut network, [a, _b, c, d, _e, f]) = layered((2.0, 4.0), (2.0, 6.0));
        let range = 7.7;

        let path = network.find_path(a, f, range).unwrap().unwrap();
        assert_is_path(&network, a, &path, range);
        assert!(path == vec![a, c, f] || path == vec![a, d, f], "got {path:?}");

        assert!(network.move_station(c, 2.0, 10.0).unwrap());
        let path = network.find_path(a, f, range).unwrap().unwrap();
        assert_is_path(&network, a, &path, range);
        assert_eq!(path, vec![a, d, f]);

        assert!(network.move_station(d, 2.0, 12.0).unwrap());
        assert_eq!(network.find_path(a, f, range).unwrap(), None);
    }

    #[test]
    fn test_path_out_of_range_only() {
        let (network, [a, .., f]) = layered((2.0, 4.0), (2.0, 6.0));
        assert_eq!(network.find_path(a, f, 3.0).unwrap(), None);
    }

    #[test]
    fn test_path_to_self() {
        let (network, [a, _b, _c, d, ..]) = layered((2.0, 4.0), (2.0, 6.0));
        assert_eq!(network.find_path(a, a, 10.0).unwrap(), Some(vec![a]));
        assert_eq!(network.find_path(d, d, 10.0).unwrap(), Some(vec![d]));
    }

    #[test]
    fn test_path_move_remove() {
        let (mut network, [a, _b, c, d, _e, f]) = layered((2.0, 20.0), (2.0, 6.0));
        let range = 7.7;

        let path = network.find_path(a, f, range).unwrap().unwrap();
        assert_eq!(path, vec![a, d, f]);

        network.move_station(c, 20.0, 20.0).unwrap();
        assert_eq!(network.find_path(a, f, range).unwrap(), Some(vec![a, d, f]));

        network.remove_station(d).unwrap();
        assert_eq!(network.find_path(a, f, range).unwrap(), None);

        network.move_station(c, 2.0, 3.0).unwrap();
        let path = network.find_path(a, f, range).unwrap().unwrap();
        assert_is_path(&network, a, &path, range);
        assert_eq!(path, vec![a, c, f]);
    }

    #[test]
    fn test_most_minimal_hops() {
        let mut network = StationNetwork::new();
        let m = network.insert_station(0.0, 0.0);
        let a = network.insert_station(2.0, 0.0);
        let b = network.insert_station(1.0, 1.0);
        let c = network.insert_station(0.0, 2.0);
        let d = network.insert_station(-1.0, 2.0);
        let e = network.insert_station(-2.0, 0.0);
        let f = network.insert_station(-2.0, -4.0);
        let h = network.insert_station(0.0, -5.0);
        let i = network.insert_station(4.0, -1.0);
        let j = network.insert_station(3.0, 0.0);

        for (u, v) in [(m, a), (a, b), (b, c), (c, d), (d, e), (e, f), (f, h), (h, i), (i, j)] {
            network.insert_link(u, v).unwrap();
        }

        let path = network.find_path(m, i, 10.0).unwrap();
        assert_eq!(path, Some(vec![m, a, b, c, d, e, f, h, i]));
        assert_eq!(network.find_path(m, i, 2.0).unwrap(), None);

        network.insert_link(m, c).unwrap();
        let path = network.find_path(m, i, 7.0).unwrap().unwrap();
        assert_is_path(&network, m, &path, 7.0);
        assert_eq!(path, vec![m, c, d, e, f, h, i]);

        network.insert_link(a, i).unwrap();
        assert_eq!(network.find_path(m, i, 6.0).unwrap(), Some(vec![m, a, i]));
        assert_eq!(network.find_path(m, e, 6.0).unwrap(), Some(vec![m, c, d, e]));

        network.insert_link(m, e).unwrap();
        assert_eq!(network.find_path(m, e, 6.0).unwrap(), Some(vec![m, e]));

        network.remove_station(c).unwrap();
        let path = network.find_path(m, h, 7.0).unwrap().unwrap();
        assert_is_path(&network, m, &path, 7.0);
        assert_eq!(path, vec![m, a, i, h]);
        assert_eq!(network.find_path(m, d, 7.0).unwrap(), Some(vec![m, e, d]));
        assert_eq!(network.find_path(m, d, 2.0).unwrap(), None);
    }

    #[test]
    fn test_emergency_move_emergency() {
        let (mut network, ids) = ring();
        let [m, _a, b, _c, _d, _e, f, ..] = ids;

        assert!(approx(network.find_emergency_range(m).unwrap(), 9.8995));

        network.move_station(f, -18.0, -19.0).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 26.172_50));
        assert!(approx(network.find_emergency_range(b).unwrap(), 36.069_38));
    }

    #[test]
    fn test_emergency_move_remove() {
        let (mut network, ids) = ring();
        let [m, _a, _b, _c, _d, e, f, ..] = ids;

        assert!(approx(network.find_emergency_range(m).unwrap(), 9.899_49));

        network.move_station(e, 0.0, -18.0).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 18.0));

        network.move_station(f, -33.0, -21.0).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 39.115_21));

        network.remove_station(f).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 18.0));
    }

    #[test]
    fn test_emergency_minimum() {
        init_tracing();
        let (mut network, ids) = ring();
        let [m, _a, _b, _c, d, _e, f, _g, h] = ids;

        assert!(approx(network.find_emergency_range(m).unwrap(), 9.8995));
        assert!(approx(network.minimum_range(m, h).unwrap(), 9.8995));

        network.move_station(f, -18.0, -19.0).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 26.172_50));
        assert!(approx(network.minimum_range(m, h).unwrap(), 26.172_50));

        network.move_station(d, 17.0, 20.0).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 26.248_81));
        assert!(approx(network.minimum_range(m, h).unwrap(), 26.248_81));

        network.insert_link(m, h).unwrap();
        assert!(approx(network.find_emergency_range(m).unwrap(), 26.248_81));
        assert!(approx(network.minimum_range(m, h).unwrap(), 9.899_49));
    }

    #[test]
    fn test_minimum_range_layered() {
        let (network, [a, .., f]) = layered((2.0, 4.0), (2.0, 6.0));
        assert!(approx(network.minimum_range(a, f).unwrap(), 7.2111));
    }

    #[test]
    fn test_minimum_range_similar_paths() {
        let (mut network, [a, _b, c, d, e, f]) = layered((2.0, 98.0), (2.0, 99.0));

        assert!(approx(network.minimum_range(a, f).unwrap(), 98.020_41));

        network.remove_station(e).unwrap();
        network.remove_station(c).unwrap();
        assert!(approx(network.minimum_range(a, f).unwrap(), 99.020_41));
        assert!(approx(network.minimum_range(d, d).unwrap(), 0.0));
    }

    #[test]
    fn test_min_move_min() {
        let mut network = StationNetwork::new();
        let a = network.insert_station(1.0, 1.0);
        let b = network.insert_station(1.0, 0.5);
        let c = network.insert_station(20.0, 7.0);
        let d = network.insert_station(1.0, 0.2);
        let e = network.insert_station(1.0, 0.0);
        let f = network.insert_station(0.0, 2.0);

        for (u, v) in [(a, b), (a, c), (c, f), (b, d), (d, e), (e, f)] {
            network.insert_link(u, v).unwrap();
        }

        assert!(approx(network.minimum_range(a, f).unwrap(), 1.414_21));

        network.move_station(b, -20.0, -24.0).unwrap();
        assert!(approx(network.minimum_range(a, f).unwrap(), 19.9248));

        network.move_station(b, 1.0, 3.0).unwrap();
        assert!(approx(network.minimum_range(a, f).unwrap(), 2.0));
        assert!(approx(network.minimum_range(a, d).unwrap(), 2.0));

        network.remove_station(b).unwrap();
        assert!(approx(network.minimum_range(a, f).unwrap(), 19.9248));
        assert!(approx(network.minimum_range(a, d).unwrap(), 19.9248));
    }

    /// The minimum range is the smallest range at which a path exists.
    #[test]
    fn test_minimum_range_is_tight() {
        let (network, [a, .., f]) = layered((2.0, 4.0), (2.0, 6.0));
        let range = network.minimum_range(a, f).unwrap();

        assert!(network.find_path(a, f, range).unwrap().is_some());
        assert!(network.find_path(a, f, range - 1e-9).unwrap().is_none());
    }

    #[test]
    fn test_depth_first_config_finds_same_reachability() {
        let mut network = StationNetwork::with_config(RangeConfig {
            path_search: PathSearch::DepthFirst,
            index_positions: false,
        });
        let a = network.insert_station(0.0, 0.0);
        let b = network.insert_station(2.0, 0.0);
        let c = network.insert_station(2.0, 4.0);
        let f = network.insert_station(4.0, 6.0);
        network.insert_link(a, b).unwrap();
        network.insert_link(a, c).unwrap();
        network.insert_link(c, f).unwrap();

        let path = network.find_path(a, f, 7.7).unwrap().unwrap();
        assert_is_path(&network, a, &path, 7.7);
        assert_eq!(network.find_path(a, f, 3.0).unwrap(), None);
        assert!(approx(network.minimum_range(a, f).unwrap(), 7.2111));
    }

    #[test]
    fn test_unknown_handles_are_reported() {
        let (mut network, [a, ..]) = layered((2.0, 4.0), (2.0, 6.0));
        let ghost = StationId(99);

        assert_eq!(network.find_path(a, ghost, 5.0), Err(NetworkError::UnknownStation(ghost)));
        assert_eq!(network.minimum_range(ghost, a), Err(NetworkError::UnknownStation(ghost)));
        assert_eq!(network.insert_link(a, ghost), Err(NetworkError::UnknownStation(ghost)));
        assert_eq!(network.move_station(ghost, 1.0, 1.0), Err(NetworkError::UnknownStation(ghost)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let (network, [a, b, ..]) = layered((2.0, 4.0), (2.0, 6.0));
        let snapshot = network.snapshot();
        assert_eq!(snapshot.stations.len(), 6);
        assert_eq!(snapshot.links.len(), 6);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["stations"][1]["id"], serde_json::json!(b.raw()));
        assert_eq!(json["stations"][1]["x"], serde_json::json!(2.0));
        assert_eq!(json["links"][0]["a"], serde_json::json!(a.raw()));
        assert_eq!(json["links"][0]["b"], serde_json::json!(b.raw()));

        let restored: NetworkSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
