//! Error types for network mutation and queries.

use thiserror::Error;

use super::station::StationId;

/// Errors reported by [`StationNetwork`](super::StationNetwork).
///
/// "No path within range" is not an error: `find_path` reports it as `Ok(None)`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// A link between the two stations already exists.
    #[error("link already exists between {a} and {b}")]
    DuplicateLink { a: StationId, b: StationId },

    /// The handle does not refer to a live station.
    #[error("unknown station: {0}")]
    UnknownStation(StationId),

    /// No range, however large, connects the two stations.
    #[error("{to} is unreachable from {from} at any range")]
    Unreachable { from: StationId, to: StationId },
}

pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NetworkError::DuplicateLink {
            a: StationId(1),
            b: StationId(2),
        };
        assert_eq!(
            err.to_string(),
            "link already exists between Station(1) and Station(2)"
        );

        let err = NetworkError::Unreachable {
            from: StationId(0),
            to: StationId(3),
        };
        assert_eq!(
            err.to_string(),
            "Station(3) is unreachable from Station(0) at any range"
        );

        assert_eq!(
            NetworkError::UnknownStation(StationId(9)).to_string(),
            "unknown station: Station(9)"
        );
    }
}
