//! Minimum range search by iterative contraction.
//!
//! Start from the emergency range, where every station is admissible. Each
//! round finds a path, takes its bottleneck (the farthest station on it from
//! the start) and retries at the next smaller station distance. The admissible
//! set shrinks every round, so the loop ends after at most one round per
//! distinct distance. Candidate ranges are actual station distances, so the
//! result is exact with no step-size precision floor.

use crate::graph::{NetworkError, Result, Station, StationId, StationNetwork};

/// Smallest range at which `network.find_path(start, target, range)` succeeds.
pub(crate) fn minimum_range(
    network: &StationNetwork,
    start: StationId,
    target: StationId,
) -> Result<f64> {
    let origin = *network.station(start)?;
    network.station(target)?;
    if start == target {
        return Ok(0.0);
    }

    let mut candidates: Vec<f64> = network
        .station_weights()
        .map(|station| origin.distance_to(station))
        .collect();
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();

    let mut range = network.find_emergency_range(start)?;
    let mut best = None;

    while let Some(path) = network.find_path(start, target, range)? {
        let worst = bottleneck(network, &origin, &path)?;
        best = Some(worst);

        let below = candidates.partition_point(|&distance| distance < worst);
        if below == 0 {
            break;
        }
        range = candidates[below - 1];
        tracing::trace!(bottleneck = worst, next_range = range, "contracting range");
    }

    best.ok_or(NetworkError::Unreachable {
        from: start,
        to: target,
    })
}

/// Largest distance from `origin` over the stations of `path`.
fn bottleneck(network: &StationNetwork, origin: &Station, path: &[StationId]) -> Result<f64> {
    let mut worst = 0.0_f64;
    for &id in path {
        worst = worst.max(origin.distance_to(network.station(id)?));
    }
    Ok(worst)
}
