//! Range-bounded path search.
//!
//! A neighbour outside the range is marked seen but never gets a parent, so
//! it can neither be expanded nor end up on a returned path.

use std::collections::{HashMap, HashSet};

use crate::graph::{Link, Result, Station, StationId, StationNetwork};

/// Breadth-first search from `start`, expanding only admissible stations.
///
/// The target is returned on the first layer it is reached from, so the path
/// has the minimum hop count. Ties go to the earliest inserted link.
pub(crate) fn breadth_first(
    network: &StationNetwork,
    start: StationId,
    target: StationId,
    range: f64,
) -> Result<Option<Vec<StationId>>> {
    let origin = *network.station(start)?;
    if start == target {
        return Ok(Some(vec![start]));
    }
    if !admissible(network, &origin, target, range)? {
        return Ok(None);
    }

    let mut seen = HashSet::from([start]);
    let mut parents = HashMap::new();
    let mut frontier = vec![start];

    'search: while !frontier.is_empty() {
        let mut next = Vec::new();
        for &current in &frontier {
            for link in network.links(current)? {
                let neighbour = across(link, current);
                if !seen.insert(neighbour) {
                    continue;
                }
                if !admissible(network, &origin, neighbour, range)? {
                    continue;
                }
                parents.insert(neighbour, current);
                if neighbour == target {
                    break 'search;
                }
                next.push(neighbour);
            }
        }
        frontier = next;
    }

    Ok(backtrack(start, target, &parents))
}

/// Depth-first search from `start`, expanding only admissible stations.
pub(crate) fn depth_first(
    network: &StationNetwork,
    start: StationId,
    target: StationId,
    range: f64,
) -> Result<Option<Vec<StationId>>> {
    let origin = *network.station(start)?;
    if start == target {
        return Ok(Some(vec![start]));
    }
    if !admissible(network, &origin, target, range)? {
        return Ok(None);
    }

    let mut seen = HashSet::from([start]);
    let mut parents = HashMap::new();
    let mut stack = vec![(start, network.links(start)?.into_iter())];

    while let Some((current, links)) = stack.last_mut() {
        let current = *current;
        let Some(link) = links.next() else {
            stack.pop();
            continue;
        };

        let neighbour = across(link, current);
        if !seen.insert(neighbour) || !admissible(network, &origin, neighbour, range)? {
            continue;
        }
        parents.insert(neighbour, current);
        if neighbour == target {
            break;
        }
        stack.push((neighbour, network.links(neighbour)?.into_iter()));
    }

    Ok(backtrack(start, target, &parents))
}

fn admissible(
    network: &StationNetwork,
    origin: &Station,
    id: StationId,
    range: f64,
) -> Result<bool> {
    Ok(origin.distance_to(network.station(id)?) <= range)
}

fn across(link: Link, from: StationId) -> StationId {
    match link.opposite(from) {
        Some(id) => id,
        None => unreachable!("{link} is listed under {from} but does not touch it"),
    }
}

/// Follow parent links from `target` back to `start`.
fn backtrack(
    start: StationId,
    target: StationId,
    parents: &HashMap<StationId, StationId>,
) -> Option<Vec<StationId>> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        current = *parents.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}
