//! Unified Dijkstra / ALT search loop.
//!
//! Every query mode runs through [`search`]: point-to-point (plain or with
//! the landmark heuristic), nearest points of interest, and full sweeps
//! that leave a distance map in the graph's search state.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, NodeState, PoiKind};
use crate::heap::BinaryMinHeap;
use crate::route::{DistanceMap, Route, Station};

/// Point-to-point algorithms exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    #[default]
    Dijkstra,
    /// A* with landmark lower bounds.
    Alt,
}

impl RouteAlgorithm {
    fn mode(self) -> SearchMode {
        match self {
            RouteAlgorithm::Dijkstra => SearchMode::Dijkstra,
            RouteAlgorithm::Alt => SearchMode::Alt,
        }
    }
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::Alt => "alt",
        };
        f.write_str(value)
    }
}

/// What a single search run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// No heuristic.
    Dijkstra,
    /// Landmark heuristic; needs a destination and attached landmarks.
    Alt,
    /// Collect the nearest `n` fuel stations.
    Fuel(usize),
    /// Collect the nearest `n` chargers.
    Charger(usize),
}

impl SearchMode {
    /// Station mode for a POI kind, if that kind can be searched for.
    pub fn stations(kind: PoiKind, count: usize) -> Option<Self> {
        match kind {
            PoiKind::Fuel => Some(SearchMode::Fuel(count)),
            PoiKind::Charger => Some(SearchMode::Charger(count)),
            PoiKind::None => None,
        }
    }

    fn station_target(self) -> Option<(PoiKind, usize)> {
        match self {
            SearchMode::Fuel(count) => Some((PoiKind::Fuel, count)),
            SearchMode::Charger(count) => Some((PoiKind::Charger, count)),
            SearchMode::Dijkstra | SearchMode::Alt => None,
        }
    }
}

/// Counters and collected stations from one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// Nodes finalized.
    pub visited: usize,
    /// Heap extractions of nodes that were already finalized.
    pub stale: usize,
    /// Successful relaxations (heap pushes after the origin).
    pub relaxed: usize,
    /// Stations in visitation order, nearest first.
    pub stations: Vec<Station>,
}

/// Run one search over `graph`, starting from `route.origin`.
///
/// With `stop_early` the search ends as soon as `route.destination` is
/// finalized and the path is written into `route`. Without it the search
/// sweeps everything reachable, leaving distances readable through
/// [`Graph::distance`]. Node state and the route's previous path are reset
/// first.
pub fn search(
    graph: &mut Graph,
    route: &mut Route,
    stop_early: bool,
    mode: SearchMode,
) -> Result<SearchReport> {
    run(graph, route, stop_early, mode, |_| {})
}

/// Shortest path between two nodes.
pub fn find_route(
    graph: &mut Graph,
    origin: NodeId,
    destination: NodeId,
    algorithm: RouteAlgorithm,
) -> Result<(Route, SearchReport)> {
    let mut route = Route::new(origin, destination);
    let report = search(graph, &mut route, true, algorithm.mode())?;
    Ok((route, report))
}

/// The `count` points of interest of `kind` closest to `origin`.
pub fn find_nearest(
    graph: &mut Graph,
    origin: NodeId,
    kind: PoiKind,
    count: usize,
) -> Result<SearchReport> {
    let mode = SearchMode::stations(kind, count).ok_or(Error::NotAStationKind)?;
    let mut route = Route::from_origin(origin);
    search(graph, &mut route, false, mode)
}

/// Shortest distance from `origin` to every node.
pub fn distance_map(graph: &mut Graph, origin: NodeId) -> Result<DistanceMap> {
    sweep(graph, origin)?;
    let distances = (0..graph.node_count())
        .map(|node| graph.distance(node as NodeId))
        .collect();
    Ok(DistanceMap::new(origin, distances))
}

/// Full Dijkstra sweep; results stay in the graph's search state.
pub(crate) fn sweep(graph: &mut Graph, origin: NodeId) -> Result<SearchReport> {
    let mut route = Route::from_origin(origin);
    search(graph, &mut route, false, SearchMode::Dijkstra)
}

fn run<F>(
    graph: &mut Graph,
    route: &mut Route,
    stop_early: bool,
    mode: SearchMode,
    mut on_finalize: F,
) -> Result<SearchReport>
where
    F: FnMut(NodeId),
{
    let origin = graph.require(route.origin)?;
    let destination = match route.destination {
        Some(node) => Some(graph.require(node)?),
        None => None,
    };
    if mode == SearchMode::Alt {
        if destination.is_none() {
            return Err(Error::MissingDestination);
        }
        if graph.landmarks.is_none() {
            return Err(Error::LandmarksUnavailable);
        }
    }

    graph.reset_nodes();
    route.reset();
    let mut report = SearchReport::default();
    let station = mode.station_target();
    if matches!(station, Some((_, 0))) {
        return Ok(report);
    }

    let Graph {
        nodes,
        adjacency,
        state,
        landmarks,
        ..
    } = graph;
    let heuristic = match (mode, destination, landmarks.as_ref()) {
        (SearchMode::Alt, Some(goal), Some(store)) => Some((goal as NodeId, store)),
        _ => None,
    };

    let mut heap = BinaryMinHeap::with_capacity(nodes.len());
    state[origin].start_dist = 0;
    state[origin].weight = 0;
    heap.insert(origin as NodeId, |n| state[n as usize].weight);

    while let Some(current) = heap.extract_min(|n| state[n as usize].weight) {
        let cu = current as usize;
        if state[cu].checked {
            report.stale += 1;
            continue;
        }
        state[cu].checked = true;
        report.visited += 1;
        on_finalize(current);

        if let Some((kind, count)) = station {
            if nodes[cu].kind == kind {
                report.stations.push(Station {
                    node: current,
                    kind,
                    distance: state[cu].start_dist,
                });
                if report.stations.len() >= count {
                    break;
                }
            }
        }

        if stop_early && destination == Some(cu) {
            reconstruct_path(state, route, current);
            break;
        }

        let base = state[cu].start_dist;
        for edge in &adjacency[cu] {
            let target = edge.target as usize;
            if state[target].checked {
                continue;
            }
            let start_dist = base.saturating_add(edge.weight);
            let estimate = match heuristic {
                Some((goal, store)) => *state[target]
                    .estimate
                    .get_or_insert_with(|| store.estimate(goal, edge.target)),
                None => 0,
            };
            // Both clauses matter once a heuristic is mixed in.
            if start_dist < state[target].start_dist
                && start_dist.saturating_add(estimate) < state[target].weight
            {
                let neighbour = &mut state[target];
                neighbour.start_dist = start_dist;
                neighbour.weight = start_dist.saturating_add(estimate);
                neighbour.previous = Some(current);
                heap.insert(edge.target, |n| state[n as usize].weight);
                report.relaxed += 1;
            }
        }
    }

    debug!(
        origin = route.origin,
        destination = ?route.destination,
        mode = ?mode,
        visited = report.visited,
        stale = report.stale,
        relaxed = report.relaxed,
        found = route.is_found(),
        "search finished"
    );

    Ok(report)
}

/// Walk predecessors back from `destination`, counting first, then filling
/// the path so it reads origin to destination.
fn reconstruct_path(state: &[NodeState], route: &mut Route, destination: NodeId) {
    let mut length = 0;
    let mut cursor = Some(destination);
    while let Some(node) = cursor {
        length += 1;
        cursor = state[node as usize].previous;
    }

    let mut path = vec![destination; length];
    let mut cursor = Some(destination);
    for slot in path.iter_mut().rev() {
        if let Some(node) = cursor {
            *slot = node;
            cursor = state[node as usize].previous;
        }
    }

    route.cost = Some(state[destination as usize].start_dist);
    route.path = path;
}
