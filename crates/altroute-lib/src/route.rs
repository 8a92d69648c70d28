use serde::Serialize;

use crate::graph::{NodeId, PoiKind, Weight};

/// Result of a point-to-point query.
///
/// An empty `path` means the destination was not reached; that is a normal
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub origin: NodeId,
    /// `None` asks for a sweep of the whole graph.
    pub destination: Option<NodeId>,
    pub path: Vec<NodeId>,
    /// Total cost of `path`, when one was found.
    pub cost: Option<Weight>,
}

impl Route {
    /// Route request from `origin` to `destination`.
    pub fn new(origin: NodeId, destination: NodeId) -> Self {
        Self {
            origin,
            destination: Some(destination),
            path: Vec::new(),
            cost: None,
        }
    }

    /// Request without a destination.
    pub fn from_origin(origin: NodeId) -> Self {
        Self {
            origin,
            destination: None,
            path: Vec::new(),
            cost: None,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of edges along the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Drop any previously reconstructed path.
    pub fn reset(&mut self) {
        self.path.clear();
        self.cost = None;
    }
}

/// A point of interest found by a nearest-station query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Station {
    pub node: NodeId,
    pub kind: PoiKind,
    /// Shortest distance from the query origin.
    pub distance: Weight,
}

/// Shortest distances from one origin to every node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceMap {
    pub origin: NodeId,
    distances: Vec<Option<Weight>>,
}

impl DistanceMap {
    pub(crate) fn new(origin: NodeId, distances: Vec<Option<Weight>>) -> Self {
        Self { origin, distances }
    }

    /// Distance to `node`, or `None` when it is unreachable.
    pub fn get(&self, node: NodeId) -> Option<Weight> {
        self.distances.get(node as usize).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<Weight>] {
        &self.distances
    }

    /// Number of nodes reachable from the origin, the origin included.
    pub fn reachable(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }
}
