use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::landmarks::LandmarkStore;

/// Index of a node in the graph's node array.
pub type NodeId = u32;

/// Additive edge cost. Travel time in hundredths of a second for the
/// reference road data, but the engine treats it as opaque.
pub type Weight = u32;

/// Sentinel for "no known distance". Also written to landmark caches for
/// nodes a landmark cannot reach.
pub const INFINITY: Weight = 1_000_000_000;

/// Point-of-interest classification attached from the POI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    #[default]
    None,
    Fuel,
    Charger,
}

impl PoiKind {
    /// Numeric code used by the POI file.
    pub const FUEL_CODE: u32 = 2;
    pub const CHARGER_CODE: u32 = 4;

    /// Map a POI file mode code to a kind. Codes other than fuel and charger
    /// mark named waypoints and carry no kind.
    pub fn from_code(code: u32) -> Self {
        match code {
            Self::FUEL_CODE => PoiKind::Fuel,
            Self::CHARGER_CODE => PoiKind::Charger,
            _ => PoiKind::None,
        }
    }

    /// Numeric code written to station CSV output.
    pub fn code(self) -> u32 {
        match self {
            PoiKind::None => 0,
            PoiKind::Fuel => Self::FUEL_CODE,
            PoiKind::Charger => Self::CHARGER_CODE,
        }
    }
}

/// Orientation used when inserting edges while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// Edges are stored as read: `from -> to`.
    Forward,
    /// Edges are stored transposed: `to -> from`.
    Reverse,
}

impl EdgeDirection {
    fn flipped(self) -> Self {
        match self {
            EdgeDirection::Forward => EdgeDirection::Reverse,
            EdgeDirection::Reverse => EdgeDirection::Forward,
        }
    }
}

/// A graph vertex. Identity and coordinates never change after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub nr: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Display name, present only for named points of interest.
    pub name: Option<String>,
    pub kind: PoiKind,
}

impl Node {
    fn unplaced(nr: NodeId) -> Self {
        Self {
            nr,
            lat: 0.0,
            lon: 0.0,
            name: None,
            kind: PoiKind::None,
        }
    }
}

/// Directed edge owned by its source node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: Weight,
}

/// Per-search mutable state for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeState {
    /// Heap priority: `start_dist + estimate`.
    pub(crate) weight: Weight,
    pub(crate) start_dist: Weight,
    /// Memoized heuristic to the current goal.
    pub(crate) estimate: Option<Weight>,
    pub(crate) checked: bool,
    pub(crate) previous: Option<NodeId>,
}

impl NodeState {
    pub(crate) const UNVISITED: NodeState = NodeState {
        weight: INFINITY,
        start_dist: INFINITY,
        estimate: None,
        checked: false,
        previous: None,
    };
}

/// Adjacency-list road graph with per-node search state.
///
/// Searches mutate the state in place, so a search needs `&mut Graph`;
/// [`Graph::reset_nodes`] restores every node to unvisited.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) adjacency: Vec<Vec<Edge>>,
    pub(crate) state: Vec<NodeState>,
    pub(crate) landmarks: Option<LandmarkStore>,
    direction: EdgeDirection,
    edge_count: usize,
}

impl Graph {
    /// Allocate a graph with `node_count` unplaced nodes and no edges.
    pub fn with_nodes(node_count: usize, direction: EdgeDirection) -> Self {
        Self {
            nodes: (0..node_count)
                .map(|index| Node::unplaced(index as NodeId))
                .collect(),
            adjacency: vec![Vec::new(); node_count],
            state: vec![NodeState::UNVISITED; node_count],
            landmarks: None,
            direction,
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Orientation the edges were stored with.
    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    pub fn contains(&self, id: NodeId) -> bool {
        (id as usize) < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Outgoing edges of a node. Unknown ids have none.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nodes tagged with the given point-of-interest kind.
    pub fn points_of_interest(&self, kind: PoiKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Finalized distance from the last search's origin.
    pub fn distance(&self, id: NodeId) -> Option<Weight> {
        self.state
            .get(id as usize)
            .filter(|state| state.checked)
            .map(|state| state.start_dist)
    }

    /// Whether the last search finalized this node.
    pub fn is_finalized(&self, id: NodeId) -> bool {
        self.state
            .get(id as usize)
            .map(|state| state.checked)
            .unwrap_or(false)
    }

    /// Predecessor of a node on the last search's shortest-path tree.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.state.get(id as usize).and_then(|state| state.previous)
    }

    /// Clear all per-search state.
    pub fn reset_nodes(&mut self) {
        self.state.fill(NodeState::UNVISITED);
    }

    /// Build the transpose of this graph: every edge `a -> b` becomes
    /// `b -> a`. Node data is copied; landmark tables are not.
    pub fn transposed(&self) -> Graph {
        let mut reversed = Graph::with_nodes(self.node_count(), self.direction.flipped());
        reversed.nodes.clone_from(&self.nodes);
        for (source, edges) in self.adjacency.iter().enumerate() {
            for edge in edges {
                reversed.push_edge(edge.target, source as NodeId, edge.weight);
            }
        }
        reversed
    }

    /// Attach precomputed landmark tables, enabling ALT searches.
    pub fn attach_landmarks(&mut self, store: LandmarkStore) -> Result<()> {
        if store.node_count() != self.node_count() {
            return Err(Error::LandmarkCountMismatch {
                expected: store.node_count(),
                actual: self.node_count(),
            });
        }
        self.landmarks = Some(store);
        Ok(())
    }

    pub fn landmarks(&self) -> Option<&LandmarkStore> {
        self.landmarks.as_ref()
    }

    pub(crate) fn require(&self, id: NodeId) -> Result<usize> {
        if self.contains(id) {
            Ok(id as usize)
        } else {
            Err(Error::UnknownNode {
                id,
                node_count: self.node_count(),
            })
        }
    }

    pub(crate) fn place_node(&mut self, nr: NodeId, lat: f64, lon: f64) {
        let node = &mut self.nodes[nr as usize];
        node.lat = lat;
        node.lon = lon;
    }

    /// Insert an edge honouring the graph's direction.
    pub(crate) fn insert_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) {
        match self.direction {
            EdgeDirection::Forward => self.push_edge(from, to, weight),
            EdgeDirection::Reverse => self.push_edge(to, from, weight),
        }
    }

    fn push_edge(&mut self, source: NodeId, target: NodeId, weight: Weight) {
        self.adjacency[source as usize].push(Edge { target, weight });
        self.edge_count += 1;
    }

    pub(crate) fn tag_node(&mut self, nr: NodeId, kind: PoiKind, name: String) {
        let node = &mut self.nodes[nr as usize];
        if node.name.is_some() {
            warn!(node = nr, "point of interest listed twice; keeping the last record");
        }
        node.kind = kind;
        node.name = Some(name);
    }
}

/// Programmatic graph construction, mainly for tests and benchmarks.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    node_count: usize,
    nodes: Vec<(NodeId, f64, f64)>,
    edges: Vec<(NodeId, NodeId, Weight)>,
    pois: Vec<(NodeId, PoiKind, String)>,
    direction: EdgeDirection,
}

impl GraphBuilder {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            nodes: Vec::new(),
            edges: Vec::new(),
            pois: Vec::new(),
            direction: EdgeDirection::Forward,
        }
    }

    pub fn direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn node(mut self, nr: NodeId, lat: f64, lon: f64) -> Self {
        self.nodes.push((nr, lat, lon));
        self
    }

    pub fn edge(mut self, from: NodeId, to: NodeId, weight: Weight) -> Self {
        self.edges.push((from, to, weight));
        self
    }

    /// Add `a -> b` and `b -> a` with the same weight.
    pub fn road(self, a: NodeId, b: NodeId, weight: Weight) -> Self {
        self.edge(a, b, weight).edge(b, a, weight)
    }

    pub fn poi(mut self, nr: NodeId, kind: PoiKind, name: impl Into<String>) -> Self {
        self.pois.push((nr, kind, name.into()));
        self
    }

    /// Assemble the graph, rejecting ids outside `0..node_count`.
    pub fn build(self) -> Result<Graph> {
        let mut graph = Graph::with_nodes(self.node_count, self.direction);
        for (nr, lat, lon) in self.nodes {
            graph.require(nr)?;
            graph.place_node(nr, lat, lon);
        }
        for (from, to, weight) in self.edges {
            graph.require(from)?;
            graph.require(to)?;
            graph.insert_edge(from, to, weight);
        }
        for (nr, kind, name) in self.pois {
            graph.require(nr)?;
            graph.tag_node(nr, kind, name);
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poi_codes_map_to_kinds() {
        assert_eq!(PoiKind::from_code(2), PoiKind::Fuel);
        assert_eq!(PoiKind::from_code(4), PoiKind::Charger);
        assert_eq!(PoiKind::from_code(1), PoiKind::None);
        assert_eq!(PoiKind::from_code(6), PoiKind::None);
        assert_eq!(PoiKind::Charger.code(), 4);
    }

    #[test]
    fn transposed_graph_flips_every_edge() {
        let graph = GraphBuilder::new(3)
            .edge(0, 1, 4)
            .edge(1, 2, 7)
            .build()
            .expect("valid graph");
        let reversed = graph.transposed();

        assert_eq!(reversed.direction(), EdgeDirection::Reverse);
        assert_eq!(reversed.edge_count(), 2);
        assert!(reversed.neighbours(0).is_empty());
        assert_eq!(reversed.neighbours(1), &[Edge { target: 0, weight: 4 }]);
        assert_eq!(reversed.neighbours(2), &[Edge { target: 1, weight: 7 }]);
    }

    #[test]
    fn reverse_builder_inserts_transposed_edges() {
        let graph = GraphBuilder::new(2)
            .direction(EdgeDirection::Reverse)
            .edge(0, 1, 9)
            .build()
            .expect("valid graph");

        assert!(graph.neighbours(0).is_empty());
        assert_eq!(graph.neighbours(1), &[Edge { target: 0, weight: 9 }]);
    }

    #[test]
    fn builder_rejects_out_of_range_ids() {
        let error = GraphBuilder::new(2).edge(0, 5, 1).build().unwrap_err();
        assert!(matches!(error, Error::UnknownNode { id: 5, node_count: 2 }));
    }
}
