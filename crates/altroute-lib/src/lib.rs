//! altroute library entry points.
//!
//! This crate loads road graphs from their text exports, runs Dijkstra and
//! ALT (A*, landmarks, triangle inequality) searches over them, builds and
//! caches landmark distance tables, and writes route and station results.
//! Higher-level consumers (the CLI and its REPL) should only depend on the
//! functions exported here instead of reimplementing behavior.

pub mod error;
pub mod graph;
pub mod heap;
pub mod landmarks;
pub mod loader;
pub mod output;
pub mod route;
pub mod search;

pub use error::{Error, Result};
pub use graph::{
    Edge, EdgeDirection, Graph, GraphBuilder, Node, NodeId, PoiKind, Weight, INFINITY,
};
pub use heap::BinaryMinHeap;
pub use landmarks::LandmarkStore;
pub use loader::load_graph;
pub use output::{format_travel_time, RouteSummary, StationSummary};
pub use route::{DistanceMap, Route, Station};
pub use search::{
    distance_map, find_nearest, find_route, search, RouteAlgorithm, SearchMode, SearchReport,
};
