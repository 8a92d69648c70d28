// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments and
// dispatches to these handlers.

pub mod path;
pub mod pre;
pub mod route;
pub mod stations;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use altroute_lib::{load_graph, EdgeDirection, Graph, LandmarkStore};

/// Default landmark cache file name.
pub const DEFAULT_CACHE: &str = "landmarks.bin";
/// Default point-of-interest file name.
pub const DEFAULT_POIS: &str = "pois.txt";

/// Base directory that relative input and output paths are resolved
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Pick `--data-dir`, then `ALTROUTE_DATA_DIR`, then the current
    /// directory.
    pub fn from_sources(flag: Option<PathBuf>, env: Option<PathBuf>) -> Self {
        Self::new(flag.or(env).unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Node and edge file options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Node file (`<id> <lat> <lon>` records).
    #[arg(long, default_value = "nodes.txt")]
    pub nodes: PathBuf,
    /// Edge file (`<from> <to> <carTime> <length> <speedLimit>` records).
    #[arg(long, default_value = "edges.txt")]
    pub edges: PathBuf,
}

impl GraphArgs {
    /// Load the graph, tagging points of interest when a POI file is given.
    pub fn load(&self, data_dir: &DataDir, pois: Option<&Path>) -> Result<Graph> {
        let nodes = data_dir.resolve(&self.nodes);
        let edges = data_dir.resolve(&self.edges);
        let pois = pois.map(|path| data_dir.resolve(path));
        load_graph(&nodes, &edges, pois.as_deref(), EdgeDirection::Forward).with_context(|| {
            format!(
                "failed to load graph from {} and {}",
                nodes.display(),
                edges.display()
            )
        })
    }
}

/// Read a landmark cache and attach it to `graph`.
pub fn attach_cache(graph: &mut Graph, path: &Path) -> Result<()> {
    let store = LandmarkStore::load(path, graph.node_count())
        .with_context(|| format!("failed to load landmark cache {}", path.display()))?;
    graph
        .attach_landmarks(store)
        .with_context(|| format!("landmark cache {} does not fit the graph", path.display()))
}
