use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An input or output file could not be opened, read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record in a node, edge or point-of-interest file could not be parsed.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A record referenced a node id outside `0..node_count`.
    #[error("{path}:{line}: node id {id} is outside the graph (0..{node_count})")]
    NodeOutOfRange {
        path: PathBuf,
        line: usize,
        id: i64,
        node_count: usize,
    },

    /// A query referenced a node id outside `0..node_count`.
    #[error("unknown node {id}; graph has {node_count} nodes")]
    UnknownNode { id: NodeId, node_count: usize },

    /// ALT was requested on a graph without landmark tables attached.
    #[error("landmark tables are not loaded; run preprocessing or load a landmark cache first")]
    LandmarksUnavailable,

    /// ALT needs a destination to aim the heuristic at.
    #[error("ALT search requires a destination node")]
    MissingDestination,

    /// A nearest-station query named a kind that is neither fuel nor charger.
    #[error("only fuel stations and chargers can be searched for")]
    NotAStationKind,

    /// Landmark preprocessing was requested without any landmarks.
    #[error("at least one landmark is required for preprocessing")]
    NoLandmarks,

    /// A landmark cache does not fit the graph it is attached to.
    #[error("landmark tables cover {expected} nodes but the graph has {actual}")]
    LandmarkCountMismatch { expected: usize, actual: usize },

    /// A landmark cache file is truncated or carries invalid values.
    #[error("invalid landmark cache {path}: {message}")]
    LandmarkCache { path: PathBuf, message: String },

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
