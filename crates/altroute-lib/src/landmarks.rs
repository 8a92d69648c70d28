//! Landmark distance tables for the ALT heuristic.
//!
//! For every landmark `L` two columns are kept: `dist(L, v)` measured on the
//! forward graph and `dist(v, L)` measured as `dist(L, v)` on the transposed
//! graph. Both matrices are stored row-major by node, then landmark, which
//! is also the on-disk layout.
//!
//! # Cache format
//!
//! ```text
//! i32            landmark count m
//! m × i32        landmark node ids
//! n × m × i32    forward matrix  (dist from landmark to node)
//! n × m × i32    backward matrix (dist from node to landmark)
//! ```
//!
//! Native byte order, no header, no version. The node count `n` is not
//! stored; readers take it from the node file.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, Weight, INFINITY};
use crate::search;

const FIELD_SIZE: usize = std::mem::size_of::<i32>();

/// Precomputed landmark distances for one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkStore {
    landmarks: Vec<NodeId>,
    node_count: usize,
    from_marks: Vec<Weight>,
    to_marks: Vec<Weight>,
}

impl LandmarkStore {
    /// Run one forward and one backward full sweep per landmark.
    ///
    /// `graph` is the forward graph; its search state is left reset.
    pub fn preprocess(graph: &mut Graph, landmarks: &[NodeId]) -> Result<Self> {
        if landmarks.is_empty() {
            return Err(Error::NoLandmarks);
        }
        for &landmark in landmarks {
            graph.require(landmark)?;
        }

        let node_count = graph.node_count();
        let m = landmarks.len();
        let mut reversed = graph.transposed();
        let mut from_marks = vec![INFINITY; node_count * m];
        let mut to_marks = vec![INFINITY; node_count * m];

        info!(
            landmarks = m,
            nodes = node_count,
            "preprocessing landmark distances"
        );

        for (column, &landmark) in landmarks.iter().enumerate() {
            search::sweep(graph, landmark)?;
            copy_column(graph, &mut from_marks, column, m);

            search::sweep(&mut reversed, landmark)?;
            copy_column(&reversed, &mut to_marks, column, m);

            info!(
                landmark,
                done = column + 1,
                total = m,
                "landmark preprocessed"
            );
        }
        graph.reset_nodes();

        Ok(Self {
            landmarks: landmarks.to_vec(),
            node_count,
            from_marks,
            to_marks,
        })
    }

    /// Assemble a store from raw row-major matrices.
    pub fn from_parts(
        landmarks: Vec<NodeId>,
        node_count: usize,
        from_marks: Vec<Weight>,
        to_marks: Vec<Weight>,
    ) -> Result<Self> {
        let cells = node_count * landmarks.len();
        if landmarks.is_empty() {
            return Err(Error::NoLandmarks);
        }
        if from_marks.len() != cells || to_marks.len() != cells {
            return Err(Error::LandmarkCountMismatch {
                expected: from_marks.len().max(to_marks.len()) / landmarks.len(),
                actual: node_count,
            });
        }
        Ok(Self {
            landmarks,
            node_count,
            from_marks,
            to_marks,
        })
    }

    pub fn landmarks(&self) -> &[NodeId] {
        &self.landmarks
    }

    pub fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Flat offset of `(node, landmark)` in either matrix.
    fn index(&self, node: usize, landmark: usize) -> usize {
        node * self.landmarks.len() + landmark
    }

    /// `dist(landmark, node)` on the forward graph.
    pub fn from_landmark(&self, landmark: usize, node: NodeId) -> Weight {
        self.from_marks[self.index(node as usize, landmark)]
    }

    /// `dist(node, landmark)` on the forward graph.
    pub fn to_landmark(&self, node: NodeId, landmark: usize) -> Weight {
        self.to_marks[self.index(node as usize, landmark)]
    }

    pub fn forward_matrix(&self) -> &[Weight] {
        &self.from_marks
    }

    pub fn backward_matrix(&self) -> &[Weight] {
        &self.to_marks
    }

    /// Lower bound on `dist(node, goal)` from the triangle inequality.
    ///
    /// Candidates that come out negative or exactly at [`INFINITY`] are
    /// dropped; the largest survivor wins, or 0 when none survive.
    pub fn estimate(&self, goal: NodeId, node: NodeId) -> Weight {
        let (goal, node) = (goal as usize, node as usize);
        let mut best: i64 = 0;
        for landmark in 0..self.landmarks.len() {
            let g = self.index(goal, landmark);
            let v = self.index(node, landmark);
            let forward = i64::from(self.from_marks[g]) - i64::from(self.from_marks[v]);
            let backward = i64::from(self.to_marks[v]) - i64::from(self.to_marks[g]);
            for candidate in [forward, backward] {
                if candidate >= 0 && candidate != i64::from(INFINITY) && candidate > best {
                    best = candidate;
                }
            }
        }
        best as Weight
    }

    /// Write the cache file.
    pub fn save(&self, path: &Path) -> Result<()> {
        info!(
            path = %path.display(),
            landmarks = self.landmarks.len(),
            nodes = self.node_count,
            "saving landmark cache"
        );
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer).map_err(|e| Error::io(path, e))?;
        writer.flush().map_err(|e| Error::io(path, e))?;
        Ok(())
    }

    /// Serialize in cache layout to any writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_i32(writer, self.landmarks.len() as i32)?;
        for &landmark in &self.landmarks {
            write_i32(writer, landmark as i32)?;
        }
        for &value in self.from_marks.iter().chain(&self.to_marks) {
            write_i32(writer, value as i32)?;
        }
        Ok(())
    }

    /// Read a cache file written for a graph with `node_count` nodes.
    pub fn load(path: &Path, node_count: usize) -> Result<Self> {
        debug!(path = %path.display(), node_count, "loading landmark cache");
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let store = Self::read_from(BufReader::new(file), node_count, path)?;
        info!(
            path = %path.display(),
            landmarks = store.landmarks.len(),
            "loaded landmark cache"
        );
        Ok(store)
    }

    /// Parse cache bytes; `path` only labels errors.
    pub fn read_from<R: Read>(mut reader: R, node_count: usize, path: &Path) -> Result<Self> {
        let corrupt = |message: String| Error::LandmarkCache {
            path: path.to_path_buf(),
            message,
        };

        let m = read_i32(&mut reader, path)?;
        if m <= 0 {
            return Err(corrupt(format!("landmark count {m} must be positive")));
        }
        let m = m as usize;
        if m > node_count {
            return Err(corrupt(format!(
                "landmark count {m} exceeds the {node_count} nodes in the graph"
            )));
        }

        let mut landmarks = Vec::with_capacity(m);
        for _ in 0..m {
            let id = read_i32(&mut reader, path)?;
            if id < 0 || id as usize >= node_count {
                return Err(corrupt(format!(
                    "landmark id {id} is outside the graph (0..{node_count})"
                )));
            }
            landmarks.push(id as NodeId);
        }

        let cells = node_count
            .checked_mul(m)
            .ok_or_else(|| corrupt(format!("{m} landmarks over {node_count} nodes overflows")))?;
        let mut matrices = [Vec::with_capacity(node_count), Vec::with_capacity(node_count)];
        for matrix in &mut matrices {
            for _ in 0..cells {
                let value = read_i32(&mut reader, path)?;
                if value < 0 {
                    return Err(corrupt(format!("negative distance {value}")));
                }
                matrix.push(value as Weight);
            }
        }

        let mut trailing = [0u8; 1];
        match reader.read(&mut trailing) {
            Ok(0) => {}
            Ok(_) => {
                return Err(corrupt(format!(
                    "trailing data after {cells} cells; was it built for a different node file?"
                )))
            }
            Err(e) => return Err(Error::io(path, e)),
        }

        let [from_marks, to_marks] = matrices;
        Ok(Self {
            landmarks,
            node_count,
            from_marks,
            to_marks,
        })
    }
}

fn copy_column(graph: &Graph, matrix: &mut [Weight], column: usize, m: usize) {
    for node in 0..graph.node_count() {
        matrix[node * m + column] = graph.distance(node as NodeId).unwrap_or(INFINITY);
    }
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> std::io::Result<()> {
    writer.write_all(&value.to_ne_bytes())
}

fn read_i32<R: Read>(reader: &mut R, path: &Path) -> Result<i32> {
    let mut buffer = [0u8; FIELD_SIZE];
    reader.read_exact(&mut buffer).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::LandmarkCache {
                path: path.to_path_buf(),
                message: "file is truncated".to_string(),
            }
        } else {
            Error::io(path, e)
        }
    })?;
    Ok(i32::from_ne_bytes(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LandmarkStore {
        // Two landmarks, three nodes.
        LandmarkStore::from_parts(
            vec![0, 2],
            3,
            vec![0, 5, 2, 3, 7, 0],
            vec![0, 6, 4, 1, INFINITY, 0],
        )
        .expect("consistent matrices")
    }

    #[test]
    fn accessors_follow_row_major_layout() {
        let store = store();
        assert_eq!(store.from_landmark(0, 1), 2);
        assert_eq!(store.from_landmark(1, 1), 3);
        assert_eq!(store.to_landmark(2, 0), INFINITY);
        assert_eq!(store.to_landmark(2, 1), 0);
    }

    #[test]
    fn estimate_takes_largest_valid_candidate() {
        let store = store();
        // L0: forward 7-2=5, backward 4-INF < 0. L1: forward 0-3 < 0, backward 1-0=1.
        assert_eq!(store.estimate(2, 1), 5);
    }

    #[test]
    fn estimate_discards_infinity_candidates() {
        let store = LandmarkStore::from_parts(vec![0], 2, vec![0, INFINITY], vec![0, 0])
            .expect("consistent matrices");
        // forward candidate for goal 1 from node 0 is exactly INFINITY.
        assert_eq!(store.estimate(1, 0), 0);
    }

    #[test]
    fn byte_layout_is_count_ids_then_matrices() {
        let store = store();
        let mut bytes = Vec::new();
        store.write_to(&mut bytes).expect("write to memory");

        assert_eq!(bytes.len(), (1 + 2 + 6 + 6) * FIELD_SIZE);
        assert_eq!(&bytes[0..4], &2i32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_ne_bytes());
        assert_eq!(&bytes[12..16], &0i32.to_ne_bytes());
        assert_eq!(&bytes[16..20], &5i32.to_ne_bytes());
    }

    #[test]
    fn truncated_cache_is_rejected() {
        let store = store();
        let mut bytes = Vec::new();
        store.write_to(&mut bytes).expect("write to memory");
        bytes.truncate(bytes.len() - 2);

        let error = LandmarkStore::read_from(bytes.as_slice(), 3, Path::new("mem")).unwrap_err();
        assert!(error.to_string().contains("truncated"));
    }

    #[test]
    fn cache_for_other_node_count_is_rejected() {
        let store = store();
        let mut bytes = Vec::new();
        store.write_to(&mut bytes).expect("write to memory");

        let smaller = LandmarkStore::read_from(bytes.as_slice(), 2, Path::new("mem")).unwrap_err();
        assert!(smaller.to_string().contains("outside the graph"));

        let larger = LandmarkStore::read_from(bytes.as_slice(), 4, Path::new("mem")).unwrap_err();
        assert!(larger.to_string().contains("truncated"));
    }

    #[test]
    fn oversized_landmark_count_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&i32::MAX.to_ne_bytes());
        bytes.extend_from_slice(&0i32.to_ne_bytes());

        let error = LandmarkStore::read_from(bytes.as_slice(), 10, Path::new("mem")).unwrap_err();
        assert!(matches!(error, Error::LandmarkCache { .. }));
        assert!(error.to_string().contains("exceeds the 10 nodes"));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let store = store();
        let mut bytes = Vec::new();
        store.write_to(&mut bytes).expect("write to memory");
        bytes.extend_from_slice(&7i32.to_ne_bytes());

        let error = LandmarkStore::read_from(bytes.as_slice(), 3, Path::new("mem")).unwrap_err();
        assert!(error.to_string().contains("trailing data"));
    }
}
