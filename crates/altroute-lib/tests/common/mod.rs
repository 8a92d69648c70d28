#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use altroute_lib::{Graph, GraphBuilder, NodeId, Weight};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/small")
}

/// Write `contents` to `dir/name` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

/// Directed edge list for a random graph with `n` nodes and `m` edges.
/// Low edge density leaves some nodes unreachable from others.
pub fn random_edges(seed: u64, n: u32, m: usize, max_weight: Weight) -> Vec<(NodeId, NodeId, Weight)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..m)
        .map(|_| {
            let from = rng.gen_range(0..n);
            let to = rng.gen_range(0..n);
            let weight = rng.gen_range(1..=max_weight);
            (from, to, weight)
        })
        .collect()
}

pub fn build_graph(n: u32, edges: &[(NodeId, NodeId, Weight)]) -> Graph {
    edges
        .iter()
        .fold(GraphBuilder::new(n as usize), |builder, &(from, to, weight)| {
            builder.edge(from, to, weight)
        })
        .build()
        .expect("random graph builds")
}

/// All-pairs shortest distances by Floyd-Warshall; `None` when unreachable.
pub fn brute_force_distances(n: u32, edges: &[(NodeId, NodeId, Weight)]) -> Vec<Vec<Option<u64>>> {
    let n = n as usize;
    let mut dist = vec![vec![None; n]; n];
    for (node, row) in dist.iter_mut().enumerate() {
        row[node] = Some(0);
    }
    for &(from, to, weight) in edges {
        let cell = &mut dist[from as usize][to as usize];
        let weight = u64::from(weight);
        if cell.map_or(true, |current| weight < current) {
            *cell = Some(weight);
        }
    }
    for k in 0..n {
        for i in 0..n {
            let Some(ik) = dist[i][k] else { continue };
            for j in 0..n {
                if let Some(kj) = dist[k][j] {
                    let through = ik + kj;
                    if dist[i][j].map_or(true, |current| through < current) {
                        dist[i][j] = Some(through);
                    }
                }
            }
        }
    }
    dist
}
