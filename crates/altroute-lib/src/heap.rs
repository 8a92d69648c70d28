//! Binary min-heap over node identifiers.
//!
//! The heap stores node ids only. Priorities are looked up through a key
//! function on every comparison, so an entry always reflects the node's
//! current weight rather than the weight it had when it was pushed. A node
//! may be pushed several times; the search loop discards the extra
//! extractions once the node is finalized, which saves a decrease-key
//! index.

use crate::graph::{NodeId, Weight};

#[derive(Debug, Clone, Default)]
pub struct BinaryMinHeap {
    nodes: Vec<NodeId>,
}

fn parent(i: usize) -> usize {
    (i - 1) >> 1
}

fn left(i: usize) -> usize {
    (i << 1) + 1
}

impl BinaryMinHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `node` and sift it up while its parent weighs more.
    pub fn insert<F>(&mut self, node: NodeId, key: F)
    where
        F: Fn(NodeId) -> Weight,
    {
        self.nodes.push(node);
        let mut i = self.nodes.len() - 1;
        while i > 0 {
            let p = parent(i);
            if key(self.nodes[p]) <= key(self.nodes[i]) {
                break;
            }
            self.nodes.swap(i, p);
            i = p;
        }
    }

    /// Remove and return the id with the smallest current weight.
    pub fn extract_min<F>(&mut self, key: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> Weight,
    {
        if self.nodes.is_empty() {
            return None;
        }
        let min = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sift_down(0, &key);
        }
        Some(min)
    }

    /// Check that every parent weighs no more than its children.
    pub fn is_valid<F>(&self, key: F) -> bool
    where
        F: Fn(NodeId) -> Weight,
    {
        (1..self.nodes.len()).all(|i| key(self.nodes[parent(i)]) <= key(self.nodes[i]))
    }

    fn sift_down<F>(&mut self, i: usize, key: &F)
    where
        F: Fn(NodeId) -> Weight,
    {
        let len = self.nodes.len();
        let mut m = left(i);
        if m >= len {
            return;
        }
        // Right child only wins when strictly lighter.
        let h = m + 1;
        if h < len && key(self.nodes[h]) < key(self.nodes[m]) {
            m = h;
        }
        if key(self.nodes[m]) < key(self.nodes[i]) {
            self.nodes.swap(i, m);
            self.sift_down(m, key);
        }
    }
}
