//! Readers for the node, edge and point-of-interest text files.
//!
//! Each file starts with a record count followed by one whitespace
//! separated record per line:
//!
//! ```text
//! nodes:  <id> <lat> <lon>
//! edges:  <from> <to> <carTime> <length> <speedLimit>
//! pois:   <id> <mode> "<display name>"
//! ```
//!
//! Blank lines are skipped. Bytes that are not valid UTF-8 (older exports
//! use Latin-1 names) are replaced rather than rejected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::graph::{EdgeDirection, Graph, NodeId, PoiKind, Weight};

/// Node ids are `u32`, so a graph holds at most this many nodes.
const MAX_NODES: usize = (NodeId::MAX as usize).saturating_add(1);

/// Load a graph from its node and edge files, optionally tagging points of
/// interest. `Reverse` stores every edge transposed.
pub fn load_graph(
    nodes: &Path,
    edges: &Path,
    pois: Option<&Path>,
    direction: EdgeDirection,
) -> Result<Graph> {
    let mut graph = read_nodes(open(nodes)?, nodes, direction)?;
    read_edges(&mut graph, open(edges)?, edges)?;
    if let Some(pois) = pois {
        read_pois(&mut graph, open(pois)?, pois)?;
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        direction = ?direction,
        "loaded graph"
    );
    Ok(graph)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(path, e))
}

/// Parse a node file. `label` names the source in errors.
pub fn read_nodes<R: BufRead>(reader: R, label: &Path, direction: EdgeDirection) -> Result<Graph> {
    let mut records = Records::new(reader, label);
    let (header_line, count) = records.header()?;
    if count > MAX_NODES {
        return Err(records.parse_error(
            header_line,
            format!("node count {count} exceeds the {MAX_NODES} ids a graph can address"),
        ));
    }

    // Records are collected before the graph is sized so the allocation
    // follows what the file actually holds.
    let mut placed = Vec::new();
    for index in 0..count {
        let (line, text) = records.expect(index, count)?;
        let mut fields = text.split_whitespace();
        let nr = records.node_id(fields.next(), line, count)?;
        let lat: f64 = records.field(fields.next(), "latitude", line)?;
        let lon: f64 = records.field(fields.next(), "longitude", line)?;
        placed.push((line, nr, lat, lon));
    }

    let mut graph = Graph::with_nodes(count, direction);
    let mut seen = vec![false; count];
    for (line, nr, lat, lon) in placed {
        if std::mem::replace(&mut seen[nr as usize], true) {
            warn!(node = nr, line, "duplicate node id overwrites earlier record");
        }
        graph.place_node(nr, lat, lon);
    }
    Ok(graph)
}

/// Parse an edge file into `graph`. Only `from`, `to` and the car time are
/// consumed; trailing columns are ignored.
pub fn read_edges<R: BufRead>(graph: &mut Graph, reader: R, label: &Path) -> Result<()> {
    let mut records = Records::new(reader, label);
    let (_, count) = records.header()?;
    let node_count = graph.node_count();

    for index in 0..count {
        let (line, text) = records.expect(index, count)?;
        let mut fields = text.split_whitespace();
        let from = records.node_id(fields.next(), line, node_count)?;
        let to = records.node_id(fields.next(), line, node_count)?;
        let weight: Weight = records.field(fields.next(), "car time", line)?;
        graph.insert_edge(from, to, weight);
    }
    Ok(())
}

/// Parse a point-of-interest file and tag the referenced nodes.
pub fn read_pois<R: BufRead>(graph: &mut Graph, reader: R, label: &Path) -> Result<()> {
    let mut records = Records::new(reader, label);
    let (_, count) = records.header()?;
    let node_count = graph.node_count();

    for index in 0..count {
        let (line, text) = records.expect(index, count)?;
        let (id, rest) = split_token(&text);
        let (mode, name) = split_token(rest);
        let nr = records.node_id(Some(id).filter(|s| !s.is_empty()), line, node_count)?;
        let code: u32 = records.field(Some(mode).filter(|s| !s.is_empty()), "mode", line)?;
        let name = name.trim().trim_matches('"').to_string();
        graph.tag_node(nr, PoiKind::from_code(code), name);
    }
    Ok(())
}

fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    text.split_once(char::is_whitespace).unwrap_or((text, ""))
}

/// Line source that tracks 1-based line numbers for error messages.
struct Records<R> {
    reader: R,
    path: PathBuf,
    line: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> Records<R> {
    fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            line: 0,
            buffer: Vec::new(),
        }
    }

    /// Next non-blank line.
    fn next_record(&mut self) -> Result<Option<(usize, String)>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .map_err(|e| Error::io(&self.path, e))?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = String::from_utf8_lossy(&self.buffer);
            let text = text.trim();
            if !text.is_empty() {
                return Ok(Some((self.line, text.to_string())));
            }
        }
    }

    fn header(&mut self) -> Result<(usize, usize)> {
        match self.next_record()? {
            Some((line, text)) => {
                let count = self.field(text.split_whitespace().next(), "record count", line)?;
                Ok((line, count))
            }
            None => Err(self.parse_error(1, "file is empty; expected a record count")),
        }
    }

    fn expect(&mut self, index: usize, count: usize) -> Result<(usize, String)> {
        match self.next_record()? {
            Some(record) => Ok(record),
            None => Err(self.parse_error(
                self.line,
                format!("expected {count} records but the file ends after {index}"),
            )),
        }
    }

    fn field<T: FromStr>(&self, raw: Option<&str>, what: &str, line: usize) -> Result<T> {
        let raw = raw.ok_or_else(|| self.parse_error(line, format!("missing {what}")))?;
        raw.parse()
            .map_err(|_| self.parse_error(line, format!("invalid {what} '{raw}'")))
    }

    fn node_id(&self, raw: Option<&str>, line: usize, node_count: usize) -> Result<NodeId> {
        let id: i64 = self.field(raw, "node id", line)?;
        if id < 0 || id as u64 >= node_count as u64 {
            return Err(Error::NodeOutOfRange {
                path: self.path.clone(),
                line,
                id,
                node_count,
            });
        }
        Ok(id as NodeId)
    }

    fn parse_error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_token_handles_tabs_and_missing_rest() {
        assert_eq!(split_token("\t12\t2\t\"Circle K\""), ("12", "2\t\"Circle K\""));
        assert_eq!(split_token("7"), ("7", ""));
        assert_eq!(split_token(""), ("", ""));
    }

    #[test]
    fn oversized_node_count_is_a_parse_error() {
        let bytes: &[u8] = b"18446744073709551615\n0 1.0 2.0\n";
        let error = read_nodes(bytes, Path::new("nodes.txt"), EdgeDirection::Forward).unwrap_err();
        assert!(matches!(error, Error::Parse { line: 1, .. }), "{error}");
    }

    #[test]
    fn node_count_beyond_records_fails_without_allocating() {
        let bytes: &[u8] = b"4000000000\n0 1.0 2.0\n";
        let error = read_nodes(bytes, Path::new("nodes.txt"), EdgeDirection::Forward).unwrap_err();
        assert!(error.to_string().contains("expected 4000000000 records"), "{error}");
    }

    #[test]
    fn latin1_names_are_replaced_not_rejected() {
        let mut graph = Graph::with_nodes(1, EdgeDirection::Forward);
        let bytes: &[u8] = b"1\n0 2 \"Troms\xf8\"\n";
        read_pois(&mut graph, bytes, Path::new("pois.txt")).expect("lossy decode");

        let name = graph.node(0).and_then(|node| node.name.clone()).expect("named");
        assert!(name.starts_with("Troms"));
        assert_eq!(graph.node(0).map(|node| node.kind), Some(PoiKind::Fuel));
    }
}
