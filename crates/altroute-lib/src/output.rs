use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, PoiKind, Weight};
use crate::route::{Route, Station};
use crate::search::{RouteAlgorithm, SearchReport};

/// Path CSV output is thinned to roughly this many rows.
pub const MAX_PATH_ROWS: usize = 2000;

const PATH_HEADER: [&str; 4] = ["nr", "node", "latitude", "longitude"];
const STATION_HEADER: [&str; 4] = ["mode", "node", "latitude", "longitude"];

/// Keep every `step`-th node so at most [`MAX_PATH_ROWS`] rows (plus the
/// final node) are written.
pub fn decimation_step(path_len: usize) -> usize {
    path_len.div_ceil(MAX_PATH_ROWS).max(1)
}

/// Format hundredths of a second as `h:mm:ss`.
pub fn format_travel_time(centiseconds: Weight) -> String {
    let seconds = centiseconds / 100;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Write a route as `nr,node,latitude,longitude` rows.
///
/// `nr` is the 1-based position in the full path, so gaps show where rows
/// were decimated. The first and last node are always written.
pub fn write_path_csv<W: Write>(graph: &Graph, route: &Route, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(PATH_HEADER)?;

    let step = decimation_step(route.path.len());
    let last = route.path.len().saturating_sub(1);
    for (index, &node) in route.path.iter().enumerate() {
        if index % step != 0 && index != last {
            continue;
        }
        let (lat, lon) = coordinates(graph, node);
        csv.write_record([
            (index + 1).to_string(),
            node.to_string(),
            format!("{lat:.7}"),
            format!("{lon:.7}"),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write found stations as `mode,node,latitude,longitude` rows.
pub fn write_stations_csv<W: Write>(graph: &Graph, stations: &[Station], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(STATION_HEADER)?;
    for station in stations {
        let (lat, lon) = coordinates(graph, station.node);
        csv.write_record([
            station.kind.code().to_string(),
            station.node.to_string(),
            format!("{lat:.8}"),
            format!("{lon:.8}"),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// [`write_path_csv`] into a new file at `path`.
pub fn save_path_csv(graph: &Graph, route: &Route, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    write_path_csv(graph, route, file)
}

/// [`write_stations_csv`] into a new file at `path`.
pub fn save_stations_csv(graph: &Graph, stations: &[Station], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    write_stations_csv(graph, stations, file)
}

fn coordinates(graph: &Graph, node: NodeId) -> (f64, f64) {
    graph
        .node(node)
        .map(|node| (node.lat, node.lon))
        .unwrap_or((0.0, 0.0))
}

/// A node on a rendered route or station list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeSummary {
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl NodeSummary {
    fn from_graph(graph: &Graph, node: NodeId) -> Self {
        let (latitude, longitude) = coordinates(graph, node);
        Self {
            node,
            name: graph.node(node).and_then(|n| n.name.clone()),
            latitude,
            longitude,
        }
    }

    /// Name when the node is a named point of interest, else its id.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", name, self.node),
            None => self.node.to_string(),
        }
    }
}

/// Structured view of a point-to-point result for higher-level consumers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub origin: NodeSummary,
    pub destination: NodeSummary,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<String>,
    pub hops: usize,
    pub visited: usize,
    pub stale: usize,
    pub path: Vec<NodeId>,
}

impl RouteSummary {
    pub fn from_route(
        graph: &Graph,
        route: &Route,
        algorithm: RouteAlgorithm,
        report: &SearchReport,
    ) -> Self {
        let destination = route.destination.unwrap_or(route.origin);
        Self {
            algorithm,
            origin: NodeSummary::from_graph(graph, route.origin),
            destination: NodeSummary::from_graph(graph, destination),
            found: route.is_found(),
            cost: route.cost,
            travel_time: route.cost.map(format_travel_time),
            hops: route.hop_count(),
            visited: report.visited,
            stale: report.stale,
            path: route.path.clone(),
        }
    }
}

/// One entry of a nearest-station result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub location: NodeSummary,
    pub distance: Weight,
    pub travel_time: String,
}

/// Structured view of a nearest-station result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationSummary {
    pub kind: PoiKind,
    pub origin: NodeSummary,
    pub requested: usize,
    pub visited: usize,
    pub stations: Vec<StationEntry>,
}

impl StationSummary {
    pub fn from_report(
        graph: &Graph,
        origin: NodeId,
        kind: PoiKind,
        requested: usize,
        report: &SearchReport,
    ) -> Self {
        let stations = report
            .stations
            .iter()
            .enumerate()
            .map(|(index, station)| StationEntry {
                rank: index + 1,
                location: NodeSummary::from_graph(graph, station.node),
                distance: station.distance,
                travel_time: format_travel_time(station.distance),
            })
            .collect();
        Self {
            kind,
            origin: NodeSummary::from_graph(graph, origin),
            requested,
            visited: report.visited,
            stations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_time_uses_hundredths_of_seconds() {
        assert_eq!(format_travel_time(0), "0:00:00");
        assert_eq!(format_travel_time(6_100), "0:01:01");
        assert_eq!(format_travel_time(360_000 + 5_900), "1:00:59");
        assert_eq!(format_travel_time(99), "0:00:00");
    }

    #[test]
    fn short_paths_are_not_decimated() {
        assert_eq!(decimation_step(0), 1);
        assert_eq!(decimation_step(1), 1);
        assert_eq!(decimation_step(MAX_PATH_ROWS), 1);
        assert_eq!(decimation_step(MAX_PATH_ROWS + 1), 2);
        assert_eq!(decimation_step(10 * MAX_PATH_ROWS), 10);
    }
}
