//! Output formatting for query results.
//!
//! Every renderer writes to a caller-supplied writer so the one-shot
//! subcommands (stdout) and the interactive session share the same text.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use altroute_lib::{NodeId, RouteSummary, StationSummary};

/// Paths longer than this are shortened in text output.
const PATH_PREVIEW: usize = 12;

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// Result of the `pre` subcommand.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PreprocessSummary {
    pub landmarks: Vec<NodeId>,
    pub nodes: usize,
    pub edges: usize,
    pub cache: String,
}

pub fn render_route<W: Write>(
    out: &mut W,
    summary: &RouteSummary,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, summary);
    }

    let origin = summary.origin.display_name();
    let destination = summary.destination.display_name();
    let Some(cost) = summary.cost else {
        writeln!(
            out,
            "No route found from {} to {} (algorithm: {}).",
            origin, destination, summary.algorithm
        )?;
        return writeln!(out, "Visited {} nodes", summary.visited);
    };

    writeln!(
        out,
        "Route from {} to {} ({} hops; algorithm: {}):",
        origin, destination, summary.hops, summary.algorithm
    )?;
    writeln!(out, "Path: {}", format_path(&summary.path))?;
    writeln!(
        out,
        "Travel time: {} (cost {})",
        summary.travel_time.as_deref().unwrap_or("-"),
        cost
    )?;
    writeln!(out, "Visited {} nodes", summary.visited)
}

pub fn render_stations<W: Write>(
    out: &mut W,
    summary: &StationSummary,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, summary);
    }

    let kind = station_label(summary);
    let origin = summary.origin.display_name();
    if summary.stations.is_empty() {
        writeln!(out, "No {kind} reachable from {origin}.")?;
        return writeln!(out, "Visited {} nodes", summary.visited);
    }

    writeln!(
        out,
        "Nearest {} from {} ({} of {} requested):",
        kind,
        origin,
        summary.stations.len(),
        summary.requested
    )?;
    for station in &summary.stations {
        writeln!(
            out,
            "  {:>2}. {}  {}",
            station.rank,
            station.location.display_name(),
            station.travel_time
        )?;
    }
    writeln!(out, "Visited {} nodes", summary.visited)
}

pub fn render_preprocess<W: Write>(
    out: &mut W,
    summary: &PreprocessSummary,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, summary);
    }
    let landmarks: Vec<String> = summary.landmarks.iter().map(ToString::to_string).collect();
    writeln!(
        out,
        "Preprocessed {} landmarks ({}) over {} nodes and {} edges",
        summary.landmarks.len(),
        landmarks.join(", "),
        summary.nodes,
        summary.edges
    )?;
    writeln!(out, "Landmark cache written to {}", summary.cache)
}

/// Note where a CSV file went. Silent in JSON mode.
pub fn render_csv_written<W: Write>(
    out: &mut W,
    what: &str,
    path: &Path,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return Ok(());
    }
    writeln!(out, "{} written to {}", what, path.display())
}

/// Print the footer with elapsed time.
pub fn render_footer<W: Write>(out: &mut W, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "\nCompleted in {}", format_elapsed(elapsed))
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let elapsed_ms = elapsed.as_millis();
    if elapsed_ms < 1000 {
        format!("{}ms", elapsed_ms)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// `a -> b -> c`, eliding the middle of long paths.
pub fn format_path(path: &[NodeId]) -> String {
    let join = |nodes: &[NodeId]| {
        nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    };
    if path.len() <= PATH_PREVIEW {
        return join(path);
    }
    let half = PATH_PREVIEW / 2;
    format!(
        "{} -> ... ({} more) -> {}",
        join(&path[..half]),
        path.len() - 2 * half,
        join(&path[path.len() - half..])
    )
}

fn station_label(summary: &StationSummary) -> &'static str {
    match summary.kind {
        altroute_lib::PoiKind::Fuel => "fuel stations",
        altroute_lib::PoiKind::Charger => "chargers",
        altroute_lib::PoiKind::None => "points of interest",
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
