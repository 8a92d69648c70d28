//! `dijkstra` and `alt` commands: shortest path between two nodes.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use altroute_lib::output::save_path_csv;
use altroute_lib::{find_route, Graph, NodeId, RouteAlgorithm, RouteSummary};

use crate::commands::{attach_cache, DataDir, GraphArgs, DEFAULT_CACHE};
use crate::output::{render_csv_written, render_footer, render_route, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
    /// Point-of-interest file, used to name the endpoints.
    #[arg(long)]
    pub pois: Option<PathBuf>,
    /// Write the path as CSV to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Origin node id.
    pub from: NodeId,
    /// Destination node id.
    pub to: NodeId,
}

#[derive(Args, Debug, Clone)]
pub struct AltArgs {
    #[command(flatten)]
    pub path: PathArgs,
    /// Landmark cache written by `pre`.
    #[arg(long, default_value = DEFAULT_CACHE)]
    pub cache: PathBuf,
}

pub fn handle_dijkstra<W: Write>(
    out: &mut W,
    data_dir: &DataDir,
    format: OutputFormat,
    args: &PathArgs,
) -> Result<()> {
    let start = Instant::now();
    let mut graph = args.graph.load(data_dir, args.pois.as_deref())?;
    let csv = args.out.as_deref().map(|path| data_dir.resolve(path));
    run_route(
        out,
        &mut graph,
        RouteAlgorithm::Dijkstra,
        args.from,
        args.to,
        csv.as_deref(),
        format,
    )?;
    if format == OutputFormat::Text {
        render_footer(out, start.elapsed())?;
    }
    Ok(())
}

pub fn handle_alt<W: Write>(
    out: &mut W,
    data_dir: &DataDir,
    format: OutputFormat,
    args: &AltArgs,
) -> Result<()> {
    let start = Instant::now();
    let mut graph = args.path.graph.load(data_dir, args.path.pois.as_deref())?;
    attach_cache(&mut graph, &data_dir.resolve(&args.cache))?;
    let csv = args.path.out.as_deref().map(|path| data_dir.resolve(path));
    run_route(
        out,
        &mut graph,
        RouteAlgorithm::Alt,
        args.path.from,
        args.path.to,
        csv.as_deref(),
        format,
    )?;
    if format == OutputFormat::Text {
        render_footer(out, start.elapsed())?;
    }
    Ok(())
}

/// Search, print the summary and optionally write the path CSV.
///
/// An unreachable destination is reported, not treated as a failure.
pub fn run_route<W: Write>(
    out: &mut W,
    graph: &mut Graph,
    algorithm: RouteAlgorithm,
    from: NodeId,
    to: NodeId,
    csv: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let (route, report) = find_route(graph, from, to, algorithm)
        .with_context(|| format!("{algorithm} search from {from} to {to} failed"))?;

    let summary = RouteSummary::from_route(graph, &route, algorithm, &report);
    render_route(out, &summary, format)?;

    if let Some(path) = csv {
        save_path_csv(graph, &route, path)
            .with_context(|| format!("failed to write path CSV {}", path.display()))?;
        render_csv_written(out, "Path", path, format)?;
    }
    Ok(())
}
