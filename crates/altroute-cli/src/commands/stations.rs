//! `fuel` and `charger` commands: nearest points of interest of one kind.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use altroute_lib::output::save_stations_csv;
use altroute_lib::{find_nearest, Graph, NodeId, PoiKind, StationSummary};

use crate::commands::{DataDir, GraphArgs, DEFAULT_POIS};
use crate::output::{render_csv_written, render_footer, render_stations, OutputFormat};

/// Stations returned when no count is given.
pub const DEFAULT_COUNT: usize = 10;

#[derive(Args, Debug, Clone)]
pub struct StationArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
    /// Point-of-interest file that marks the stations.
    #[arg(long, default_value = DEFAULT_POIS)]
    pub pois: PathBuf,
    /// How many stations to find.
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,
    /// Write the stations as CSV to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Node to search from.
    pub origin: NodeId,
}

pub fn handle_stations<W: Write>(
    out: &mut W,
    data_dir: &DataDir,
    format: OutputFormat,
    kind: PoiKind,
    args: &StationArgs,
) -> Result<()> {
    let start = Instant::now();
    let mut graph = args.graph.load(data_dir, Some(args.pois.as_path()))?;
    let csv = args.out.as_deref().map(|path| data_dir.resolve(path));
    run_stations(
        out,
        &mut graph,
        kind,
        args.origin,
        args.count,
        csv.as_deref(),
        format,
    )?;
    if format == OutputFormat::Text {
        render_footer(out, start.elapsed())?;
    }
    Ok(())
}

/// Search, print the station list and optionally write the station CSV.
///
/// Finding fewer stations than requested is not an error.
pub fn run_stations<W: Write>(
    out: &mut W,
    graph: &mut Graph,
    kind: PoiKind,
    origin: NodeId,
    count: usize,
    csv: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let report = find_nearest(graph, origin, kind, count)
        .with_context(|| format!("station search from {origin} failed"))?;

    let summary = StationSummary::from_report(graph, origin, kind, count, &report);
    render_stations(out, &summary, format)?;

    if let Some(path) = csv {
        save_stations_csv(graph, &report.stations, path)
            .with_context(|| format!("failed to write station CSV {}", path.display()))?;
        render_csv_written(out, "Stations", path, format)?;
    }
    Ok(())
}
