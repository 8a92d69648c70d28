//! `route` command: load once, then answer queries from stdin.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::commands::{attach_cache, DataDir, GraphArgs, DEFAULT_CACHE, DEFAULT_POIS};
use crate::output::OutputFormat;
use crate::repl::Session;

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
    /// Point-of-interest file. Defaults to `pois.txt` when it exists.
    #[arg(long)]
    pub pois: Option<PathBuf>,
    /// Landmark cache for `alt` queries. Defaults to `landmarks.bin` when
    /// it exists.
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

pub fn handle_route<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    data_dir: &DataDir,
    format: OutputFormat,
    args: &RouteArgs,
) -> Result<()> {
    let pois = explicit_or_existing(data_dir, args.pois.as_ref(), DEFAULT_POIS);
    let mut graph = args.graph.load(data_dir, pois.as_deref())?;

    let cache = explicit_or_existing(data_dir, args.cache.as_ref(), DEFAULT_CACHE);
    if let Some(cache) = &cache {
        attach_cache(&mut graph, &data_dir.resolve(cache))?;
    } else {
        info!("no landmark cache; alt queries are unavailable");
    }

    writeln!(
        out,
        "Loaded {} nodes and {} edges{}. Type 'help' for commands.",
        graph.node_count(),
        graph.edge_count(),
        if cache.is_some() {
            " with landmark tables"
        } else {
            ""
        }
    )?;

    let mut session = Session::new(graph, data_dir.clone(), format);
    session.run(input, out)
}

/// The given path, or the default file name when that file exists under
/// the data directory. Returned paths are still relative to it.
fn explicit_or_existing(
    data_dir: &DataDir,
    explicit: Option<&PathBuf>,
    default: &str,
) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.clone()),
        None => {
            let candidate = PathBuf::from(default);
            data_dir.resolve(&candidate).is_file().then_some(candidate)
        }
    }
}
