//! `pre` command: build and save landmark distance tables.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use altroute_lib::{LandmarkStore, NodeId};

use crate::commands::{DataDir, GraphArgs, DEFAULT_CACHE};
use crate::output::{render_footer, render_preprocess, OutputFormat, PreprocessSummary};

#[derive(Args, Debug, Clone)]
pub struct PreArgs {
    #[command(flatten)]
    pub graph: GraphArgs,
    /// Where to write the landmark cache.
    #[arg(long, default_value = DEFAULT_CACHE)]
    pub cache: PathBuf,
    /// Landmark node ids; corners and far edges of the network work best.
    #[arg(required = true, num_args = 1..)]
    pub landmarks: Vec<NodeId>,
}

pub fn handle_pre<W: Write>(
    out: &mut W,
    data_dir: &DataDir,
    format: OutputFormat,
    args: &PreArgs,
) -> Result<()> {
    let start = Instant::now();
    let mut graph = args.graph.load(data_dir, None)?;

    let store = LandmarkStore::preprocess(&mut graph, &args.landmarks)
        .context("landmark preprocessing failed")?;
    let cache = data_dir.resolve(&args.cache);
    store
        .save(&cache)
        .with_context(|| format!("failed to write landmark cache {}", cache.display()))?;

    let summary = PreprocessSummary {
        landmarks: store.landmarks().to_vec(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        cache: cache.display().to_string(),
    };
    render_preprocess(out, &summary, format)?;
    if format == OutputFormat::Text {
        render_footer(out, start.elapsed())?;
    }
    Ok(())
}
