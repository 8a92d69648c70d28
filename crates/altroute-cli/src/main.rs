use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use altroute_cli::commands::path::{handle_alt, handle_dijkstra, AltArgs, PathArgs};
use altroute_cli::commands::pre::{handle_pre, PreArgs};
use altroute_cli::commands::route::{handle_route, RouteArgs};
use altroute_cli::commands::stations::{handle_stations, StationArgs};
use altroute_cli::commands::DataDir;
use altroute_cli::output::OutputFormat;
use altroute_lib::PoiKind;

const DATA_DIR_ENV: &str = "ALTROUTE_DATA_DIR";

#[derive(Parser, Debug)]
#[command(author, version, about = "Dijkstra and ALT shortest paths over road networks")]
struct Cli {
    /// Directory that relative input and output paths are resolved against.
    /// Falls back to ALTROUTE_DATA_DIR, then the current directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Precompute landmark distance tables and write the cache file.
    Pre(PreArgs),
    /// Shortest path with plain Dijkstra.
    #[command(alias = "djik")]
    Dijkstra(PathArgs),
    /// Shortest path with ALT (A* guided by landmark lower bounds).
    Alt(AltArgs),
    /// Nearest fuel stations from a node.
    Fuel(StationArgs),
    /// Nearest chargers from a node.
    Charger(StationArgs),
    /// Load the network once and answer queries read from stdin.
    Route(RouteArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = DataDir::from_sources(cli.data_dir, env::var_os(DATA_DIR_ENV).map(PathBuf::from));
    let format = cli.format;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Pre(args) => handle_pre(&mut out, &data_dir, format, args),
        Command::Dijkstra(args) => handle_dijkstra(&mut out, &data_dir, format, args),
        Command::Alt(args) => handle_alt(&mut out, &data_dir, format, args),
        Command::Fuel(args) => handle_stations(&mut out, &data_dir, format, PoiKind::Fuel, args),
        Command::Charger(args) => {
            handle_stations(&mut out, &data_dir, format, PoiKind::Charger, args)
        }
        Command::Route(args) => handle_route(io::stdin().lock(), &mut out, &data_dir, format, args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
