//! Interactive query loop behind the `route` command.
//!
//! The graph, points of interest and landmark tables are loaded once; each
//! input line is then parsed and answered synchronously:
//!
//! ```text
//! djik <from> <to> [file]
//! alt <from> <to> [file]
//! fuel <node> [count] [file]
//! charger <node> [count] [file]
//! help
//! quit
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use thiserror::Error;

use altroute_lib::{Graph, NodeId, PoiKind, RouteAlgorithm};

use crate::commands::path::run_route;
use crate::commands::stations::{run_stations, DEFAULT_COUNT};
use crate::commands::DataDir;
use crate::output::{render_footer, OutputFormat};

/// Words accepted as the first token of a line.
pub const COMMANDS: &[&str] = &[
    "djik", "dijkstra", "alt", "fuel", "charger", "help", "quit", "exit",
];

const ROUTE_USAGE: &str = "djik|alt <from> <to> [file]";
const STATION_USAGE: &str = "fuel|charger <node> [count] [file]";
const SUGGESTION_THRESHOLD: f64 = 0.8;
const PROMPT: &str = "> ";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Route {
        algorithm: RouteAlgorithm,
        from: NodeId,
        to: NodeId,
        out: Option<PathBuf>,
    },
    Stations {
        kind: PoiKind,
        origin: NodeId,
        count: usize,
        out: Option<PathBuf>,
    },
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplError {
    #[error("unknown command '{word}'{}", format_suggestions(.suggestions))]
    UnknownCommand {
        word: String,
        suggestions: Vec<&'static str>,
    },

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {what} '{value}'")]
    InvalidNumber { what: &'static str, value: String },
}

fn format_suggestions(suggestions: &[&str]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(". Did you mean '{}'?", only),
        many => format!(
            ". Did you mean one of: {}?",
            many.iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Commands that look like `word`, closest first.
pub fn suggest(word: &str) -> Vec<&'static str> {
    let word = word.to_lowercase();
    let mut scored: Vec<(f64, &'static str)> = COMMANDS
        .iter()
        .map(|&command| (strsim::jaro_winkler(&word, command), command))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(3).map(|(_, command)| command).collect()
}

pub fn parse_line(line: &str) -> Result<ReplCommand, ReplError> {
    let mut tokens = line.split_whitespace();
    let Some(word) = tokens.next() else {
        return Ok(ReplCommand::Empty);
    };
    let rest: Vec<&str> = tokens.collect();

    match word.to_lowercase().as_str() {
        "djik" | "dijkstra" => parse_route(RouteAlgorithm::Dijkstra, &rest),
        "alt" => parse_route(RouteAlgorithm::Alt, &rest),
        "fuel" => parse_stations(PoiKind::Fuel, &rest),
        "charger" => parse_stations(PoiKind::Charger, &rest),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        _ => Err(ReplError::UnknownCommand {
            word: word.to_string(),
            suggestions: suggest(word),
        }),
    }
}

fn parse_route(algorithm: RouteAlgorithm, args: &[&str]) -> Result<ReplCommand, ReplError> {
    match args {
        [from, to] | [from, to, _] => Ok(ReplCommand::Route {
            algorithm,
            from: number(from, "node id")?,
            to: number(to, "node id")?,
            out: args.get(2).map(PathBuf::from),
        }),
        _ => Err(ReplError::Usage(ROUTE_USAGE)),
    }
}

fn parse_stations(kind: PoiKind, args: &[&str]) -> Result<ReplCommand, ReplError> {
    let (origin, rest) = match args {
        [origin, rest @ ..] if rest.len() <= 2 => (number(origin, "node id")?, rest),
        _ => return Err(ReplError::Usage(STATION_USAGE)),
    };
    let (count, out) = match rest {
        [] => (DEFAULT_COUNT, None),
        [count, file] => (number(count, "count")?, Some(PathBuf::from(file))),
        [single] => match single.parse::<usize>() {
            Ok(count) => (count, None),
            Err(_) => (DEFAULT_COUNT, Some(PathBuf::from(single))),
        },
        _ => return Err(ReplError::Usage(STATION_USAGE)),
    };
    Ok(ReplCommand::Stations {
        kind,
        origin,
        count,
        out,
    })
}

fn number<T: std::str::FromStr>(raw: &str, what: &'static str) -> Result<T, ReplError> {
    raw.parse().map_err(|_| ReplError::InvalidNumber {
        what,
        value: raw.to_string(),
    })
}

/// A loaded graph answering queries until `quit` or end of input.
pub struct Session {
    pub graph: Graph,
    pub data_dir: DataDir,
    pub format: OutputFormat,
}

impl Session {
    pub fn new(graph: Graph, data_dir: DataDir, format: OutputFormat) -> Self {
        Self {
            graph,
            data_dir,
            format,
        }
    }

    /// Read and answer lines from `input`. Bad lines and failed queries are
    /// reported to `out` and the loop continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;

            let command = match parse_line(&line) {
                Ok(command) => command,
                Err(error) => {
                    writeln!(out, "{error}")?;
                    continue;
                }
            };
            if command == ReplCommand::Quit {
                break;
            }
            if let Err(error) = self.execute(command, out) {
                writeln!(out, "error: {error:#}")?;
            }
        }
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, command: ReplCommand, out: &mut W) -> Result<()> {
        let start = Instant::now();
        match command {
            ReplCommand::Route {
                algorithm,
                from,
                to,
                out: csv,
            } => {
                let csv = csv.map(|path| self.data_dir.resolve(&path));
                run_route(
                    out,
                    &mut self.graph,
                    algorithm,
                    from,
                    to,
                    csv.as_deref(),
                    self.format,
                )?;
            }
            ReplCommand::Stations {
                kind,
                origin,
                count,
                out: csv,
            } => {
                let csv = csv.map(|path| self.data_dir.resolve(&path));
                run_stations(
                    out,
                    &mut self.graph,
                    kind,
                    origin,
                    count,
                    csv.as_deref(),
                    self.format,
                )?;
            }
            ReplCommand::Help => {
                print_help(out)?;
                return Ok(());
            }
            ReplCommand::Quit | ReplCommand::Empty => return Ok(()),
        }
        if self.format == OutputFormat::Text {
            render_footer(out, start.elapsed())?;
        }
        Ok(())
    }
}

pub fn print_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  {ROUTE_USAGE}")?;
    writeln!(out, "  {STATION_USAGE}")?;
    writeln!(out, "  help")?;
    writeln!(out, "  quit")
}
