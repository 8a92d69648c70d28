//! altroute CLI library.
//!
//! Subcommand handlers, result rendering and the interactive session used
//! by the `altroute` binary.

pub mod commands;
pub mod output;
pub mod repl;
