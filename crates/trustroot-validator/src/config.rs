//! Command line of the `trc-validate` binary
//!
//! Both settings also read from the environment:
//! - `TRUSTROOT_LOG_LEVEL`: tracing level, default `info`
//! - `TRUSTROOT_OUTPUT`: `json` or `text`, default `text`

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per update
    #[default]
    Text,
    /// A JSON document with every update
    Json,
}

/// Validate a lineage of TRCs, oldest first
///
/// The first file is taken as trusted. Exits with status 0 if every update
/// is valid, 1 if an update is rejected, 2 on usage or input errors.
#[derive(Debug, Clone, Parser)]
#[command(name = "trc-validate", version = trustroot_core::VERSION)]
pub struct Cli {
    /// TRC files in JSON, oldest first
    #[arg(required = true, num_args = 2..)]
    pub trcs: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TRUSTROOT_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,

    /// Report format
    #[arg(long, env = "TRUSTROOT_OUTPUT", value_enum, ignore_case = true, default_value_t)]
    pub output: OutputFormat,
}

/// Settings the binary runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub log_level: Level,
    pub output: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            output: OutputFormat::Text,
        }
    }
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            log_level: cli.log_level,
            output: cli.output,
        }
    }
}
