//! TRC Lineage Validator Binary
//!
//! Validates a lineage of TRCs given as JSON files, oldest first:
//!
//! ```text
//! trc-validate ISD1-B1-S1.json ISD1-B1-S2.json ISD1-B1-S3.json
//! ```
//!
//! The first file is taken as trusted. Exits with status 0 if every update
//! is valid, 1 if an update is rejected, 2 on usage or input errors.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use trustroot_core::{Trc, TrcError};
use trustroot_validator::report::{ChainReport, Rejection};
use trustroot_validator::{validate_chain, Cli, CliConfig};

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode { path: PathBuf, source: TrcError },

    #[error("Failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::from(&cli);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::from(2);
    }

    match run(&cli.trcs, &config) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "trc-validate failed");
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run(paths: &[PathBuf], config: &CliConfig) -> Result<ExitCode, CliError> {
    let trcs = paths
        .iter()
        .map(|path| load(path))
        .collect::<Result<Vec<_>, _>>()?;

    info!(files = trcs.len(), "Validating TRC lineage");

    match validate_chain(&trcs) {
        Ok(infos) => {
            println!("{}", ChainReport::new(&trcs, &infos).render(config.output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", Rejection::from(&e).render(config.output)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load(path: &Path) -> Result<Trc, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Trc::from_bytes(&bytes).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
