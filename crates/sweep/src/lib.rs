//! Parameter sweeps over neighbourhood size and mobility rate.
//!
//! The sweep driver sits on top of the engine: it builds one model per grid
//! point, runs it, averages the recorded metrics and streams the averages to
//! a flat text file that plotting scripts read back.
//!
//! # Modules
//!
//! - [`config`]: Sweep ranges and the base model configuration
//! - [`grid`]: Grid construction and per-point runs
//! - [`output`]: The flat-text writer and reader

pub mod config;
pub mod grid;
pub mod output;

pub use config::{RateRange, SizeRange, SweepConfig};
pub use grid::{grid, run_point, run_sweep, GridPoint, GridResult, COLUMNS};
pub use output::{GridHeader, OutputError, SweepTable, SweepWriter};

use std::path::Path;

use thiserror::Error;
use trust_core::{ConfigError, EngineError};

/// Errors that can occur while configuring or running a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid model configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0} range is empty")]
    EmptyRange(&'static str),
}

/// Runs the sweep described by `config` and writes it to `path`, one line
/// per grid point as it completes.
pub fn run_to_file(config: &SweepConfig, path: &Path) -> Result<Vec<GridResult>, SweepError> {
    config.validate()?;
    let mut writer = SweepWriter::create(path, &GridHeader::from_config(config))?;
    let results = run_sweep(config, |result| Ok(writer.write_result(result)?))?;
    writer.finish()?;
    Ok(results)
}
