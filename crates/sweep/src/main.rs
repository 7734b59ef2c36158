//! Trust Sweep
//!
//! Runs the neighbourhood-size by mobility-rate sweep and writes the flat
//! text results file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sweep::{run_to_file, SweepConfig, SweepError};
use trust_core::Population;

/// Command line arguments for a sweep
#[derive(Parser, Debug)]
#[command(name = "trust_sweep")]
#[command(about = "Sweeps neighbourhood size and mobility rate of the trust simulation")]
struct Args {
    /// Output file for the sweep results
    output: PathBuf,

    /// TOML sweep configuration; defaults to the reference sweep
    #[arg(long)]
    config: Option<PathBuf>,

    /// Agent kind, or a comma separated mix
    #[arg(long)]
    agent_kind: Option<Population>,

    /// Population size
    #[arg(long)]
    num_agents: Option<usize>,

    /// Base random seed; grid point i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn sweep_config(&self) -> Result<SweepConfig, SweepError> {
        let mut config = match &self.config {
            Some(path) if path.exists() => SweepConfig::from_file(path)?,
            Some(path) => {
                warn!(path = %path.display(), "sweep config not found, using defaults");
                SweepConfig::default()
            }
            None => SweepConfig::default(),
        };

        if let Some(kind) = &self.agent_kind {
            config.model.agent_kind = kind.clone();
        }
        if let Some(n) = self.num_agents {
            config.model.num_agents = n;
        }
        if let Some(seed) = self.seed {
            config.model.seed = seed;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = args
        .sweep_config()
        .and_then(|config| run_to_file(&config, &args.output));
    match result {
        Ok(results) => {
            info!(points = results.len(), path = %args.output.display(), "results written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
