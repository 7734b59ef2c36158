//! Trust Simulation
//!
//! Runs one model with the given parameters and prints a summary of the
//! recorded metrics.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trust_core::{write_report, Activation, Model, ModelConfig, Population, RunReport};

/// Command line arguments for a single run
#[derive(Parser, Debug)]
#[command(name = "trust_sim")]
#[command(about = "Trust games among mobile agents in neighbourhoods and a market")]
struct Args {
    /// TOML file with the base configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Agent kind, or a comma separated mix (e.g. "gossip,naive_trust")
    #[arg(long)]
    agent_kind: Option<Population>,

    /// Per-tick probability of moving to another neighbourhood
    #[arg(long)]
    mobility_rate: Option<f64>,

    /// Population size
    #[arg(long)]
    num_agents: Option<usize>,

    /// Neighbourhood size; must not exceed the population size
    #[arg(long)]
    neighbourhood_size: Option<usize>,

    /// Learning rate of reinforcement learners
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Reinforcement learners learn from payoff relative to their average
    #[arg(long)]
    relative_reward: bool,

    /// Reputation memory capacity
    #[arg(long)]
    memory_size: Option<usize>,

    /// Shuffle the agent order every tick
    #[arg(long)]
    shuffled: bool,

    /// Unrecorded warm-up ticks
    #[arg(long, default_value_t = 100)]
    onset: u64,

    /// Recorded ticks
    #[arg(long, default_value_t = 1000)]
    record: u64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Write the run report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn model_config(&self) -> Result<ModelConfig, trust_core::ConfigError> {
        let mut config = match &self.config {
            Some(path) if path.exists() => ModelConfig::load(path)?,
            Some(path) => {
                warn!(path = %path.display(), "config file not found, using defaults");
                ModelConfig::default()
            }
            None => ModelConfig::default(),
        };

        if let Some(kind) = &self.agent_kind {
            config.agent_kind = kind.clone();
        }
        if let Some(rate) = self.mobility_rate {
            config.mobility_rate = rate;
        }
        if let Some(n) = self.num_agents {
            config.num_agents = n;
        }
        if let Some(size) = self.neighbourhood_size {
            config.neighbourhood_size = size;
        }
        if let Some(rate) = self.learning_rate {
            config.learning_rate = rate;
        }
        if self.relative_reward {
            config.relative_reward = true;
        }
        if let Some(size) = self.memory_size {
            config.memory_size = size;
        }
        if self.shuffled {
            config.activation = Activation::Shuffled;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
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

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.model_config()?;

    println!("Trust Simulation");
    println!("================");
    println!("Agents: {} ({})", config.num_agents, config.agent_kind);
    println!("Neighbourhood size: {}", config.neighbourhood_size);
    println!("Mobility rate: {}", config.mobility_rate);
    println!("Seed: {}", config.seed);
    println!();

    let mut model = Model::new(config)?;
    model.run(args.onset, args.record)?;

    println!("{}", model.series().summary());

    if let Some(path) = &args.output {
        write_report(path, &RunReport::from_model(&model))?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}
