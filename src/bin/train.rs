//! Trains a network on the XOR function and prints what it learned.
//!
//! Usage: cargo run --bin train -- --topology 2,4,1 --epochs 10000

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use mlpnet::config::parse_topology;
use mlpnet::{pattern, Activator, Logging, Network, Trainer};

#[derive(Parser, Debug)]
#[command(name = "train")]
#[command(about = "Train a multilayer perceptron on XOR")]
struct Args {
    /// Comma separated layer widths
    #[arg(short, long, default_value = "2,4,1")]
    topology: String,

    /// Gradient descent step size
    #[arg(short, long, default_value = "0.5")]
    learning_rate: f64,

    /// Passes over the training patterns
    #[arg(short, long, default_value = "10000")]
    epochs: usize,

    /// Seed for the initial weights
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log the training error every this many epochs (0 for a summary only)
    #[arg(long, default_value = "1000")]
    log_every: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let topology = parse_topology(&args.topology).map_err(|e| anyhow!(e))?;
    let mut network = match args.seed {
        Some(seed) => Network::with_seed(&topology, args.learning_rate, Activator::Sigmoid, seed)?,
        None => Network::new(&topology, args.learning_rate, Activator::Sigmoid)?,
    };

    let logging = if args.log_every > 0 {
        Logging::Iterations(args.log_every)
    } else {
        Logging::Completion
    };
    let patterns = pattern::xor();
    Trainer::new()
        .epochs(args.epochs)
        .logging(logging)
        .train(&mut network, &patterns)?;

    println!();
    for p in &patterns {
        let output = network.execute(p)?;
        println!(
            "Input: {:?}, Expected: {:?}, Output: {:?}",
            p.features, p.targets, output
        );
    }
    Ok(())
}
