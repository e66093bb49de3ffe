//! tdrl CLI - tabular TD control on cart-pole and maze tasks
//!
//! - `train`: learn a Q-table from a configuration file, then evaluate it
//! - `evaluate`: run a saved Q-table greedily for one episode

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tdrl")]
#[command(version, about = "Tabular TD control for cart-pole and maze tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent and evaluate the learned greedy policy
    Train(tdrl::cli::commands::train::TrainArgs),

    /// Evaluate a saved Q-table
    Evaluate(tdrl::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tdrl::cli::commands::train::execute(args),
        Commands::Evaluate(args) => tdrl::cli::commands::evaluate::execute(args),
    }
}
