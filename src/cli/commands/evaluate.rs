//! Evaluate command - run a saved Q-table greedily for one episode

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{App, Settings},
    cli::output::{format_count, format_return, print_kv, print_section},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained Q-table")]
pub struct EvaluateArgs {
    /// Path to the KEY=VALUE configuration file
    pub config: PathBuf,

    /// Path to the saved Q-table
    #[arg(long)]
    pub q_table: PathBuf,

    /// Where to write the history log (defaults to RL_TEST_HISTORY_PATH)
    #[arg(long)]
    pub history: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let settings = Settings::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let history_path = args
        .history
        .unwrap_or_else(|| settings.run.test_history_path.clone());

    println!("Loading Q-table from: {}", args.q_table.display());
    let summary = App::new()
        .evaluate(&settings, &args.q_table, &history_path)
        .with_context(|| format!("failed to evaluate {}", args.q_table.display()))?;

    print_section("Evaluation");
    print_kv("Environment", settings.environment.kind().label());
    print_kv("Steps", &format_count(summary.steps));
    print_kv("Success", if summary.success { "yes" } else { "no" });
    print_kv("Return", &format_return(summary.total_reward));
    println!("\nHistory written to {}", history_path.display());

    Ok(())
}
