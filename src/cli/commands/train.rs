//! Train command - train an agent from a configuration file

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::{App, Settings},
    cli::output::{format_count, format_return, print_kv, print_section},
    pipeline::{
        EpisodeSummary, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
        TrainingResult,
    },
    ports::Observer,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metrics: MetricsSummary,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    config: String,
    agent: String,
    environment: String,
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    seed: Option<u64>,
    max_episode: usize,
    max_step: usize,
}

impl SummaryMetadata {
    fn new(config: &Path, settings: &Settings) -> Self {
        let params = settings.agent.parameters;
        Self {
            config: config.display().to_string(),
            agent: settings.agent.algorithm.to_string(),
            environment: settings.environment.kind().to_string(),
            alpha: params.alpha,
            gamma: params.gamma,
            epsilon: params.epsilon,
            seed: settings.agent.seed,
            max_episode: settings.run.training.max_episode,
            max_step: settings.run.training.max_step,
        }
    }
}

pub(crate) fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Shares a metrics observer with the loop so it can be read after the run
struct SharedMetrics {
    inner: Arc<Mutex<MetricsObserver>>,
}

impl Observer for SharedMetrics {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> crate::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_episode_end(summary)
    }

    fn on_evaluation_end(&mut self, summary: &EpisodeSummary) -> crate::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_evaluation_end(summary)
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train an agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Path to the KEY=VALUE configuration file
    pub config: PathBuf,

    /// Random seed for reproducibility (overrides AGENT_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show a progress bar (default)
    #[arg(long, overrides_with = "no_progress")]
    pub progress: bool,

    /// Hide the progress bar
    #[arg(long = "no-progress", overrides_with = "progress")]
    pub no_progress: bool,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl TrainArgs {
    /// The bar is on unless `--no-progress` was the last of the pair given
    pub fn show_progress(&self) -> bool {
        self.progress || !self.no_progress
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        settings.agent.seed = Some(seed);
    }

    print_section("Training");
    print_kv("Agent", settings.agent.algorithm.label());
    print_kv("Environment", settings.environment.kind().label());
    print_kv("Episodes", &format_count(settings.run.training.max_episode));
    print_kv("Max steps", &format_count(settings.run.training.max_step));
    if let Some(seed) = settings.agent.seed {
        print_kv("Seed", &seed.to_string());
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(SharedMetrics {
        inner: Arc::clone(&metrics),
    })];
    if args.show_progress() {
        observers.push(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create observations file {}", path.display()))?;
        observers.push(Box::new(observer));
    }

    let app = App::new();
    let result = app
        .run(&settings, observers)
        .context("training run failed")?;
    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    print_section("Results");
    print_kv("Episodes run", &format_count(result.episodes));
    if result.completed_early {
        print_kv("Stopped early", "success streak reached");
    }
    print_kv(
        "Successes",
        &format!(
            "{} ({:.1}%)",
            result.successes,
            metrics.success_rate * 100.0
        ),
    );
    print_kv("Mean return", &format_return(result.mean_return));
    print_kv("Best return", &format_return(result.best_return));
    print_kv("Final return", &format_return(result.final_return));
    print_kv(
        "Mean length",
        &format!("{:.1} steps", metrics.avg_episode_length),
    );
    if let Some(value) = result.evaluation_return {
        print_kv("Evaluation return", &format_return(value));
    }

    println!("\nReturns written to {}", settings.run.returns_path.display());
    println!(
        "Evaluation history written to {}",
        settings.run.test_history_path.display()
    );
    if let Some(path) = &settings.run.q_table_path {
        println!("Q-table saved to {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!(
                "\nNormalizing summary path to {}",
                summary_path.display()
            );
        }
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: &result,
            metrics,
            metadata: SummaryMetadata::new(&args.config, &settings),
        };
        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
