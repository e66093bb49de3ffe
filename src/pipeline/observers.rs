//! Observer implementations for training runs
//!
//! Observers collect data during training without coupling the loop to
//! specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::{EpisodeSummary, TrainingResult};
use crate::{
    Result,
    analysis::{ReturnStats, moving_average},
    ports::Observer,
};

/// Progress bar observer - shows episodes done and the running success count
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
        }
    }

    fn message(&self, last_return: f64) -> String {
        format!("return {last_return:.3}, successes {}", self.successes)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, max_episode: usize) -> Result<()> {
        let pb = ProgressBar::new(max_episode as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if summary.success {
            self.successes += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message(summary.total_reward));
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message(result.final_return));
        }
        Ok(())
    }
}

/// Metrics observer - accumulates episode statistics in memory
#[derive(Debug, Default)]
pub struct MetricsObserver {
    returns: Vec<f64>,
    successes: usize,
    total_steps: usize,
    evaluation: Option<EpisodeSummary>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Fraction of training episodes that ended in success
    pub fn success_rate(&self) -> f64 {
        if self.returns.is_empty() {
            0.0
        } else {
            self.successes as f64 / self.returns.len() as f64
        }
    }

    pub fn avg_episode_length(&self) -> f64 {
        if self.returns.is_empty() {
            0.0
        } else {
            self.total_steps as f64 / self.returns.len() as f64
        }
    }

    /// Trailing average of the last `window` returns
    pub fn recent_mean(&self, window: usize) -> f64 {
        moving_average(&self.returns, window)
            .last()
            .copied()
            .unwrap_or(0.0)
    }

    pub fn summary(&self) -> MetricsSummary {
        let stats = ReturnStats::from_returns(&self.returns);
        MetricsSummary {
            episodes: stats.count,
            successes: self.successes,
            success_rate: self.success_rate(),
            mean_return: stats.mean,
            best_return: stats.max,
            last_return: self.returns.last().copied(),
            avg_episode_length: self.avg_episode_length(),
            evaluation_return: self.evaluation.map(|summary| summary.total_reward),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_return: f64,
    pub best_return: f64,
    pub last_return: Option<f64>,
    pub avg_episode_length: f64,
    pub evaluation_return: Option<f64>,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.returns.push(summary.total_reward);
        self.total_steps += summary.steps;
        if summary.success {
            self.successes += 1;
        }
        Ok(())
    }

    fn on_evaluation_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.evaluation = Some(*summary);
        Ok(())
    }
}

/// Phase an episode line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Train,
    Evaluate,
}

/// One line of the JSONL episode log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub phase: Phase,
    #[serde(flatten)]
    pub summary: EpisodeSummary,
}

/// JSONL observer - writes one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write(&mut self, phase: Phase, summary: &EpisodeSummary) -> Result<()> {
        let observation = Observation {
            phase,
            summary: *summary,
        };
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.write(Phase::Train, summary)
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_evaluation_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.write(Phase::Evaluate, summary)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(episode: usize, total_reward: f64, steps: usize, success: bool) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            total_reward,
            steps,
            success,
        }
    }

    #[test]
    fn test_metrics_observer_accumulates() {
        let mut metrics = MetricsObserver::new();
        metrics.on_episode_end(&summary(0, -101.0, 1, false)).unwrap();
        metrics.on_episode_end(&summary(1, 97.0, 3, true)).unwrap();
        metrics.on_evaluation_end(&summary(2, 98.0, 2, true)).unwrap();

        let result = metrics.summary();
        assert_eq!(result.episodes, 2);
        assert_eq!(result.successes, 1);
        assert_eq!(result.success_rate, 0.5);
        assert_eq!(result.mean_return, -2.0);
        assert_eq!(result.best_return, 97.0);
        assert_eq!(result.last_return, Some(97.0));
        assert_eq!(result.avg_episode_length, 2.0);
        assert_eq!(metrics.recent_mean(1), 97.0);
        assert_eq!(result.evaluation_return, Some(98.0));
    }

    #[test]
    fn test_empty_metrics_are_zero() {
        let result = MetricsObserver::new().summary();
        assert_eq!(result.success_rate, 0.0);
        assert_eq!(result.mean_return, 0.0);
        assert_eq!(result.last_return, None);
        assert_eq!(result.evaluation_return, None);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap();
        observer.on_episode_end(&summary(0, -3.5, 4, false)).unwrap();
        observer.on_episode_end(&summary(1, 12.0, 2, true)).unwrap();
        observer.on_evaluation_end(&summary(2, 12.0, 2, true)).unwrap();
        drop(observer);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Observation> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].phase, Phase::Train);
        assert_eq!(lines[0].summary.total_reward, -3.5);
        assert_eq!(lines[2].phase, Phase::Evaluate);
        assert!(text.lines().next().unwrap().contains("\"return\":-3.5"));
    }
}
