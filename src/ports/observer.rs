//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to specific output formats or metrics.

use crate::{
    Result,
    pipeline::{EpisodeSummary, TrainingResult},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(max_episode)` - Once at the beginning
/// 2. `on_episode_end(summary)` - After every training episode
/// 3. `on_training_end(result)` - Once training stops (horizon or success streak)
/// 4. `on_evaluation_end(summary)` - After the frozen greedy episode
///
/// # Examples
///
/// ```no_run
/// use tdrl::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> tdrl::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts with the configured episode budget.
    fn on_training_start(&mut self, _max_episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each training episode.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when the training phase completes.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }

    /// Called after the evaluation episode.
    fn on_evaluation_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }
}
