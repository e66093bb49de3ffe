//! Training and evaluation pipeline
//!
//! This module provides:
//! - The episode/step training loop with absorbing terminal handling
//! - Frozen greedy evaluation
//! - Observers recording progress during training

pub mod observers;
pub mod training;

pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, Observation, Phase, ProgressObserver,
};
pub use training::{EpisodeSummary, TrainingLoop, TrainingResult, TrainingSettings};

pub use crate::ports::Observer;
