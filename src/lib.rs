//! Tabular temporal-difference control
//!
//! This crate provides:
//! - Dense Q-table with absorbing-row support
//! - Q-learning and SARSA agents with epsilon-greedy selection
//! - Cart-pole swing-up environment with Runge-Kutta physics and bucketed state
//! - Grid maze environment loaded from a text file
//! - Episode/step training loop with a frozen greedy evaluation episode
//! - `KEY=VALUE` run configuration, Q-table persistence and run logs
//!
//! # Example
//!
//! ```
//! use tdrl::{
//!     environment::{MazeEnvironment, MazeGrid, MazeRewards},
//!     pipeline::{TrainingLoop, TrainingSettings},
//!     q_learning::QLearningAgent,
//! };
//!
//! let grid = MazeGrid::parse("#####\n#   #\n#####\n", "corridor")?;
//! let env = MazeEnvironment::new(grid, MazeRewards::default());
//! let agent = QLearningAgent::new(0.5, 0.9, 0.1)?.with_seed(3);
//!
//! let mut training =
//!     TrainingLoop::new(TrainingSettings::new(50, 20), Box::new(agent), Box::new(env), 0.0);
//! let result = training.train()?;
//! assert_eq!(result.episodes, 50);
//!
//! let evaluation = training.evaluate()?;
//! assert!(evaluation.steps <= 20);
//! # Ok::<(), tdrl::Error>(())
//! ```

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod environment;
pub mod error;
pub mod export;
pub mod history;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use history::{History, StepRecord};
pub use types::{Action, Bounds, QValue, Reward, State};
