//! Application layer: configuration and dependency injection.
//!
//! ```text
//!  config file ──► Config ──► Settings ──► App ──► TrainingLoop
//!                                           │
//!                                           └── QTableRepository (adapters)
//! ```
//!
//! # Usage
//!
//! ```
//! use tdrl::app::{AgentSettings, App, build_agent};
//! use tdrl::q_learning::{TdAlgorithm, TdParameters};
//!
//! let settings = AgentSettings::new(TdAlgorithm::Sarsa, TdParameters::new(0.5, 0.99, 0.1)?)
//!     .with_seed(42);
//! let agent = build_agent(&settings);
//! assert_eq!(agent.name(), "Sarsa");
//!
//! let app = App::new();
//! # Ok::<(), tdrl::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{
    AgentSettings, Config, EnvironmentSettings, FromConfig, MazeSettings, RunSettings, Settings,
};
pub use container::{App, AppBuilder, build_agent, build_environment};
