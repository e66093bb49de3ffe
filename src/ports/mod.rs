//! Ports (trait boundaries) between the training core and its collaborators.
//!
//! Agents and environments are swapped through these traits; persistence and
//! observation are kept behind them so the training loop never touches files.

pub mod agent;
pub mod environment;
pub mod observer;
pub mod repository;

pub use agent::Agent;
pub use environment::Environment;
pub use observer::Observer;
pub use repository::QTableRepository;
