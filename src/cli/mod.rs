//! CLI infrastructure for the tdrl toolkit
//!
//! Commands for training an agent from a configuration file and for
//! evaluating a previously saved Q-table.

pub mod commands;
pub mod output;
