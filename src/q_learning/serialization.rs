//! Serialization support for trained Q-tables.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::q_table::QTable};

/// TD control rule that produced a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    QLearning,
    Sarsa,
}

impl TdAlgorithm {
    pub const NAMES: &'static str = "Q-learning, Sarsa";

    /// Name as written in configuration files
    pub fn label(&self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "Q-learning",
            TdAlgorithm::Sarsa => "Sarsa",
        }
    }
}

impl fmt::Display for TdAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TdAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Q-learning" => Ok(TdAlgorithm::QLearning),
            "Sarsa" => Ok(TdAlgorithm::Sarsa),
            _ => Err(Error::UnknownAgent {
                name: s.to_string(),
                expected: Self::NAMES.to_string(),
            }),
        }
    }
}

/// A trained table together with what produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    pub environment: String,
    pub q_table: QTable,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn new(algorithm: TdAlgorithm, environment: impl Into<String>, q_table: QTable) -> Self {
        Self {
            version: Self::VERSION,
            algorithm,
            environment: environment.into(),
            q_table,
        }
    }

    /// Unpack the table after checking format version and shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] or [`Error::QTableShape`] when the
    /// stored table cannot be used with an environment of the given size.
    pub fn into_q_table(self, state_size: usize, action_size: usize) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        if self.q_table.state_size() != state_size || self.q_table.action_size() != action_size {
            return Err(Error::QTableShape {
                stored_states: self.q_table.state_size(),
                stored_actions: self.q_table.action_size(),
                expected_states: state_size,
                expected_actions: action_size,
            });
        }

        Ok(self.q_table)
    }
}
