//! Training environments
//!
//! - `Cartpole`: continuous swing-up physics, discretised per dimension
//! - `Maze`: discrete grid walk from the top-left corner to the bottom-right

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

pub mod cartpole;
pub mod discretize;
pub mod maze;

pub use cartpole::{CartpoleEnvironment, CartpoleSettings, CartpoleState};
pub use discretize::{Dimension, digitize};
pub use maze::{MazeEnvironment, MazeGrid, MazeRewards, Move};

/// Environment variant selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentKind {
    Cartpole,
    Maze,
}

impl EnvironmentKind {
    pub const NAMES: &'static str = "Cartpole, Maze";

    pub fn label(&self) -> &'static str {
        match self {
            EnvironmentKind::Cartpole => "Cartpole",
            EnvironmentKind::Maze => "Maze",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EnvironmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cartpole" => Ok(EnvironmentKind::Cartpole),
            "Maze" => Ok(EnvironmentKind::Maze),
            _ => Err(Error::UnknownEnvironment {
                name: s.to_string(),
                expected: Self::NAMES.to_string(),
            }),
        }
    }
}
