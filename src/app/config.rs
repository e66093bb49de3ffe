//! Run configuration: a flat `KEY=VALUE` file and the typed settings built from it.
//!
//! ```text
//! AGENT_NAME=Sarsa
//! AGENT_ALPHA=0.5
//! AGENT_GAMMA=0.99
//! AGENT_EPSILON=0.1
//! ENV_NAME=Maze
//! ENVIRONMENT_MAZE_PATH=maze.txt
//! ...
//! ```

use std::{
    any::type_name,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    Error, Result,
    environment::{CartpoleSettings, Dimension, EnvironmentKind, MazeRewards},
    pipeline::TrainingSettings,
    q_learning::{TdAlgorithm, TdParameters},
    types::Bounds,
};

/// Immutable string-to-string map loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    entries: HashMap<String, String>,
}

impl Config {
    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::io(format!("read config {}", path.display()), source))?;
        Self::parse_str(&text)
    }

    /// Parse configuration text.
    ///
    /// Every line must split into exactly one key and one value on `=`;
    /// anything else, blank lines included, is rejected. Keys and values are
    /// taken verbatim. A repeated key keeps its last value.
    pub fn parse_str(text: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let mut parts = line.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(Error::ConfigParse {
                    line_number: index + 1,
                    line: line.to_string(),
                });
            };

            entries.insert(key.to_string(), value.to_string());
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value of a required key
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingConfigKey {
                key: key.to_string(),
            })
    }

    /// Parse a required key
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?;
        parse_value(key, value)
    }

    /// Parse an optional key; absent keys yield `None`, malformed ones an error
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.entries
            .get(key)
            .map(|value| parse_value(key, value))
            .transpose()
    }

    /// Parse an optional key, falling back to `default` when absent
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: type_name::<T>().to_string(),
    })
}

/// Settings that can be read from a [`Config`]
pub trait FromConfig: Sized {
    fn from_config(config: &Config) -> Result<Self>;
}

/// Which TD rule to train with, and its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSettings {
    pub algorithm: TdAlgorithm,
    pub parameters: TdParameters,
    /// Seed for the exploration stream; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl AgentSettings {
    pub fn new(algorithm: TdAlgorithm, parameters: TdParameters) -> Self {
        Self {
            algorithm,
            parameters,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl FromConfig for AgentSettings {
    fn from_config(config: &Config) -> Result<Self> {
        let algorithm = config.get("AGENT_NAME")?.parse::<TdAlgorithm>()?;
        let parameters = TdParameters::new(
            config.parse("AGENT_ALPHA")?,
            config.parse("AGENT_GAMMA")?,
            config.parse("AGENT_EPSILON")?,
        )?;
        Ok(Self {
            algorithm,
            parameters,
            seed: config.parse_opt("AGENT_SEED")?,
        })
    }
}

/// Maze file location and rewards
#[derive(Debug, Clone, PartialEq)]
pub struct MazeSettings {
    pub path: PathBuf,
    pub rewards: MazeRewards,
}

impl MazeSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rewards: MazeRewards::default(),
        }
    }

    pub fn with_rewards(mut self, rewards: MazeRewards) -> Self {
        self.rewards = rewards;
        self
    }
}

impl FromConfig for MazeSettings {
    fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            path: config.parse("ENVIRONMENT_MAZE_PATH")?,
            rewards: MazeRewards {
                default_reward: config.parse("ENVIRONMENT_DEFAULT_REWARD")?,
                goal_reward: config.parse("ENVIRONMENT_GOAL_REWARD")?,
                wall_reward: config.parse("ENVIRONMENT_WALL_REWARD")?,
            },
        })
    }
}

fn dimension(config: &Config, name: &str) -> Result<Dimension> {
    let bounds = Bounds::new(
        config.parse(&format!("ENVIRONMENT_{name}_LEFT"))?,
        config.parse(&format!("ENVIRONMENT_{name}_RIGHT"))?,
    )?;
    Dimension::new(bounds, config.parse(&format!("ENVIRONMENT_{name}_SIZE"))?)
}

impl FromConfig for CartpoleSettings {
    fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            forces: [
                config.parse("ENVIRONMENT_ACTION_LEFT")?,
                config.parse("ENVIRONMENT_ACTION_RIGHT")?,
            ],
            x: dimension(config, "X")?,
            theta: dimension(config, "THETA")?,
            xdot: dimension(config, "XDOT")?,
            thetadot: dimension(config, "THETADOT")?,
            gravity: config.parse("ENVIRONMENT_GRAVITY")?,
            cart_mass: config.parse("ENVIRONMENT_CART_MASS")?,
            pole_mass: config.parse("ENVIRONMENT_POLE_MASS")?,
            pole_length: config.parse("ENVIRONMENT_POLE_LENGTH")?,
            fps: config.parse("ENVIRONMENT_FRAME_PER_SECOND")?,
        })
    }
}

/// Environment variant together with its settings
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentSettings {
    Cartpole(CartpoleSettings),
    Maze(MazeSettings),
}

impl EnvironmentSettings {
    pub fn kind(&self) -> EnvironmentKind {
        match self {
            EnvironmentSettings::Cartpole(_) => EnvironmentKind::Cartpole,
            EnvironmentSettings::Maze(_) => EnvironmentKind::Maze,
        }
    }
}

impl FromConfig for EnvironmentSettings {
    fn from_config(config: &Config) -> Result<Self> {
        match config.get("ENV_NAME")?.parse::<EnvironmentKind>()? {
            EnvironmentKind::Cartpole => {
                Ok(EnvironmentSettings::Cartpole(CartpoleSettings::from_config(config)?))
            }
            EnvironmentKind::Maze => Ok(EnvironmentSettings::Maze(MazeSettings::from_config(config)?)),
        }
    }
}

impl FromConfig for TrainingSettings {
    fn from_config(config: &Config) -> Result<Self> {
        Ok(TrainingSettings::new(
            config.parse("RL_MAX_EPISODE")?,
            config.parse("RL_MAX_STEP")?,
        )
        .with_success_streak(config.get_or("RL_MAX_SUCCEEDED_EPISODE", 0)?))
    }
}

/// Episode budget, Q-table initialisation and output locations
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub training: TrainingSettings,
    pub init_qvalue: f64,
    pub returns_path: PathBuf,
    pub test_history_path: PathBuf,
    /// Where the trained table is persisted; nothing is saved when absent
    pub q_table_path: Option<PathBuf>,
}

impl FromConfig for RunSettings {
    fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            training: TrainingSettings::from_config(config)?,
            init_qvalue: config.parse("QTABLE_INITIAL_QVALUE")?,
            returns_path: config.parse("RL_RETURNS_PATH")?,
            test_history_path: config.parse("RL_TEST_HISTORY_PATH")?,
            q_table_path: config.parse_opt("QTABLE_PATH")?,
        })
    }
}

/// Everything needed to build and run one training session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub agent: AgentSettings,
    pub environment: EnvironmentSettings,
    pub run: RunSettings,
}

impl Settings {
    /// Load a configuration file and build typed settings from it
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_config(&Config::load(path)?)
    }
}

impl FromConfig for Settings {
    fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            agent: AgentSettings::from_config(config)?,
            environment: EnvironmentSettings::from_config(config)?,
            run: RunSettings::from_config(config)?,
        })
    }
}
