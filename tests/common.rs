//! Shared fixtures for the integration test suite.
//!
//! Each helper writes a maze or configuration file into a temporary
//! directory and returns its path.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

/// 4x4 maze: start (1,1), goal (2,2), two-step paths via (1,2) or (2,1)
pub const SQUARE_MAZE: &str = "\
####
#  #
#  #
####
";

/// Literal 5x5 maze with a wall directly above the start
pub const FIVE_BY_FIVE: &str = "\
#####
#   #
# # #
#   #
#####
";

pub fn write_maze(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("maze.txt");
    fs::write(&path, text).unwrap();
    path
}

/// Maze run configuration with outputs under `dir`; `extra` is appended verbatim
pub fn write_maze_config(dir: &Path, agent: &str, params: &RunParams, extra: &str) -> PathBuf {
    let maze = write_maze(dir, params.maze);
    let text = format!(
        "AGENT_NAME={agent}
AGENT_ALPHA={alpha}
AGENT_GAMMA={gamma}
AGENT_EPSILON={epsilon}
AGENT_SEED={seed}
ENV_NAME=Maze
ENVIRONMENT_MAZE_PATH={maze}
ENVIRONMENT_DEFAULT_REWARD=-1
ENVIRONMENT_GOAL_REWARD=100
ENVIRONMENT_WALL_REWARD=-100
QTABLE_INITIAL_QVALUE={init}
RL_MAX_EPISODE={episodes}
RL_MAX_STEP={steps}
RL_RETURNS_PATH={returns}
RL_TEST_HISTORY_PATH={history}
{extra}",
        alpha = params.alpha,
        gamma = params.gamma,
        epsilon = params.epsilon,
        seed = params.seed,
        maze = maze.display(),
        init = params.init_qvalue,
        episodes = params.episodes,
        steps = params.steps,
        returns = dir.join("returns.log").display(),
        history = dir.join("history.log").display(),
    );
    let path = dir.join("run.conf");
    fs::write(&path, text).unwrap();
    path
}

/// Cart-pole run configuration with the standard discretisation
pub fn write_cartpole_config(dir: &Path, episodes: usize, steps: usize) -> PathBuf {
    let text = format!(
        "AGENT_NAME=Q-learning
AGENT_ALPHA=0.5
AGENT_GAMMA=0.99
AGENT_EPSILON=0.1
AGENT_SEED=11
ENV_NAME=Cartpole
ENVIRONMENT_ACTION_LEFT=-10
ENVIRONMENT_ACTION_RIGHT=10
ENVIRONMENT_X_LEFT=-2
ENVIRONMENT_X_RIGHT=2
ENVIRONMENT_X_SIZE=4
ENVIRONMENT_THETA_LEFT=-3.141592653589793
ENVIRONMENT_THETA_RIGHT=3.141592653589793
ENVIRONMENT_THETA_SIZE=40
ENVIRONMENT_XDOT_LEFT=-2
ENVIRONMENT_XDOT_RIGHT=2
ENVIRONMENT_XDOT_SIZE=10
ENVIRONMENT_THETADOT_LEFT=-10
ENVIRONMENT_THETADOT_RIGHT=10
ENVIRONMENT_THETADOT_SIZE=50
ENVIRONMENT_GRAVITY=9.80665
ENVIRONMENT_CART_MASS=1.0
ENVIRONMENT_POLE_MASS=0.1
ENVIRONMENT_POLE_LENGTH=0.5
ENVIRONMENT_FRAME_PER_SECOND=50
QTABLE_INITIAL_QVALUE=0
QTABLE_PATH={q_table}
RL_MAX_EPISODE={episodes}
RL_MAX_STEP={steps}
RL_RETURNS_PATH={returns}
RL_TEST_HISTORY_PATH={history}
",
        q_table = dir.join("cartpole.qtable").display(),
        returns = dir.join("returns.log").display(),
        history = dir.join("history.log").display(),
    );
    let path = dir.join("cartpole.conf");
    fs::write(&path, text).unwrap();
    path
}

/// Knobs for [`write_maze_config`]
pub struct RunParams {
    pub maze: &'static str,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub seed: u64,
    pub init_qvalue: f64,
    pub episodes: usize,
    pub steps: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            maze: SQUARE_MAZE,
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.0,
            seed: 7,
            init_qvalue: 0.0,
            episodes: 1,
            steps: 3,
        }
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
