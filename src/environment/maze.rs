//! Grid maze navigation task
//!
//! The agent starts at `(1, 1)` and must reach `(height - 2, width - 2)`.
//! Entering a wall, or leaving the grid, ends the episode.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, Reward, State},
};

const WALL: char = '#';

/// Row/column position; signed so a move past the grid edge is representable
pub type Position = (isize, isize);

/// Rewards paid on entering each kind of cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MazeRewards {
    pub default_reward: Reward,
    pub goal_reward: Reward,
    pub wall_reward: Reward,
}

impl Default for MazeRewards {
    fn default() -> Self {
        Self {
            default_reward: -1.0,
            goal_reward: 100.0,
            wall_reward: -100.0,
        }
    }
}

/// The four moves, in action-index order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    fn delta(self) -> Position {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }
}

impl From<Move> for Action {
    fn from(mv: Move) -> Self {
        mv as Action
    }
}

/// Wall layout parsed from a character grid; `#` is wall, anything else floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    walls: Vec<Vec<bool>>,
    height: usize,
    width: usize,
}

impl MazeGrid {
    /// Parse a grid, one row per line.
    ///
    /// Trailing blank lines are ignored. Every row must have the same
    /// length and the grid must be at least 3x3 so the goal cell exists.
    pub fn parse(text: &str, context: &str) -> Result<Self> {
        let mut rows: Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        let invalid = |message: String| Error::InvalidMaze {
            context: context.to_string(),
            message,
        };

        let Some(first) = rows.first() else {
            return Err(invalid("maze has no rows".to_string()));
        };
        let width = first.chars().count();

        let mut walls = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let cells: Vec<bool> = row.chars().map(|c| c == WALL).collect();
            if cells.len() != width {
                return Err(invalid(format!(
                    "row {row_index} has {} cells, expected {width}",
                    cells.len()
                )));
            }
            walls.push(cells);
        }

        let height = walls.len();
        if height < 3 || width < 3 {
            return Err(invalid(format!(
                "{height}x{width} grid is too small (need at least 3x3)"
            )));
        }

        Ok(Self {
            walls,
            height,
            width,
        })
    }

    /// Read and parse a maze file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::io(format!("read maze file {}", path.display()), source))?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn contains(&self, pos: Position) -> bool {
        0 <= pos.0 && (pos.0 as usize) < self.height && 0 <= pos.1 && (pos.1 as usize) < self.width
    }

    /// Whether `pos` is blocked; everything outside the grid counts as wall
    pub fn is_wall(&self, pos: Position) -> bool {
        !self.contains(pos) || self.walls[pos.0 as usize][pos.1 as usize]
    }
}

/// Maze environment
#[derive(Debug, Clone)]
pub struct MazeEnvironment {
    grid: MazeGrid,
    rewards: MazeRewards,
    init_pos: Position,
    goal_pos: Position,
    pos: Position,
}

impl MazeEnvironment {
    pub fn new(grid: MazeGrid, rewards: MazeRewards) -> Self {
        let init_pos = (1, 1);
        let goal_pos = (grid.height as isize - 2, grid.width as isize - 2);
        Self {
            grid,
            rewards,
            init_pos,
            goal_pos,
            pos: init_pos,
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn goal(&self) -> Position {
        self.goal_pos
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Index shared by every position outside the grid
    fn outside_state(&self) -> State {
        self.grid.height * self.grid.width
    }

    fn is_goal(&self) -> bool {
        self.pos == self.goal_pos
    }

    fn is_wall(&self) -> bool {
        self.grid.is_wall(self.pos)
    }
}

impl Environment for MazeEnvironment {
    fn state_size(&self) -> usize {
        self.outside_state() + 1
    }

    fn action_size(&self) -> usize {
        Move::ALL.len()
    }

    fn state(&self) -> State {
        if self.grid.contains(self.pos) {
            self.pos.0 as usize * self.grid.width + self.pos.1 as usize
        } else {
            self.outside_state()
        }
    }

    fn reward(&self) -> Reward {
        if self.is_wall() {
            self.rewards.wall_reward
        } else if self.is_goal() {
            self.rewards.goal_reward
        } else {
            self.rewards.default_reward
        }
    }

    fn info(&self) -> String {
        format!("{},{}", self.pos.0, self.pos.1)
    }

    fn reset(&mut self) {
        self.pos = self.init_pos;
    }

    fn step(&mut self, action: Action) {
        let (dr, dc) = Move::ALL[action].delta();
        self.pos = (self.pos.0 + dr, self.pos.1 + dc);
    }

    fn is_finish(&self) -> bool {
        self.is_goal() || self.is_wall()
    }

    fn is_success(&self) -> bool {
        self.is_goal()
    }

    fn name(&self) -> &str {
        "Maze"
    }
}
