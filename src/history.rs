//! Per-episode trajectory record
//!
//! Each record pairs the action about to be taken with the reward observed
//! after the previous action. The first record therefore carries the reward
//! of the initial state, before any step has been taken.

use serde::{Deserialize, Serialize};

use crate::types::{Action, Reward, State};

/// One recorded step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub action: Action,
    pub reward: Reward,
    pub state: State,
    pub info: String,
}

/// Append-only trajectory of one episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: Vec<StepRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action, reward: Reward, state: State, info: String) {
        self.records.push(StepRecord {
            action,
            reward,
            state,
            info,
        });
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of environment steps taken (the first record precedes any step)
    pub fn steps(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    pub fn rewards(&self) -> impl Iterator<Item = Reward> + '_ {
        self.records.iter().map(|record| record.reward)
    }

    /// Sum of every recorded reward, including the initial-state reward
    pub fn total_reward(&self) -> Reward {
        self.rewards().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_reward_includes_first_record() {
        let mut history = History::new();
        history.push(1, -1.0, 6, "1,1".to_string());
        history.push(1, -1.0, 7, "1,2".to_string());
        history.push(3, 10.0, 8, "1,3".to_string());

        assert_eq!(history.len(), 3);
        assert_eq!(history.steps(), 2);
        assert_eq!(history.total_reward(), 8.0);
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.steps(), 0);
        assert_eq!(history.total_reward(), 0.0);
    }
}
