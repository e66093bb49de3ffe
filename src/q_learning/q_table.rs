//! Dense Q-table for temporal difference learning

use serde::{Deserialize, Serialize};

use crate::types::{Action, QValue, State};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Stored as one contiguous row-major buffer of `state_size * action_size`
/// values. The shape is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    state_size: usize,
    action_size: usize,
    /// Value every cell started from (optimistic initialisation when large)
    init_qvalue: QValue,
    values: Vec<QValue>,
}

impl QTable {
    /// Create a Q-table with every cell set to `init_qvalue`
    pub fn new(state_size: usize, action_size: usize, init_qvalue: QValue) -> Self {
        Self {
            state_size,
            action_size,
            init_qvalue,
            values: vec![init_qvalue; state_size * action_size],
        }
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    pub fn init_qvalue(&self) -> QValue {
        self.init_qvalue
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: State, action: Action) -> QValue {
        self.values[self.offset(state, action)]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: State, action: Action, value: QValue) {
        let offset = self.offset(state, action);
        self.values[offset] = value;
    }

    /// All action values of one state
    pub fn row(&self, state: State) -> &[QValue] {
        let start = self.row_start(state);
        &self.values[start..start + self.action_size]
    }

    /// Maximum Q-value in a state; NaN entries are skipped
    pub fn max_q(&self, state: State) -> QValue {
        self.row(state)
            .iter()
            .fold(f64::NEG_INFINITY, |best, &value| best.max(value))
    }

    /// Select greedy action (highest Q-value), ties going to the lowest index
    pub fn greedy_action(&self, state: State) -> Action {
        argmax(self.row(state))
    }

    /// Make `state` absorbing: every action value becomes 0.0
    pub fn zero_row(&mut self, state: State) {
        let start = self.row_start(state);
        let end = start + self.action_size;
        self.values[start..end].fill(0.0);
    }

    /// Total number of stored Q-values
    pub fn size(&self) -> usize {
        self.values.len()
    }

    fn row_start(&self, state: State) -> usize {
        assert!(
            state < self.state_size,
            "state index {state} out of range (state_size = {})",
            self.state_size
        );
        state * self.action_size
    }

    fn offset(&self, state: State, action: Action) -> usize {
        assert!(
            action < self.action_size,
            "action index {action} out of range (action_size = {})",
            self.action_size
        );
        self.row_start(state) + action
    }
}

/// Index of the first maximal element; replaces the best only on strictly greater values
pub fn argmax(values: &[QValue]) -> Action {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = index;
        }
    }
    best
}
