//! Environment port - the task an agent is trained against
//!
//! Every environment encodes its internal state into a single table row
//! index, so the training loop and agents only ever see integers.

use crate::types::{Action, Reward, State};

/// Environment trait shared by the cart-pole and maze tasks
///
/// # Event Sequence
///
/// The training loop calls `reset` once per episode, then alternates
/// `step` with reads of `state`, `reward`, `info` and `is_finish`.
pub trait Environment: Send {
    /// Number of distinct state indices; `state()` is always below this.
    fn state_size(&self) -> usize;

    /// Number of actions; valid actions are `0..action_size()`.
    fn action_size(&self) -> usize;

    /// Encoded index of the current state.
    fn state(&self) -> State;

    /// Reward of the current state.
    fn reward(&self) -> Reward;

    /// Human-readable snapshot of the raw state, recorded in the history log.
    fn info(&self) -> String;

    /// Restore the fixed initial state.
    fn reset(&mut self);

    /// Advance one step by applying `action`.
    ///
    /// # Panics
    ///
    /// Panics if `action >= action_size()`.
    fn step(&mut self, action: Action);

    /// Whether the current state is terminal (absorbing).
    fn is_finish(&self) -> bool;

    /// Whether the current state counts as a successful episode end.
    ///
    /// # Default Implementation
    ///
    /// Returns `false`, for tasks without a goal state.
    fn is_success(&self) -> bool {
        false
    }

    /// Get the environment's name.
    fn name(&self) -> &str;
}
