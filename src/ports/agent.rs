//! Agent port - abstraction over tabular TD control rules
//!
//! An agent never owns the Q-table. The training loop lends it the table for
//! each call, so there is exactly one mutable owner for the whole run.

use crate::{
    q_learning::QTable,
    types::{Action, Reward, State},
};

/// Agent trait - epsilon-greedy action selection plus a TD update rule
///
/// # Examples
///
/// ```
/// use tdrl::{ports::Agent, q_learning::{QLearningAgent, QTable}};
///
/// let mut agent = QLearningAgent::new(0.5, 0.9, 0.0).unwrap().with_seed(1);
/// let mut table = QTable::new(4, 2, 0.0);
/// table.set(1, 1, 3.0);
///
/// assert_eq!(agent.action(&table, 1), 1);
/// agent.learn(&mut table, 0, 0, 1.0, 1, 1);
/// assert_eq!(table.get(0, 0), 0.5 * (1.0 + 0.9 * 3.0));
/// ```
pub trait Agent: Send {
    /// Select an action for `state`.
    ///
    /// With probability epsilon a uniformly random action is returned,
    /// otherwise the greedy action with ties broken toward the lowest index.
    fn action(&mut self, q_table: &QTable, state: State) -> Action;

    /// Apply one TD update to `Q[s1, a1]` in place.
    ///
    /// `a2` is the action already selected for `s2`. Off-policy rules may
    /// ignore it.
    fn learn(
        &self,
        q_table: &mut QTable,
        s1: State,
        a1: Action,
        reward: Reward,
        s2: State,
        a2: Action,
    );

    /// Freeze the agent: alpha and epsilon become zero, so actions are greedy
    /// and `learn` leaves the table unchanged.
    fn fix(&mut self);

    /// Get the agent's name.
    fn name(&self) -> &str;

    /// Re-seed the exploration stream.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for agents without randomness.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
