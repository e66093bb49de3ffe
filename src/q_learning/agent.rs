//! Q-learning and SARSA agents
//!
//! Both agents select actions epsilon-greedily from a borrowed [`QTable`] and
//! share the TD form `Q[s1,a1] += alpha * (target - Q[s1,a1])`. They differ
//! only in how `target` bootstraps from the successor state.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::Result,
    ports::Agent,
    q_learning::q_table::QTable,
    types::{Action, Reward, State, unit_interval},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Step size, discount and exploration rate of a TD agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdParameters {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration probability ε
    pub epsilon: f64,
}

impl TdParameters {
    /// Validate that every parameter lies in `[0, 1]`
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        Ok(Self {
            alpha: unit_interval("alpha", alpha)?,
            gamma: unit_interval("gamma", gamma)?,
            epsilon: unit_interval("epsilon", epsilon)?,
        })
    }

    fn freeze(&mut self) {
        self.alpha = 0.0;
        self.epsilon = 0.0;
    }
}

/// ε-greedy action selection shared by both agents
fn select_action_epsilon_greedy(
    rng: &mut StdRng,
    epsilon: f64,
    q_table: &QTable,
    state: State,
) -> Action {
    if rng.random::<f64>() < epsilon {
        // Explore: random action
        rng.random_range(0..q_table.action_size())
    } else {
        // Exploit: greedy action based on Q-values
        q_table.greedy_action(state)
    }
}

fn td_update(q_table: &mut QTable, alpha: f64, s1: State, a1: Action, target: f64) {
    let current_q = q_table.get(s1, a1);
    let td_error = target - current_q;
    q_table.set(s1, a1, current_q + alpha * td_error);
}

/// Q-learning agent (off-policy TD control)
///
/// Updates toward the maximum next-state value, regardless of the action
/// actually selected for the next step.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    params: TdParameters,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `alpha` - step size (0.0 to 1.0)
    /// * `gamma` - discount factor (0.0 to 1.0)
    /// * `epsilon` - exploration probability (0.0 to 1.0)
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        Ok(Self::from_parameters(TdParameters::new(alpha, gamma, epsilon)?))
    }

    pub fn from_parameters(params: TdParameters) -> Self {
        Self {
            params,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn parameters(&self) -> TdParameters {
        self.params
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl Agent for QLearningAgent {
    fn action(&mut self, q_table: &QTable, state: State) -> Action {
        select_action_epsilon_greedy(&mut self.rng, self.params.epsilon, q_table, state)
    }

    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    fn learn(
        &self,
        q_table: &mut QTable,
        s1: State,
        a1: Action,
        reward: Reward,
        s2: State,
        _a2: Action,
    ) {
        let td_target = reward + self.params.gamma * q_table.max_q(s2);
        td_update(q_table, self.params.alpha, s1, a1, td_target);
    }

    fn fix(&mut self) {
        self.params.freeze();
    }

    fn name(&self) -> &str {
        "Q-learning"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }
}

/// SARSA agent (on-policy TD control)
///
/// Updates toward the value of the action actually selected for the next
/// step, so exploration is reflected in the learned values.
#[derive(Debug, Clone)]
pub struct SarsaAgent {
    params: TdParameters,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl SarsaAgent {
    /// Create a new SARSA agent
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        Ok(Self::from_parameters(TdParameters::new(alpha, gamma, epsilon)?))
    }

    pub fn from_parameters(params: TdParameters) -> Self {
        Self {
            params,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn parameters(&self) -> TdParameters {
        self.params
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl Agent for SarsaAgent {
    fn action(&mut self, q_table: &QTable, state: State) -> Action {
        select_action_epsilon_greedy(&mut self.rng, self.params.epsilon, q_table, state)
    }

    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    fn learn(
        &self,
        q_table: &mut QTable,
        s1: State,
        a1: Action,
        reward: Reward,
        s2: State,
        a2: Action,
    ) {
        let td_target = reward + self.params.gamma * q_table.get(s2, a2);
        td_update(q_table, self.params.alpha, s1, a1, td_target);
    }

    fn fix(&mut self) {
        self.params.freeze();
    }

    fn name(&self) -> &str {
        "Sarsa"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_next_row(next: &[f64]) -> QTable {
        let mut table = QTable::new(2, next.len(), 0.0);
        for (action, &value) in next.iter().enumerate() {
            table.set(1, action, value);
        }
        table
    }

    #[test]
    fn test_rejects_parameters_outside_unit_interval() {
        assert!(QLearningAgent::new(1.5, 0.9, 0.1).is_err());
        assert!(SarsaAgent::new(0.5, -0.1, 0.1).is_err());
        assert!(SarsaAgent::new(0.5, 0.9, 2.0).is_err());
    }

    #[test]
    fn test_greedy_tie_break_is_lowest_index() {
        let mut agent = QLearningAgent::new(0.5, 0.9, 0.0).unwrap().with_seed(3);
        let table = table_with_next_row(&[1.0, 4.0, 4.0, 2.0]);
        for _ in 0..20 {
            assert_eq!(agent.action(&table, 1), 1);
        }
    }

    #[test]
    fn test_full_exploration_covers_every_action() {
        let mut agent = SarsaAgent::new(0.5, 0.9, 1.0).unwrap().with_seed(11);
        let table = QTable::new(1, 4, 0.0);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[agent.action(&table, 0)] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn test_seeded_agents_repeat_their_choices() {
        let table = QTable::new(1, 5, 0.0);
        let mut first = QLearningAgent::new(0.1, 0.9, 0.7).unwrap().with_seed(42);
        let mut second = QLearningAgent::new(0.1, 0.9, 0.7).unwrap().with_seed(42);
        let a: Vec<_> = (0..50).map(|_| first.action(&table, 0)).collect();
        let b: Vec<_> = (0..50).map(|_| second.action(&table, 0)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_q_learning_update() {
        let agent = QLearningAgent::new(0.5, 0.99, 0.0).unwrap();
        let mut table = table_with_next_row(&[1.0, 2.0]);

        agent.learn(&mut table, 0, 1, 0.0, 1, 0);

        // Q(0,1) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        assert!((table.get(0, 1) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_sarsa_update_uses_selected_next_action() {
        let agent = SarsaAgent::new(0.5, 0.99, 0.0).unwrap();
        let mut table = table_with_next_row(&[1.5, 3.0]);

        agent.learn(&mut table, 0, 0, 0.0, 1, 0);

        // Q(0,0) = 0.0 + 0.5 * (0.0 + 0.99 * 1.5 - 0.0) = 0.7425
        assert!((table.get(0, 0) - 0.7425).abs() < 1e-12);
    }

    #[test]
    fn test_td_error_contracts_by_one_minus_alpha() {
        let alpha = 0.3;
        let gamma = 0.9;
        let reward = 1.0;
        let agent = QLearningAgent::new(alpha, gamma, 0.0).unwrap();
        let mut table = table_with_next_row(&[2.0, 5.0]);
        let target = reward + gamma * 5.0;

        let mut gap = target - table.get(0, 0);
        for _ in 0..10 {
            agent.learn(&mut table, 0, 0, reward, 1, 0);
            let next_gap = target - table.get(0, 0);
            assert!((next_gap - (1.0 - alpha) * gap).abs() < 1e-12);
            gap = next_gap;
        }
    }

    #[test]
    fn test_rules_agree_only_when_next_action_is_greedy() {
        let q = QLearningAgent::new(0.4, 0.8, 0.0).unwrap();
        let s = SarsaAgent::new(0.4, 0.8, 0.0).unwrap();
        let base = table_with_next_row(&[0.5, 3.0, -1.0]);
        let greedy = base.greedy_action(1);

        let mut q_table = base.clone();
        let mut s_table = base.clone();
        q.learn(&mut q_table, 0, 2, -0.5, 1, greedy);
        s.learn(&mut s_table, 0, 2, -0.5, 1, greedy);
        assert_eq!(q_table.get(0, 2), s_table.get(0, 2));

        let mut q_table = base.clone();
        let mut s_table = base;
        q.learn(&mut q_table, 0, 2, -0.5, 1, 0);
        s.learn(&mut s_table, 0, 2, -0.5, 1, 0);
        assert_ne!(q_table.get(0, 2), s_table.get(0, 2));
    }

    #[test]
    fn test_fix_freezes_table_and_exploration() {
        let mut agent = SarsaAgent::new(0.9, 0.9, 1.0).unwrap().with_seed(5);
        agent.fix();
        assert_eq!(agent.parameters().alpha, 0.0);
        assert_eq!(agent.parameters().epsilon, 0.0);

        let mut table = table_with_next_row(&[0.0, 9.0]);
        let before = table.clone();
        agent.learn(&mut table, 0, 0, 100.0, 1, 1);
        assert_eq!(table, before);
        assert_eq!(agent.action(&table, 1), 1);
    }
}
