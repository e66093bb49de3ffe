//! Training loop: episodes, steps, absorbing terminals and evaluation

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    analysis::ReturnStats,
    history::History,
    ports::{Agent, Environment, Observer},
    q_learning::QTable,
};

/// Episode and step budget of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Number of training episodes
    pub max_episode: usize,

    /// Hard step horizon of every episode
    pub max_step: usize,

    /// Stop once this many consecutive episodes succeed (0 disables)
    pub max_succeeded_episode: usize,
}

impl TrainingSettings {
    pub fn new(max_episode: usize, max_step: usize) -> Self {
        Self {
            max_episode,
            max_step,
            max_succeeded_episode: 0,
        }
    }

    pub fn with_success_streak(mut self, episodes: usize) -> Self {
        self.max_succeeded_episode = episodes;
        self
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode index (0-based)
    pub episode: usize,
    /// Sum of recorded rewards
    #[serde(rename = "return")]
    pub total_reward: f64,
    /// Environment steps taken
    pub steps: usize,
    /// Whether the episode ended in a success state
    pub success: bool,
}

/// Result of the training phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes actually run
    pub episodes: usize,

    /// Whether the success streak stopped training before `max_episode`
    pub completed_early: bool,

    /// Episodes that ended in success
    pub successes: usize,

    pub mean_return: f64,
    pub best_return: f64,
    pub final_return: f64,

    /// Return of the frozen greedy episode, once evaluated
    pub evaluation_return: Option<f64>,
    pub evaluation_steps: Option<usize>,
}

impl TrainingResult {
    fn new(returns: &[f64], successes: usize, completed_early: bool) -> Self {
        let stats = ReturnStats::from_returns(returns);
        Self {
            episodes: returns.len(),
            completed_early,
            successes,
            mean_return: stats.mean,
            best_return: stats.max,
            final_return: returns.last().copied().unwrap_or(0.0),
            evaluation_return: None,
            evaluation_steps: None,
        }
    }

    /// Attach the outcome of the evaluation episode
    pub fn record_evaluation(&mut self, summary: &EpisodeSummary) {
        self.evaluation_return = Some(summary.total_reward);
        self.evaluation_steps = Some(summary.steps);
    }
}

/// Owns the environment, agent and Q-table for the lifetime of a run
pub struct TrainingLoop {
    settings: TrainingSettings,
    agent: Box<dyn Agent>,
    env: Box<dyn Environment>,
    q_table: QTable,
    returns: Vec<f64>,
    test_history: Option<History>,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingLoop {
    /// Create a loop with a fresh Q-table shaped by the environment
    pub fn new(
        settings: TrainingSettings,
        agent: Box<dyn Agent>,
        env: Box<dyn Environment>,
        init_qvalue: f64,
    ) -> Self {
        let q_table = QTable::new(env.state_size(), env.action_size(), init_qvalue);
        Self {
            settings,
            agent,
            env,
            q_table,
            returns: Vec::new(),
            test_history: None,
            observers: Vec::new(),
        }
    }

    /// Replace the Q-table with a previously trained one of the same shape
    pub fn with_q_table(mut self, q_table: QTable) -> Result<Self> {
        if q_table.state_size() != self.env.state_size()
            || q_table.action_size() != self.env.action_size()
        {
            return Err(Error::QTableShape {
                stored_states: q_table.state_size(),
                stored_actions: q_table.action_size(),
                expected_states: self.env.state_size(),
                expected_actions: self.env.action_size(),
            });
        }
        self.q_table = q_table;
        Ok(self)
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn settings(&self) -> &TrainingSettings {
        &self.settings
    }

    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Returns of the training episodes run so far, in order
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Trajectory of the evaluation episode, once [`Self::evaluate`] has run
    pub fn test_history(&self) -> Option<&History> {
        self.test_history.as_ref()
    }

    /// Run the training phase: up to `max_episode` episodes
    pub fn train(&mut self) -> Result<TrainingResult> {
        if self.settings.max_step == 0 {
            tracing::warn!("max_step is 0; episodes will record only the initial state");
        }
        tracing::info!(
            agent = self.agent.name(),
            environment = self.env.name(),
            episodes = self.settings.max_episode,
            max_step = self.settings.max_step,
            states = self.q_table.state_size(),
            actions = self.q_table.action_size(),
            "training started"
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.settings.max_episode)?;
        }

        let mut successes = 0;
        let mut streak = 0;
        let mut completed_early = false;

        for episode in 0..self.settings.max_episode {
            let history = self.run_episode();
            let summary = EpisodeSummary {
                episode,
                total_reward: history.total_reward(),
                steps: history.steps(),
                success: self.env.is_success(),
            };
            self.returns.push(summary.total_reward);

            tracing::debug!(
                episode,
                total_reward = summary.total_reward,
                steps = summary.steps,
                success = summary.success,
                "episode finished"
            );
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }

            if summary.success {
                successes += 1;
                streak += 1;
            } else {
                streak = 0;
            }

            if self.settings.max_succeeded_episode > 0
                && streak >= self.settings.max_succeeded_episode
            {
                tracing::info!(episode, streak, "success streak reached, stopping early");
                completed_early = true;
                break;
            }
        }

        let result = TrainingResult::new(&self.returns, successes, completed_early);
        tracing::info!(
            episodes = result.episodes,
            mean_return = result.mean_return,
            best_return = result.best_return,
            "training finished"
        );
        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }
        Ok(result)
    }

    /// Freeze the agent and run one greedy episode, keeping its trajectory
    pub fn evaluate(&mut self) -> Result<EpisodeSummary> {
        self.agent.fix();
        let history = self.run_episode();
        let summary = EpisodeSummary {
            episode: self.returns.len(),
            total_reward: history.total_reward(),
            steps: history.steps(),
            success: self.env.is_success(),
        };
        self.test_history = Some(history);

        tracing::info!(
            total_reward = summary.total_reward,
            steps = summary.steps,
            success = summary.success,
            "evaluation finished"
        );
        for observer in &mut self.observers {
            observer.on_evaluation_end(&summary)?;
        }
        Ok(summary)
    }

    /// Run one episode and return its trajectory
    ///
    /// Records are shifted by one step: the first record holds the first
    /// selected action with the reward of the initial state.
    pub fn run_episode(&mut self) -> History {
        let mut history = History::new();

        self.env.reset();

        let mut s1 = self.env.state();
        let mut a1 = self.agent.action(&self.q_table, s1);
        history.push(a1, self.env.reward(), s1, self.env.info());

        for _ in 0..self.settings.max_step {
            self.env.step(a1);
            let s2 = self.env.state();
            let reward = self.env.reward();
            let info = self.env.info();
            let a2 = self.agent.action(&self.q_table, s2);

            history.push(a1, reward, s2, info);

            let finished = self.env.is_finish();
            if finished {
                // Absorbing terminal: nothing can be bootstrapped from s2
                self.q_table.zero_row(s2);
            }
            self.agent.learn(&mut self.q_table, s1, a1, reward, s2, a2);

            if finished {
                break;
            }

            s1 = s2;
            a1 = a2;
        }

        history
    }
}
