//! Dependency injection container for training runs.
//!
//! The container owns infrastructure dependencies (Q-table persistence, the
//! default seed) and turns typed settings into agents, environments and a
//! ready-to-run [`TrainingLoop`].

use std::{path::Path, sync::Arc};

use super::config::{AgentSettings, EnvironmentSettings, Settings};
use crate::{
    Result,
    adapters::MsgPackRepository,
    environment::{CartpoleEnvironment, MazeEnvironment, MazeGrid},
    export,
    pipeline::{EpisodeSummary, TrainingLoop, TrainingResult},
    ports::{Agent, Environment, Observer, QTableRepository},
    q_learning::{QLearningAgent, QTable, SarsaAgent, SavedQTable, TdAlgorithm},
};

/// Build the agent named by `settings`, seeding it when a seed is given
pub fn build_agent(settings: &AgentSettings) -> Box<dyn Agent> {
    let mut agent: Box<dyn Agent> = match settings.algorithm {
        TdAlgorithm::QLearning => Box::new(QLearningAgent::from_parameters(settings.parameters)),
        TdAlgorithm::Sarsa => Box::new(SarsaAgent::from_parameters(settings.parameters)),
    };
    if let Some(seed) = settings.seed {
        agent.set_rng_seed(seed);
    }
    agent
}

/// Build the environment named by `settings`
///
/// # Errors
///
/// Returns an error if the cart-pole parameters are invalid or the maze
/// file cannot be read or parsed.
pub fn build_environment(settings: &EnvironmentSettings) -> Result<Box<dyn Environment>> {
    match settings {
        EnvironmentSettings::Cartpole(cartpole) => {
            Ok(Box::new(CartpoleEnvironment::new(cartpole.clone())?))
        }
        EnvironmentSettings::Maze(maze) => {
            let grid = MazeGrid::load(&maze.path)?;
            Ok(Box::new(MazeEnvironment::new(grid, maze.rewards)))
        }
    }
}

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use std::path::Path;
///
/// use tdrl::app::{App, Settings};
///
/// let app = App::new();
/// let settings = Settings::load(Path::new("maze.conf"))?;
/// let result = app.run(&settings, Vec::new())?;
/// println!("mean return {}", result.mean_return);
/// # Ok::<(), tdrl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tdrl::adapters::InMemoryRepository;
/// use tdrl::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for Q-table persistence
    repository: Arc<dyn QTableRepository + Send + Sync>,
    /// Seed applied when the agent settings carry none
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults: MessagePack persistence,
    /// no default seed.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing an app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn repository(&self) -> Arc<dyn QTableRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Create the agent, falling back to the app's default seed
    pub fn create_agent(&self, settings: &AgentSettings) -> Box<dyn Agent> {
        let mut settings = *settings;
        settings.seed = settings.seed.or(self.default_seed);
        build_agent(&settings)
    }

    /// Wire agent, environment and a fresh Q-table into a training loop
    pub fn build_training_loop(&self, settings: &Settings) -> Result<TrainingLoop> {
        let environment = build_environment(&settings.environment)?;
        let agent = self.create_agent(&settings.agent);
        Ok(TrainingLoop::new(
            settings.run.training,
            agent,
            environment,
            settings.run.init_qvalue,
        ))
    }

    /// Persist the loop's table tagged with the agent that trained it
    pub fn save_q_table(
        &self,
        algorithm: TdAlgorithm,
        training: &TrainingLoop,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedQTable::new(
            algorithm,
            training.environment().name(),
            training.q_table().clone(),
        );
        self.repository.save(&saved, path)
    }

    /// Load a table and check it fits `environment`
    pub fn load_q_table(&self, path: &Path, environment: &dyn Environment) -> Result<QTable> {
        let saved = self.repository.load(path)?;
        if saved.environment != environment.name() {
            tracing::warn!(
                stored = %saved.environment,
                current = environment.name(),
                "q-table was trained on a different environment"
            );
        }
        saved.into_q_table(environment.state_size(), environment.action_size())
    }

    /// Train, evaluate, and write every configured output.
    ///
    /// Writes the returns log and the evaluation history, then persists the
    /// Q-table when `QTABLE_PATH` was configured.
    pub fn run(
        &self,
        settings: &Settings,
        observers: Vec<Box<dyn Observer>>,
    ) -> Result<TrainingResult> {
        let mut training = observers
            .into_iter()
            .fold(self.build_training_loop(settings)?, TrainingLoop::with_observer);

        let mut result = training.train()?;
        export::save_returns(&settings.run.returns_path, training.returns())?;

        let evaluation = training.evaluate()?;
        result.record_evaluation(&evaluation);
        if let Some(history) = training.test_history() {
            export::save_history(&settings.run.test_history_path, history)?;
        }

        if let Some(path) = &settings.run.q_table_path {
            self.save_q_table(settings.agent.algorithm, &training, path)?;
            tracing::info!(path = %path.display(), "q-table saved");
        }

        Ok(result)
    }

    /// Run one frozen greedy episode with a previously trained table.
    ///
    /// The history is written to `history_path`.
    pub fn evaluate(
        &self,
        settings: &Settings,
        q_table_path: &Path,
        history_path: &Path,
    ) -> Result<EpisodeSummary> {
        let training = self.build_training_loop(settings)?;
        let q_table = self.load_q_table(q_table_path, training.environment())?;
        let mut training = training.with_q_table(q_table)?;

        let summary = training.evaluate()?;
        if let Some(history) = training.test_history() {
            export::save_history(history_path, history)?;
        }
        Ok(summary)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an app with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn QTableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom Q-table repository.
    pub fn with_repository<R: QTableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Seed every agent whose settings carry no seed of their own.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app; the repository defaults to `MsgPackRepository`.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        adapters::InMemoryRepository,
        app::{MazeSettings, RunSettings},
        environment::CartpoleSettings,
        pipeline::TrainingSettings,
        q_learning::TdParameters,
    };

    fn agent_settings(algorithm: TdAlgorithm) -> AgentSettings {
        AgentSettings::new(algorithm, TdParameters::new(0.5, 0.9, 0.3).unwrap())
    }

    fn cartpole_settings() -> Settings {
        Settings {
            agent: agent_settings(TdAlgorithm::QLearning),
            environment: EnvironmentSettings::Cartpole(CartpoleSettings::default()),
            run: RunSettings {
                training: TrainingSettings::new(2, 20),
                init_qvalue: 0.0,
                returns_path: PathBuf::from("returns.log"),
                test_history_path: PathBuf::from("history.log"),
                q_table_path: None,
            },
        }
    }

    #[test]
    fn test_construction_table_picks_variant() {
        assert_eq!(build_agent(&agent_settings(TdAlgorithm::QLearning)).name(), "Q-learning");
        assert_eq!(build_agent(&agent_settings(TdAlgorithm::Sarsa)).name(), "Sarsa");

        let env =
            build_environment(&EnvironmentSettings::Cartpole(CartpoleSettings::default())).unwrap();
        assert_eq!(env.name(), "Cartpole");
        assert_eq!(env.state_size(), 80_000);
    }

    #[test]
    fn test_missing_maze_file_is_an_error() {
        let settings = EnvironmentSettings::Maze(MazeSettings::new("/nonexistent/maze.txt"));
        assert!(build_environment(&settings).is_err());
    }

    #[test]
    fn test_default_seed_makes_training_deterministic() {
        let app = App::for_testing().with_default_seed(42).build();
        let settings = cartpole_settings();

        let mut first = app.build_training_loop(&settings).unwrap();
        let mut second = app.build_training_loop(&settings).unwrap();
        first.train().unwrap();
        second.train().unwrap();

        assert_eq!(first.returns(), second.returns());
        assert_eq!(first.q_table(), second.q_table());
    }

    #[test]
    fn test_save_and_load_through_repository() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing()
            .with_repository(repo.clone())
            .with_default_seed(1)
            .build();
        let settings = cartpole_settings();

        let mut training = app.build_training_loop(&settings).unwrap();
        training.train().unwrap();
        let path = Path::new("cartpole.qtable");
        app.save_q_table(TdAlgorithm::QLearning, &training, path)
            .unwrap();
        assert!(repo.contains(path));

        let loaded = app.load_q_table(path, training.environment()).unwrap();
        assert_eq!(&loaded, training.q_table());
    }
}
