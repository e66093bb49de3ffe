//! Train and evaluate commands invoked through their argument structs.

use tdrl::cli::commands::{
    evaluate::{self, EvaluateArgs},
    train::{self, TrainArgs},
};

mod common;

use common::{RunParams, read_lines, write_maze_config};

fn train_args(config: std::path::PathBuf) -> TrainArgs {
    TrainArgs {
        config,
        seed: None,
        progress: false,
        no_progress: true,
        observations: None,
        summary: None,
    }
}

#[test]
fn test_train_writes_summary_and_observations() {
    let dir = tempfile::tempdir().unwrap();
    let params = RunParams {
        epsilon: 0.2,
        episodes: 25,
        steps: 10,
        ..RunParams::default()
    };
    let config = write_maze_config(dir.path(), "Q-learning", &params, "");

    let mut args = train_args(config);
    args.seed = Some(99);
    args.summary = Some(dir.path().join("summary"));
    args.observations = Some(dir.path().join("episodes.jsonl"));
    train::execute(args).unwrap();

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["training"]["episodes"], 25);
    assert_eq!(summary["metrics"]["episodes"], 25);
    assert_eq!(summary["metadata"]["agent"], "Q-learning");
    assert_eq!(summary["metadata"]["environment"], "Maze");
    assert_eq!(summary["metadata"]["seed"], 99);

    // 25 training lines plus the evaluation episode
    let observations = read_lines(&dir.path().join("episodes.jsonl"));
    assert_eq!(observations.len(), 26);
    assert!(observations[0].contains("\"phase\":\"train\""));
    assert!(observations[25].contains("\"phase\":\"evaluate\""));
}

#[test]
fn test_train_then_evaluate_saved_table() {
    let dir = tempfile::tempdir().unwrap();
    let q_table = dir.path().join("maze.qtable");
    let params = RunParams {
        epsilon: 0.1,
        episodes: 50,
        steps: 10,
        ..RunParams::default()
    };
    let config = write_maze_config(
        dir.path(),
        "Sarsa",
        &params,
        &format!("QTABLE_PATH={}\n", q_table.display()),
    );

    train::execute(train_args(config.clone())).unwrap();
    assert!(q_table.exists());

    let history = dir.path().join("evaluation.log");
    evaluate::execute(EvaluateArgs {
        config,
        q_table,
        history: Some(history.clone()),
    })
    .unwrap();

    assert_eq!(
        read_lines(&history),
        read_lines(&dir.path().join("history.log"))
    );
}

#[test]
fn test_train_reports_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.conf");
    std::fs::write(&config, "AGENT_NAME=TD-lambda\n").unwrap();

    let err = train::execute(train_args(config)).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load config"));
}
