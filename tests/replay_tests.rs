// Integration tests for decision log replay
//
// A recorded game is replayed through a fresh arbiter configured with the
// weights logged at each turn; deterministic strategies must reproduce the
// logged move.

use std::path::PathBuf;

use snake_arbiter::arbiter::Arbiter;
use snake_arbiter::config::Config;
use snake_arbiter::debug_logger::DebugLogger;
use snake_arbiter::replay::ReplayEngine;
use snake_arbiter::types::{Algorithm, Cell, Direction, Snapshot};

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn temp_log_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.jsonl", name, std::process::id()))
}

#[test]
fn test_fixture_replays_with_full_match() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine
        .load_log_file(fixture_path("straight_to_food.jsonl"))
        .expect("fixture should parse");
    assert_eq!(entries.len(), 3);

    let results = engine.replay_all(&entries);
    let stats = engine.generate_stats(&results);

    assert_eq!(stats.total_turns, 3);
    assert_eq!(stats.mismatches, 0);
    assert!((stats.match_rate - 100.0).abs() < f64::EPSILON);
    for result in &results {
        assert_eq!(result.replayed_algorithm, Algorithm::PathSearch);
        assert_eq!(result.replayed_move, Direction::Up);
    }
}

#[test]
fn test_validate_expected_moves_against_fixture() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine
        .load_log_file(fixture_path("straight_to_food.jsonl"))
        .unwrap();

    assert!(engine
        .validate_expected_moves(&entries, &[(0, vec![Direction::Up]), (2, vec![Direction::Up])])
        .is_ok());
    assert!(engine
        .validate_expected_moves(&entries, &[(1, vec![Direction::Left, Direction::Right])])
        .is_err());
    assert!(engine
        .validate_expected_moves(&entries, &[(99, vec![Direction::Up])])
        .is_err());
}

#[test]
fn test_replay_turns_rejects_unknown_turn() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine
        .load_log_file(fixture_path("straight_to_food.jsonl"))
        .unwrap();

    let results = engine.replay_turns(&entries, &[1]).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].matches);
    assert!(engine.replay_turns(&entries, &[7]).is_err());
}

#[test]
fn test_missing_log_file_is_an_error() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    assert!(engine
        .load_log_file(fixture_path("does_not_exist.jsonl"))
        .is_err());
}

#[tokio::test]
async fn test_logged_decisions_replay_identically() {
    let mut config = Config::default_hardcoded();
    config.tree_search.enabled = false;
    let path = temp_log_path("arbiter_replay_roundtrip");
    let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
    assert!(logger.is_enabled());

    // Survival carries a heavy weight so the log mixes strategies
    let mut weights = Arbiter::new(config.clone()).weights();
    weights.set(Algorithm::Survival, 10.0);
    let mut arbiter = Arbiter::new(config.clone()).with_weights(weights);

    let boards = [
        Snapshot::new(
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)],
            Cell::new(10, 5),
            Direction::Right,
        ),
        Snapshot::new(
            vec![Cell::new(3, 3), Cell::new(3, 4), Cell::new(3, 5), Cell::new(3, 6)],
            Cell::new(20, 20),
            Direction::Up,
        ),
    ];
    for (turn, snapshot) in boards.iter().enumerate() {
        let decision = arbiter.decide(snapshot);
        logger
            .log_decision_now(turn as u64, snapshot.clone(), decision)
            .await;
        arbiter.report_outcome(true);
    }

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    let results = engine.replay_all(&entries);
    let _ = std::fs::remove_file(&path);

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.matches));
    assert!(results
        .iter()
        .all(|r| r.replayed_algorithm == Algorithm::Survival));
}
