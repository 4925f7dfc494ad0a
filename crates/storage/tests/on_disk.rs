//! File-backed database tests.

use std::sync::Arc;
use std::time::Duration;

use pipeline::{IterSource, PersistenceSink, Pipeline, RetryPolicy, SinkError};
use rusqlite::Connection;
use scoreboard::ScoreCache;
use storage::{SqliteSink, StorageConfig};
use tempfile::TempDir;
use types::Action;

fn game() -> Vec<Action> {
    vec![
        Action::new("Boston_Knicks", "Boston", "Jaylen Brown", "2pts succes", 1),
        Action::new("Boston_Knicks", "Knicks", "Tyler Kolek", "3pts succes", 2),
        Action::new("Boston_Knicks", "Boston", "Jaylen Brown", "free throw try", 3),
    ]
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.db");

    {
        let mut sink = SqliteSink::from_path(&path).unwrap();
        for action in game() {
            sink.send(&action).unwrap();
        }
    }

    let sink = SqliteSink::from_path(&path).unwrap();
    assert_eq!(sink.game_history("Boston_Knicks").unwrap(), game());

    let brown = sink.player_stats("Jaylen Brown").unwrap().unwrap();
    assert_eq!(brown.two_point_success, 1);
    assert_eq!(brown.free_throw_try, 1);
}

#[test]
fn test_pipeline_into_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.db");
    let cache = Arc::new(ScoreCache::default());

    let sink = SqliteSink::from_path(&path).unwrap();
    let mut pipeline = Pipeline::new(Arc::clone(&cache), IterSource::new(game()), sink);
    let report = pipeline.run().unwrap();
    assert_eq!(report.persisted, 3);

    let score = cache.get_score("Boston_Knicks");
    assert_eq!((score.score_a, score.score_b), (2, 3));
    assert_eq!(pipeline.sink().action_count().unwrap(), 3);
}

#[test]
fn test_locked_database_is_transient() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.db");

    let config = StorageConfig::from_path(&path).busy_timeout(Duration::ZERO);
    let mut sink = SqliteSink::new(config).unwrap();

    // Another connection holds the write lock
    let other = Connection::open(&path).unwrap();
    other.execute_batch("BEGIN EXCLUSIVE").unwrap();

    let err = sink.send(&game()[0]).unwrap_err();
    assert!(matches!(err, SinkError::Transient(_)), "got {err:?}");

    other.execute_batch("COMMIT").unwrap();
    assert!(sink.send(&game()[0]).is_ok());
}

#[test]
fn test_pipeline_gives_up_while_locked_and_cache_stays_ahead() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.db");
    let cache = Arc::new(ScoreCache::default());

    let sink = SqliteSink::new(StorageConfig::from_path(&path).busy_timeout(Duration::ZERO))
        .unwrap();
    let other = Connection::open(&path).unwrap();
    other.execute_batch("BEGIN EXCLUSIVE").unwrap();

    let retry = RetryPolicy::default()
        .max_attempts(2)
        .initial_backoff(Duration::from_millis(1));
    let mut pipeline =
        Pipeline::new(Arc::clone(&cache), IterSource::new(game()), sink).retry_policy(retry);

    assert!(pipeline.run().is_err());
    assert_eq!(cache.get_score("Boston_Knicks").score_a, 2);

    other.execute_batch("COMMIT").unwrap();
    assert_eq!(pipeline.sink().action_count().unwrap(), 0);
}
