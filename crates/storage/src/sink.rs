//! SQLite persistence sink
//!
//! **Philosophy:** Declarative, Modular, SoC
//! - Implements the pipeline's `PersistenceSink` trait (modular)
//! - Config-driven connection setup (declarative)
//! - Only persistence logic, no scoring concerns (SoC)

use parking_lot::Mutex;
use pipeline::{Ack, PersistenceSink, SinkError};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};
use types::Action;

use crate::error::StorageError;
use crate::schema::{StorageConfig, init_schema};
use crate::stats::{PlayerStatistics, counter_update};

/// Sink writing the action log and player counters to SQLite.
///
/// Each action is stored in its own transaction: either the log row and the
/// counter update both land, or neither does.
pub struct SqliteSink {
    config: StorageConfig,
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Open the database and create the schema if needed
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.path)?
        };

        conn.busy_timeout(config.busy_timeout)?;
        init_schema(&conn)?;
        debug!(path = %config.path, "Opened score database");

        Ok(Self {
            config,
            conn: Mutex::new(conn),
        })
    }

    /// Open from path (uses default config)
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        Self::new(StorageConfig::from_path(path))
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Store one action and bump the player's counters. Returns the row id.
    pub fn record(&self, action: &Action) -> Result<i64, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO actions (game, team, player_name, description, minute)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                action.game_poster,
                action.team,
                action.player_name,
                action.description,
                action.minute,
            ],
        )?;
        let id = tx.last_insert_rowid();

        match counter_update(action.kind()) {
            Some(update) => {
                tx.execute(
                    "INSERT INTO player_statistics (player_name) VALUES (?1)
                     ON CONFLICT(player_name) DO NOTHING",
                    params![action.player_name],
                )?;
                tx.execute(update, params![action.player_name])?;
            }
            None => debug!(description = %action.description, "No counter for description"),
        }

        tx.commit()?;
        Ok(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every stored action for a game, in insertion order.
    pub fn game_history(&self, game: &str) -> Result<Vec<Action>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT game, team, player_name, description, minute
             FROM actions WHERE game = ?1 ORDER BY id",
        )?;
        let actions = stmt
            .query_map(params![game], |row| {
                Ok(Action {
                    game_poster: row.get(0)?,
                    team: row.get(1)?,
                    player_name: row.get(2)?,
                    description: row.get(3)?,
                    minute: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(actions)
    }

    /// Distinct game names with stored actions, sorted.
    pub fn game_names(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT DISTINCT game FROM actions ORDER BY game")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    pub fn player_stats(&self, player_name: &str) -> Result<Option<PlayerStatistics>, StorageError> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM player_statistics WHERE player_name = ?1",
            PlayerStatistics::COLUMNS
        );
        let stats = conn
            .query_row(&sql, params![player_name], PlayerStatistics::from_row)
            .optional()?;
        Ok(stats)
    }

    /// All players, sorted by name.
    pub fn all_player_stats(&self) -> Result<Vec<PlayerStatistics>, StorageError> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM player_statistics ORDER BY player_name",
            PlayerStatistics::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let stats = stmt
            .query_map([], PlayerStatistics::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    pub fn action_count(&self) -> Result<u64, StorageError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM actions", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl PersistenceSink for SqliteSink {
    fn name(&self) -> &str {
        "SqliteSink"
    }

    fn send(&mut self, action: &Action) -> Result<Ack, SinkError> {
        match self.record(action) {
            Ok(id) => Ok(Ack::with_id(id)),
            Err(e) => {
                warn!(game = %action.game_poster, "Failed to store action: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> SqliteSink {
        SqliteSink::new(StorageConfig::default()).unwrap()
    }

    fn action(player: &str, desc: &str, minute: i32) -> Action {
        Action::new("Boston_Knicks", "Boston", player, desc, minute)
    }

    #[test]
    fn test_sink_creation() {
        let sink = sink();
        assert_eq!(sink.name(), "SqliteSink");
        assert_eq!(sink.action_count().unwrap(), 0);
    }

    #[test]
    fn test_send_appends_history_in_order() {
        let mut sink = sink();
        let first = sink.send(&action("Jaylen Brown", "2pts try", 1)).unwrap();
        let second = sink.send(&action("Jaylen Brown", "2pts succes", 2)).unwrap();
        sink.send(&Action::new("Lakers_Bulls", "Lakers", "LeBron", "foul", 1))
            .unwrap();

        assert!(first.id.unwrap() < second.id.unwrap());

        let history = sink.game_history("Boston_Knicks").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].description, "2pts try");
        assert_eq!(history[1], action("Jaylen Brown", "2pts succes", 2));

        assert_eq!(
            sink.game_names().unwrap(),
            vec!["Boston_Knicks".to_string(), "Lakers_Bulls".to_string()]
        );
    }

    #[test]
    fn test_player_counters() {
        let mut sink = sink();
        for desc in [
            "2pts try",
            "2pts succes",
            "3pts try",
            "3pts succes",
            "3pts succes",
            "free throw try",
            "free throw succes",
            "foul",
            "timeout",
        ] {
            sink.send(&action("Sam Hauser", desc, 1)).unwrap();
        }

        let stats = sink.player_stats("Sam Hauser").unwrap().unwrap();
        assert_eq!(stats.two_point_try, 2);
        assert_eq!(stats.two_point_success, 1);
        assert_eq!(stats.three_point_try, 3);
        assert_eq!(stats.three_point_success, 2);
        assert_eq!(stats.free_throw_try, 2);
        assert_eq!(stats.free_throw_success, 1);
        assert_eq!(stats.foul, 1);
        assert_eq!(stats.points(), 9);

        // Unknown description is still logged
        assert_eq!(sink.action_count().unwrap(), 9);
    }

    #[test]
    fn test_unknown_description_creates_no_player() {
        let mut sink = sink();
        sink.send(&action("Bench Player", "timeout", 1)).unwrap();
        assert!(sink.player_stats("Bench Player").unwrap().is_none());
        assert!(sink.all_player_stats().unwrap().is_empty());
    }

    #[test]
    fn test_all_player_stats_sorted() {
        let mut sink = sink();
        sink.send(&action("Zed", "foul", 1)).unwrap();
        sink.send(&action("Amy", "foul", 2)).unwrap();

        let names: Vec<String> = sink
            .all_player_stats()
            .unwrap()
            .into_iter()
            .map(|s| s.player_name)
            .collect();
        assert_eq!(names, vec!["Amy".to_string(), "Zed".to_string()]);
    }

    #[test]
    fn test_quoted_names_are_bound_not_interpolated() {
        let mut sink = sink();
        let game = "O'Neal_Robert'); DROP TABLE actions;--";
        sink.send(&Action::new(game, "O'Neal", "Shaq O'Neal", "2pts succes", 1))
            .unwrap();

        assert_eq!(sink.game_history(game).unwrap().len(), 1);
        assert_eq!(sink.action_count().unwrap(), 1);
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let mut sink = sink();
        sink.conn
            .lock()
            .execute("DROP TABLE actions", [])
            .unwrap();

        let err = sink.send(&action("p", "foul", 1)).unwrap_err();
        assert!(!err.is_retryable());
    }
}
