//! Database schema and configuration
//!
//! **SoC:** This module ONLY defines schema, no business logic

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Storage configuration (declarative)
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to SQLite database (`:memory:` for in-memory)
    pub path: String,
    /// How long SQLite waits on a locked database before reporting busy
    pub busy_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            busy_timeout: Duration::from_secs(1),
        }
    }
}

impl StorageConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Initialize database with schema
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    // Action log (append-only, all games)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS actions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game TEXT NOT NULL,
            team TEXT NOT NULL,
            player_name TEXT NOT NULL,
            description TEXT NOT NULL,
            minute INTEGER NOT NULL,
            created_at INTEGER DEFAULT (strftime('%s', 'now'))
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_actions_game ON actions(game)",
        [],
    )?;

    // Per-player counters
    conn.execute(
        "CREATE TABLE IF NOT EXISTS player_statistics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_name TEXT NOT NULL UNIQUE,
            two_point_try INTEGER NOT NULL DEFAULT 0,
            two_point_success INTEGER NOT NULL DEFAULT 0,
            three_point_try INTEGER NOT NULL DEFAULT 0,
            three_point_success INTEGER NOT NULL DEFAULT 0,
            free_throw_try INTEGER NOT NULL DEFAULT 0,
            free_throw_success INTEGER NOT NULL DEFAULT 0,
            foul INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        // Verify tables exist
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(tables.contains(&"actions".to_string()));
        assert!(tables.contains(&"player_statistics".to_string()));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_config_from_path() {
        let config = StorageConfig::from_path("/tmp/scores.db");
        assert_eq!(config.path, "/tmp/scores.db");
        assert!(!config.is_in_memory());
        assert!(StorageConfig::default().is_in_memory());
    }
}
