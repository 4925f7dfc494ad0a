//! Central configuration for the live score service.
//!
//! All tunables are defined here and mapped onto each crate's own config.

use std::time::Duration;

use pipeline::RetryPolicy;
use scoreboard::{CacheConfig, TouchPolicy};
use server::ServerConfig;
use storage::StorageConfig;
use types::DEFAULT_SEPARATOR;

/// Master configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Score Cache
    // ─────────────────────────────────────────────────────────────────────────
    /// Idle time before a game is evicted.
    pub ttl: Duration,
    /// Sweep interval (None = derived from the TTL).
    pub sweep_interval: Option<Duration>,
    /// Separator between team names in a game poster.
    pub separator: char,
    /// Whether score reads keep a game alive.
    pub touch_policy: TouchPolicy,

    // ─────────────────────────────────────────────────────────────────────────
    // Storage
    // ─────────────────────────────────────────────────────────────────────────
    /// SQLite database path (`:memory:` for in-memory).
    pub db_path: String,
    /// SQLite busy timeout.
    pub busy_timeout: Duration,

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────
    /// Total sink attempts per action.
    pub retry_attempts: u32,
    /// First retry delay, doubled on each further attempt.
    pub retry_backoff: Duration,
    /// Ingest channel capacity (backpressure on replay threads).
    pub channel_capacity: usize,
    /// Real time per game minute during replay.
    pub pace: Duration,

    // ─────────────────────────────────────────────────────────────────────────
    // Server
    // ─────────────────────────────────────────────────────────────────────────
    /// Bind address.
    pub server: ServerConfig,
    /// Default gap between SSE snapshots.
    pub stream_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            sweep_interval: None,
            separator: DEFAULT_SEPARATOR,
            touch_policy: TouchPolicy::ReadAndWrite,

            db_path: ":memory:".to_string(),
            busy_timeout: Duration::from_secs(1),

            retry_attempts: 5,
            retry_backoff: Duration::from_millis(50),
            channel_capacity: 1024,
            pace: Duration::from_millis(500),

            server: ServerConfig::default(),
            stream_interval: Duration::from_secs(1),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn touch_policy(mut self, policy: TouchPolicy) -> Self {
        self.touch_policy = policy;
        self
    }

    pub fn db_path(mut self, path: impl Into<String>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn stream_interval(mut self, interval: Duration) -> Self {
        self.stream_interval = interval;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Per-crate views
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .ttl(self.ttl)
            .separator(self.separator)
            .touch_policy(self.touch_policy)
    }

    /// Explicit interval clamped to the TTL, or the cache's derived default.
    pub fn effective_sweep_interval(&self) -> Duration {
        let cache = self.cache_config();
        match self.sweep_interval {
            Some(interval) => cache.clamp_sweep_interval(interval),
            None => cache.sweep_interval(),
        }
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::from_path(&self.db_path).busy_timeout(self.busy_timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .max_attempts(self.retry_attempts)
            .initial_backoff(self.retry_backoff)
    }
}
