//! In-memory score cache with TTL eviction.
//!
//! Uses a single `parking_lot::Mutex` over the whole map. Reads refresh the
//! stored timestamp, so every public operation mutates and an `RwLock` would
//! buy nothing. Every operation holds the lock for O(1) work except
//! [`ScoreCache::evict_expired`], which holds it for one pass over the map.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};
use types::{Action, DEFAULT_SEPARATOR, ScoreRecord};

use crate::classify::classify;

/// Shortest sweep interval a sweeper will run with.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

// =============================================================================
// Configuration
// =============================================================================

/// What counts as activity for expiry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchPolicy {
    /// Updates and score reads both keep a game alive.
    #[default]
    ReadAndWrite,
    /// Only updates keep a game alive; TTL is time since last write.
    WriteOnly,
}

/// Cache configuration (declarative).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Idle time after which a game is evicted.
    pub ttl: Duration,
    /// Separator between the two team names in a game poster.
    pub separator: char,
    /// Whether reads refresh the activity timestamp.
    pub touch_policy: TouchPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            separator: DEFAULT_SEPARATOR,
            touch_policy: TouchPolicy::default(),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle TTL.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the game poster separator.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set the touch policy.
    pub fn touch_policy(mut self, policy: TouchPolicy) -> Self {
        self.touch_policy = policy;
        self
    }

    /// Sweep period that evicts an idle game within `ttl + ttl / 2`.
    pub fn sweep_interval(&self) -> Duration {
        (self.ttl / 2).max(MIN_SWEEP_INTERVAL)
    }

    /// Bring a requested sweep interval into `[MIN_SWEEP_INTERVAL, ttl]`.
    ///
    /// Longer than the TTL would let an idle game outlive two TTL windows.
    /// A TTL below the minimum still sweeps at the minimum.
    pub fn clamp_sweep_interval(&self, interval: Duration) -> Duration {
        interval.clamp(MIN_SWEEP_INTERVAL, self.ttl.max(MIN_SWEEP_INTERVAL))
    }
}

// =============================================================================
// SweepReport
// =============================================================================

/// Outcome of one eviction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records removed because they were idle longer than the TTL.
    pub evicted: usize,
    /// Records whose timestamp was in the future and got reset to now.
    pub reset: usize,
    /// Records left in the cache after the pass.
    pub retained: usize,
}

// =============================================================================
// ScoreCache
// =============================================================================

/// Live score per game.
///
/// Owns every [`ScoreRecord`]; callers only ever get clones. Share it as
/// `Arc<ScoreCache>` between the pipeline, readers and the sweeper.
#[derive(Debug)]
pub struct ScoreCache {
    config: CacheConfig,
    games: Mutex<HashMap<String, ScoreRecord>>,
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ScoreCache {
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            games: Mutex::new(HashMap::new()),
        }
    }

    /// Cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // The un-suffixed operations read the clock only once the lock is held,
    // so timestamps written under the lock never go backwards.

    /// Apply an action at the current time. Returns the points credited.
    pub fn update(&self, action: &Action) -> u32 {
        self.update_with(action, Instant::now)
    }

    /// Apply an action as if it arrived at `now`. Returns the points credited.
    ///
    /// Creates the game on first sight, whatever the description. Only a
    /// positive classification changes a score. The whole read-modify-write
    /// happens under one lock acquisition.
    pub fn update_at(&self, action: &Action, now: Instant) -> u32 {
        self.update_with(action, || now)
    }

    fn update_with(&self, action: &Action, clock: impl FnOnce() -> Instant) -> u32 {
        let delta = classify(&action.description);
        let separator = self.config.separator;

        let (created, unknown_team) = {
            let mut games = self.games.lock();
            let now = clock();
            let mut created = false;
            let record = games
                .entry(action.game_poster.clone())
                .or_insert_with(|| {
                    created = true;
                    ScoreRecord::new(&action.game_poster, separator, now)
                });

            let unknown_team = delta > 0 && !record.involves(&action.team);
            if delta > 0 {
                record.credit(&action.team, delta);
            }
            record.touch(now);
            (created, unknown_team)
        };

        if created {
            debug!(game = %action.game_poster, "Tracking new game");
            if !action.game_poster.contains(separator) {
                debug!(
                    game = %action.game_poster,
                    %separator,
                    "Game poster has no separator; second team left empty"
                );
            }
        }
        if unknown_team {
            warn!(
                game = %action.game_poster,
                team = %action.team,
                points = delta,
                "Team not part of game; points credited to team B"
            );
        }

        delta
    }

    /// Current score of a game, or [`ScoreRecord::empty`] when unknown.
    pub fn get_score(&self, game_poster: &str) -> ScoreRecord {
        self.get_score_with(game_poster, Instant::now)
    }

    /// Current score of a game as read at `now`.
    ///
    /// Under [`TouchPolicy::ReadAndWrite`] the stored record's timestamp is
    /// refreshed before the clone is taken.
    pub fn get_score_at(&self, game_poster: &str, now: Instant) -> ScoreRecord {
        self.get_score_with(game_poster, || now)
    }

    fn get_score_with(&self, game_poster: &str, clock: impl FnOnce() -> Instant) -> ScoreRecord {
        let mut games = self.games.lock();
        match games.get_mut(game_poster) {
            Some(record) => {
                if self.config.touch_policy == TouchPolicy::ReadAndWrite {
                    record.touch(clock());
                }
                record.clone()
            }
            None => ScoreRecord::empty(),
        }
    }

    /// Evict idle games at the current time.
    pub fn evict_expired(&self) -> SweepReport {
        self.evict_expired_with(Instant::now)
    }

    /// Evict games idle for longer than the TTL as of `now`.
    ///
    /// A timestamp in the future is reset to `now` and the record is kept
    /// with its scores intact.
    pub fn evict_expired_at(&self, now: Instant) -> SweepReport {
        self.evict_expired_with(|| now)
    }

    fn evict_expired_with(&self, clock: impl FnOnce() -> Instant) -> SweepReport {
        let ttl = self.config.ttl;
        let mut games = self.games.lock();
        let now = clock();
        let before = games.len();
        let mut reset = 0;

        games.retain(|_, record| match record.last_touched {
            Some(touched) if touched > now => {
                record.touch(now);
                reset += 1;
                true
            }
            Some(touched) => now.duration_since(touched) <= ttl,
            None => {
                record.touch(now);
                true
            }
        });

        let retained = games.len();
        SweepReport {
            evicted: before - retained,
            reset,
            retained,
        }
    }

    /// Number of live games.
    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    /// Whether no game is live.
    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }

    /// Names of live games, sorted. Does not touch.
    pub fn games(&self) -> Vec<String> {
        let mut names: Vec<String> = self.games.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Clones of every live record, sorted by game. Does not touch.
    pub fn snapshot(&self) -> Vec<ScoreRecord> {
        let mut records: Vec<ScoreRecord> = self.games.lock().values().cloned().collect();
        records.sort_by(|a, b| a.game_name.cmp(&b.game_name));
        records
    }
}
