//! Periodic eviction task.
//!
//! Runs [`ScoreCache::evict_expired`] on a fixed interval inside the tokio
//! runtime until told to stop.
//!
//! ```text
//! Sweeper::spawn()
//!       │
//!       ├──▶ tokio task: interval.tick() ─▶ cache.evict_expired()
//!       │                   ▲
//!       │                   └── select! on watch::Receiver (shutdown)
//!       ▼
//! SweeperHandle::stop().await  ── send(true) ─▶ task exits ─▶ join
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::cache::ScoreCache;

/// Builder for the eviction task.
pub struct Sweeper {
    cache: Arc<ScoreCache>,
    interval: Duration,
}

impl Sweeper {
    /// Sweeper using the cache's derived interval.
    pub fn new(cache: Arc<ScoreCache>) -> Self {
        let interval = cache.config().sweep_interval();
        Self { cache, interval }
    }

    /// Override the sweep interval.
    ///
    /// Clamped into `[MIN_SWEEP_INTERVAL, ttl]` so that an idle game is
    /// still evicted within one TTL window of expiring.
    ///
    /// [`MIN_SWEEP_INTERVAL`]: crate::cache::MIN_SWEEP_INTERVAL
    pub fn interval(mut self, interval: Duration) -> Self {
        let clamped = self.cache.config().clamp_sweep_interval(interval);
        if clamped != interval {
            warn!(requested = ?interval, using = ?clamped, "Sweep interval out of range");
        }
        self.interval = clamped;
        self
    }

    /// Configured sweep interval.
    pub fn period(&self) -> Duration {
        self.interval
    }

    /// Start the task on the current tokio runtime.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(self.cache, self.interval, shutdown_rx));
        SweeperHandle { shutdown_tx, task }
    }
}

/// Handle to a running sweeper.
///
/// Dropping the handle also ends the task, at its next wake-up.
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl SweeperHandle {
    /// Stop the task and wait for it. Returns the number of passes run.
    pub async fn stop(self) -> u64 {
        let _ = self.shutdown_tx.send(true);
        match self.task.await {
            Ok(passes) => passes,
            Err(e) => {
                error!("Sweeper task ended abnormally: {}", e);
                0
            }
        }
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(
    cache: Arc<ScoreCache>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    debug!(?period, "Sweeper started");
    let mut passes = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = cache.evict_expired();
                passes += 1;
                debug!(
                    evicted = report.evicted,
                    reset = report.reset,
                    retained = report.retained,
                    "Sweep pass"
                );
                if report.evicted > 0 {
                    info!("Evicted {} idle game(s), {} live", report.evicted, report.retained);
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    debug!(passes, "Sweeper stopped");
    passes
}
