//! Pipeline coordinator.
//!
//! Pulls actions from a source and, for each one in delivery order:
//!
//! 1. applies it to the score cache
//! 2. persists it through the sink, retrying transient failures
//!
//! # Design Principles
//!
//! - **Ordered**: one action at a time, no buffering, no reordering
//! - **Cache first**: readers see a point as soon as it is classified
//! - **Weakly consistent**: a sink failure never rolls the cache back
//!
//! Runs synchronously on the calling thread. The binary gives it a
//! dedicated OS thread because the SQLite sink blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use scoreboard::ScoreCache;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use types::Action;

use crate::retry::RetryPolicy;
use crate::sink::{Ack, PersistenceSink, SinkError};
use crate::source::ActionSource;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sink rejected an action for good. The cache already holds it.
    #[error("persisting action for game '{game}' failed after {attempts} attempt(s): {source}")]
    Sink {
        game: String,
        attempts: u32,
        #[source]
        source: SinkError,
    },
}

// =============================================================================
// Stats
// =============================================================================

/// Counters shared with readers (the health endpoint).
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Actions pulled from the source.
    pub received: AtomicU64,
    /// Points credited to the cache.
    pub points: AtomicU64,
    /// Actions acknowledged by the sink.
    pub persisted: AtomicU64,
    /// Retries after transient sink errors.
    pub retries: AtomicU64,
    /// Set once a run stops on an unrecoverable sink error.
    pub failed: AtomicBool,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn points(&self) -> u64 {
        self.points.load(Ordering::Relaxed)
    }

    pub fn persisted(&self) -> u64 {
        self.persisted.load(Ordering::Relaxed)
    }

    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Whether actions are no longer being persisted.
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Point-in-time copy.
    pub fn report(&self) -> PipelineReport {
        PipelineReport {
            received: self.received(),
            points: self.points(),
            persisted: self.persisted(),
            retries: self.retries(),
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineReport {
    pub received: u64,
    pub points: u64,
    pub persisted: u64,
    pub retries: u64,
}

// =============================================================================
// Pipeline
// =============================================================================

pub struct Pipeline<S, K> {
    cache: Arc<ScoreCache>,
    source: S,
    sink: K,
    retry: RetryPolicy,
    stats: Arc<PipelineStats>,
}

impl<S, K> Pipeline<S, K>
where
    S: ActionSource,
    K: PersistenceSink,
{
    pub fn new(cache: Arc<ScoreCache>, source: S, sink: K) -> Self {
        Self {
            cache,
            source,
            sink,
            retry: RetryPolicy::default(),
            stats: Arc::new(PipelineStats::new()),
        }
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Count into an existing stats block instead of a private one.
    pub fn with_stats(mut self, stats: Arc<PipelineStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Drain the source. Stops early on the first unrecoverable sink error.
    pub fn run(&mut self) -> Result<PipelineReport, PipelineError> {
        info!(sink = self.sink.name(), "Pipeline started");

        while let Some(action) = self.source.next_action() {
            if let Err(e) = self.process(&action) {
                error!("Pipeline stopped: {}", e);
                self.stats.failed.store(true, Ordering::Relaxed);
                return Err(e);
            }
        }

        let report = self.stats.report();
        info!(
            received = report.received,
            persisted = report.persisted,
            retries = report.retries,
            "Pipeline finished"
        );
        Ok(report)
    }

    /// Apply one action to the cache, then persist it.
    pub fn process(&mut self, action: &Action) -> Result<Ack, PipelineError> {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        let delta = self.cache.update(action);
        self.stats.points.fetch_add(u64::from(delta), Ordering::Relaxed);
        debug!(%action, delta, "Applied action");

        let ack = self.persist(action)?;
        self.stats.persisted.fetch_add(1, Ordering::Relaxed);
        Ok(ack)
    }

    fn persist(&mut self, action: &Action) -> Result<Ack, PipelineError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.sink.send(action) {
                Ok(ack) => return Ok(ack),
                Err(e) if e.is_retryable() && self.retry.should_retry(attempts) => {
                    let backoff = self.retry.backoff(attempts);
                    warn!(
                        game = %action.game_poster,
                        attempt = attempts,
                        ?backoff,
                        "Sink busy, retrying: {}",
                        e
                    );
                    self.stats.retries.fetch_add(1, Ordering::Relaxed);
                    thread::sleep(backoff);
                }
                Err(source) => {
                    return Err(PipelineError::Sink {
                        game: action.game_poster.clone(),
                        attempts,
                        source,
                    });
                }
            }
        }
    }
}
