//! Shared server state.
//!
//! # Design Principles
//!
//! - **Declarative**: State is data, handlers extract what they need
//! - **Modular**: State independent of route logic
//! - **SoC**: State holds references, doesn't own the pipeline

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use pipeline::PipelineStats;
use scoreboard::ScoreCache;

/// Default gap between two SSE score snapshots.
pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// ServerState
// =============================================================================

/// Shared state for all route handlers.
///
/// Cloned into each handler via Axum's State extractor.
#[derive(Clone)]
pub struct ServerState {
    /// Live scores, shared with the pipeline and the sweeper.
    pub cache: Arc<ScoreCache>,

    /// Pipeline counters (actions processed).
    pub pipeline: Arc<PipelineStats>,

    /// Server start time.
    pub start_time: Instant,

    /// Shared metrics.
    pub metrics: Arc<ServerMetrics>,

    /// Default SSE snapshot interval.
    pub stream_interval: Duration,
}

impl ServerState {
    /// Create new server state around a cache.
    pub fn new(cache: Arc<ScoreCache>, pipeline: Arc<PipelineStats>) -> Self {
        Self {
            cache,
            pipeline,
            start_time: Instant::now(),
            metrics: Arc::new(ServerMetrics::new()),
            stream_interval: DEFAULT_STREAM_INTERVAL,
        }
    }

    pub fn with_stream_interval(mut self, interval: Duration) -> Self {
        self.stream_interval = interval;
        self
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// =============================================================================
// ServerMetrics
// =============================================================================

/// Server-side metrics.
pub struct ServerMetrics {
    /// Score lookups served (plain and streamed).
    pub score_reads: AtomicU64,
    /// Open SSE streams.
    pub stream_connections: AtomicU64,
}

impl ServerMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self {
            score_reads: AtomicU64::new(0),
            stream_connections: AtomicU64::new(0),
        }
    }

    pub fn record_read(&self) {
        self.score_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment SSE connection count.
    pub fn stream_connect(&self) {
        self.stream_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement SSE connection count.
    pub fn stream_disconnect(&self) {
        self.stream_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn reads(&self) -> u64 {
        self.score_reads.load(Ordering::Relaxed)
    }

    /// Get SSE connection count.
    pub fn stream_count(&self) -> u64 {
        self.stream_connections.load(Ordering::Relaxed)
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
