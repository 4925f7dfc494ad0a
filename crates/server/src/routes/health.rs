//! Health check endpoint.
//!
//! # Endpoints
//!
//! - `GET /health` - Liveness probe (always 200 if server is up). Reports
//!   `"degraded"` once the pipeline has stopped persisting actions.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::ServerState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"healthy"`, or `"degraded"` after a pipeline failure.
    pub status: &'static str,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Games currently held in the cache.
    pub live_games: usize,
    /// Actions applied by the pipeline so far.
    pub actions_processed: u64,
    /// Actions acknowledged by the sink so far.
    pub actions_persisted: u64,
    /// Open SSE streams.
    pub stream_connections: u64,
    /// The pipeline stopped on a sink error; scores may no longer advance.
    pub pipeline_failed: bool,
}

/// Liveness probe: `GET /health`
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let pipeline_failed = state.pipeline.failed();
    Json(HealthResponse {
        status: if pipeline_failed { "degraded" } else { "healthy" },
        uptime_secs: state.uptime_secs(),
        live_games: state.cache.len(),
        actions_processed: state.pipeline.received(),
        actions_persisted: state.pipeline.persisted(),
        stream_connections: state.metrics.stream_count(),
        pipeline_failed,
    })
}
