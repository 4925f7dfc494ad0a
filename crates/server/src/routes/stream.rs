//! Server-Sent Events score stream.
//!
//! # Endpoints
//!
//! - `GET /api/games/{game}/stream?interval_ms=N` - one `score` event per
//!   interval (server default when omitted)
//!
//! # Protocol
//!
//! Each event carries the same JSON snapshot as the score endpoint. The first
//! event is sent immediately. Every poll counts as a read, so an open stream
//! keeps its game alive under the default touch policy.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt, stream};
use scoreboard::ScoreCache;
use serde::Deserialize;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use types::ScoreRecord;

use crate::error::{AppError, AppResult};
use crate::state::{ServerMetrics, ServerState};

/// Query parameters for the stream endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    /// Milliseconds between snapshots.
    pub interval_ms: Option<u64>,
}

/// Score stream: `GET /api/games/{game}/stream`
pub async fn stream_score(
    State(state): State<ServerState>,
    Path(game): Path<String>,
    Query(query): Query<StreamQuery>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let period = match query.interval_ms {
        Some(0) => return Err(AppError::BadRequest("interval_ms must be positive".into())),
        Some(ms) => Duration::from_millis(ms),
        None => state.stream_interval,
    };

    debug!(%game, ?period, "SSE client connected");
    let guard = ConnectionGuard::new(Arc::clone(&state.metrics));

    // The guard lives inside the stream and drops with it
    let events = score_snapshots(Arc::clone(&state.cache), game, period).map(move |score| {
        guard.metrics.record_read();
        Event::default().event("score").json_data(&score)
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Snapshots of one game, the first immediately and then one per `period`.
pub fn score_snapshots(
    cache: Arc<ScoreCache>,
    game: String,
    period: Duration,
) -> impl Stream<Item = ScoreRecord> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    stream::unfold((cache, game, ticker), |(cache, game, mut ticker)| async move {
        ticker.tick().await;
        let score = cache.get_score(&game);
        Some((score, (cache, game, ticker)))
    })
}

/// Keeps the open-stream gauge accurate.
struct ConnectionGuard {
    metrics: Arc<ServerMetrics>,
}

impl ConnectionGuard {
    fn new(metrics: Arc<ServerMetrics>) -> Self {
        metrics.stream_connect();
        Self { metrics }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.metrics.stream_disconnect();
        debug!("SSE client disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::PipelineStats;
    use types::Action;

    fn state() -> ServerState {
        ServerState::new(
            Arc::new(ScoreCache::default()),
            Arc::new(PipelineStats::new()),
        )
    }

    #[tokio::test]
    async fn test_snapshots_follow_updates() {
        let cache = Arc::new(ScoreCache::default());
        cache.update(&Action::new("Boston_Knicks", "Boston", "p", "2pts succes", 1));

        let snapshots = score_snapshots(
            Arc::clone(&cache),
            "Boston_Knicks".into(),
            Duration::from_millis(10),
        );
        futures::pin_mut!(snapshots);

        let first = snapshots.next().await.unwrap();
        assert_eq!(first.score_a, 2);

        cache.update(&Action::new("Boston_Knicks", "Knicks", "p", "3pts succes", 2));
        let second = snapshots.next().await.unwrap();
        assert_eq!((second.score_a, second.score_b), (2, 3));
    }

    #[tokio::test]
    async fn test_snapshots_of_unknown_game_are_zero() {
        let cache = Arc::new(ScoreCache::default());
        let snapshots = score_snapshots(
            Arc::clone(&cache),
            "Nobody_Here".into(),
            Duration::from_millis(10),
        );
        futures::pin_mut!(snapshots);

        assert_eq!(snapshots.next().await.unwrap(), ScoreRecord::empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let result = stream_score(
            State(state()),
            Path("Boston_Knicks".into()),
            Query(StreamQuery {
                interval_ms: Some(0),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_connection_gauge() {
        let state = state();
        let sse = stream_score(
            State(state.clone()),
            Path("Boston_Knicks".into()),
            Query(StreamQuery::default()),
        )
        .await;
        assert!(sse.is_ok());
        assert_eq!(state.metrics.stream_count(), 1);

        drop(sse);
        assert_eq!(state.metrics.stream_count(), 0);
    }
}
