//! Game endpoints.
//!
//! # Endpoints
//!
//! - `GET /api/games` - Sorted names of games held in the cache
//! - `GET /api/games/{game}/score` - Score snapshot
//!
//! Unknown games return the zero-valued snapshot with status 200. Reading a
//! score counts as activity and keeps the game alive.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use types::ScoreRecord;

use crate::state::ServerState;

/// Live game list.
#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<String>,
}

/// List live games: `GET /api/games`
///
/// Does not touch any record.
pub async fn list_games(State(state): State<ServerState>) -> Json<GamesResponse> {
    Json(GamesResponse {
        games: state.cache.games(),
    })
}

/// Score snapshot: `GET /api/games/{game}/score`
pub async fn get_score(
    State(state): State<ServerState>,
    Path(game): Path<String>,
) -> Json<ScoreRecord> {
    state.metrics.record_read();
    Json(state.cache.get_score(&game))
}
