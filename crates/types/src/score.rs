//! Per-game live score state.

use serde::{Deserialize, Serialize};
use std::time::Instant;

// =============================================================================
// GameTeams
// =============================================================================

/// The two participants encoded in a game poster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameTeams {
    pub team_a: String,
    pub team_b: String,
}

impl GameTeams {
    /// Split a game poster at the first `separator`.
    ///
    /// A poster without the separator yields the whole string as team A and
    /// an empty team B.
    pub fn parse(game_poster: &str, separator: char) -> Self {
        match game_poster.split_once(separator) {
            Some((a, b)) => Self {
                team_a: a.to_string(),
                team_b: b.to_string(),
            },
            None => Self {
                team_a: game_poster.to_string(),
                team_b: String::new(),
            },
        }
    }

    /// Whether both sides were found.
    pub fn is_complete(&self) -> bool {
        !self.team_a.is_empty() && !self.team_b.is_empty()
    }
}

// =============================================================================
// ScoreRecord
// =============================================================================

/// Which side of a game was credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// Live score of one game.
///
/// `team_a`/`team_b` are set once at creation. Scores only grow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub game_name: String,
    pub team_a: String,
    pub team_b: String,
    pub score_a: u32,
    pub score_b: u32,
    /// Last activity, used for expiry. `None` on the zero-valued record.
    #[serde(skip)]
    pub last_touched: Option<Instant>,
}

impl ScoreRecord {
    /// Fresh zero-score record for `game_poster`, touched at `now`.
    pub fn new(game_poster: &str, separator: char, now: Instant) -> Self {
        let GameTeams { team_a, team_b } = GameTeams::parse(game_poster, separator);
        Self {
            game_name: game_poster.to_string(),
            team_a,
            team_b,
            score_a: 0,
            score_b: 0,
            last_touched: Some(now),
        }
    }

    /// Zero-valued record returned for unknown games.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add `points` to the side `team` plays for.
    ///
    /// Only an exact match on `team_a` credits side A; every other team name
    /// credits side B.
    pub fn credit(&mut self, team: &str, points: u32) -> Side {
        if team == self.team_a {
            self.score_a = self.score_a.saturating_add(points);
            Side::A
        } else {
            self.score_b = self.score_b.saturating_add(points);
            Side::B
        }
    }

    /// Whether `team` is one of the two participants.
    pub fn involves(&self, team: &str) -> bool {
        team == self.team_a || team == self.team_b
    }

    /// Refresh the activity timestamp.
    pub fn touch(&mut self, now: Instant) {
        self.last_touched = Some(now);
    }
}
