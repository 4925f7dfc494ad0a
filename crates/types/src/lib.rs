//! Core types for the live score service.
//!
//! This crate provides the data shared by every other crate: the raw
//! [`Action`] events delivered by the ingest source, the [`ActionKind`]
//! vocabulary they are drawn from, and the per-game [`ScoreRecord`] kept by
//! the score cache.

mod action;
mod score;

pub use action::{Action, ActionKind};
pub use score::{GameTeams, ScoreRecord, Side};

// =============================================================================
// Constants
// =============================================================================

/// Separator between the two team names in a game poster (`"Boston_Knicks"`).
pub const DEFAULT_SEPARATOR: char = '_';

// =============================================================================
// Aliases
// =============================================================================

/// Game identifier encoding both participants, e.g. `"Boston_Knicks"`.
pub type GamePoster = String;

/// Game clock offset in minutes.
pub type Minute = i32;
