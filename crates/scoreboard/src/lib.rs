//! Live score cache.
//!
//! Turns a stream of [`types::Action`] events into per-game running scores
//! that any number of readers can poll, and forgets games nobody has touched
//! for a while.
//!
//! # Architecture
//!
//! ```text
//!  Pipeline thread(s)          ScoreCache                 HTTP handlers
//!        │                 ┌──────────────────┐                │
//!        │── update() ────▶│ Mutex<HashMap<   │◀── get_score() ┤
//!        │                 │   game, record>> │                │
//!        │                 └────────▲─────────┘                │
//!        │                          │ evict_expired()          │
//!        │                     Sweeper (tokio task)            │
//! ```
//!
//! # Modules
//!
//! - [`classify`]: description → points, the single scoring table
//! - [`cache`]: [`ScoreCache`] and its configuration
//! - [`sweeper`]: periodic, stoppable eviction task

pub mod cache;
pub mod classify;
pub mod sweeper;

pub use cache::{CacheConfig, MIN_SWEEP_INTERVAL, ScoreCache, SweepReport, TouchPolicy};
pub use classify::{classify, points};
pub use sweeper::{Sweeper, SweeperHandle};
