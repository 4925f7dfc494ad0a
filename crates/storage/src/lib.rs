//! Storage layer for live scores
//!
//! **Philosophy:** Declarative, Modular, SoC
//! - Declarative: Schema defined upfront, behavior driven by config
//! - Modular: Plugs into the pipeline through the `PersistenceSink` trait
//! - SoC: This crate ONLY handles persistence, no scoring logic
//!
//! **Scope:**
//! - Action log (append-only, one table for every game)
//! - Player statistics (counters derived from each action's kind)
//! - Read queries for the `stats` command and tests

mod error;
mod schema;
mod sink;
mod stats;

pub use error::StorageError;
pub use schema::{StorageConfig, init_schema};
pub use sink::SqliteSink;
pub use stats::PlayerStatistics;
