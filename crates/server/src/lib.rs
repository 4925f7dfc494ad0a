//! Server crate: Axum-based read surface for live scores.
//!
//! Readers query the same `ScoreCache` the pipeline writes to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐         ┌────────────────────────┐
//! │  Pipeline Thread        │         │  Axum Server (tokio)   │
//! │  (sync loop)            │         │                        │
//! │                         │         │  GET /api/games/..     │
//! │  cache.update()  ───────┼──Arc───>│  cache.get_score()     │
//! │  sink.send()            │         │  SSE score stream      │
//! └─────────────────────────┘         └────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Routes and handlers declared via Axum's type-safe routing
//! - **Modular**: Each feature (health, games, stream) in separate module
//! - **SoC**: The pipeline owns writes; the server only reads
//!
//! # Modules
//!
//! - [`app`]: Axum application builder and router setup
//! - [`state`]: Shared server state (cache, pipeline stats, metrics)
//! - [`error`]: Unified error handling with HTTP status codes
//! - [`routes`]: HTTP route handlers (health, games, stream)

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use app::{ServerConfig, create_app};
pub use error::AppError;
pub use state::{ServerMetrics, ServerState};
