//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: Liveness endpoint with counters
//! - [`games`]: Game list and score snapshots
//! - [`stream`]: Server-Sent Events score stream

pub mod games;
pub mod health;
pub mod stream;
