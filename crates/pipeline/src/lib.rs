//! Ingest pipeline: action source → score cache → persistence sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  next_action()  ┌────────────┐  update()  ┌────────────┐
//! │ ActionSource │ ──────────────▶ │  Pipeline  │ ─────────▶ │ ScoreCache │
//! └──────────────┘                 │ (one loop) │            └────────────┘
//!                                  │            │  send() + retry
//!                                  │            │ ─────────▶ PersistenceSink
//!                                  └────────────┘
//! ```
//!
//! The cache is always updated before the sink and is never rolled back.
//! If the sink fails for good, the live score is ahead of what was
//! persisted until the process restarts.
//!
//! # Modules
//!
//! - [`source`]: where actions come from
//! - [`sink`]: where actions are persisted, and how sinks fail
//! - [`retry`]: backoff policy for transient sink failures
//! - [`coordinator`]: the loop tying it together

pub mod coordinator;
pub mod retry;
pub mod sink;
pub mod source;

pub use coordinator::{Pipeline, PipelineError, PipelineReport, PipelineStats};
pub use retry::RetryPolicy;
pub use sink::{Ack, NullSink, PersistenceSink, SinkError};
pub use source::{ActionSource, ChannelSource, IterSource};
