//! Persistence sinks.

use thiserror::Error;
use types::Action;

/// Acknowledgement from a sink after an action was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack {
    /// Row id or sequence number assigned by the sink, when it has one.
    pub id: Option<i64>,
}

impl Ack {
    pub fn with_id(id: i64) -> Self {
        Self { id: Some(id) }
    }
}

/// Sink failure, split by whether a retry can help.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Busy, locked, timed out: worth retrying.
    #[error("transient sink error: {0}")]
    Transient(String),

    /// Schema, constraint, corruption: retrying will not help.
    #[error("fatal sink error: {0}")]
    Fatal(String),
}

impl SinkError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Transient(_))
    }
}

/// Durable store for the action log and derived per-player statistics.
///
/// Called from the pipeline thread only, one action at a time, so
/// implementations may keep mutable state without locking.
pub trait PersistenceSink {
    /// Short name for logs.
    fn name(&self) -> &str {
        "sink"
    }

    /// Store one action. Must be all-or-nothing per call.
    fn send(&mut self, action: &Action) -> Result<Ack, SinkError>;
}

impl<S: PersistenceSink + ?Sized> PersistenceSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&mut self, action: &Action) -> Result<Ack, SinkError> {
        (**self).send(action)
    }
}

/// Sink that accepts everything and stores nothing.
#[derive(Debug, Default)]
pub struct NullSink {
    sent: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions accepted so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl PersistenceSink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    fn send(&mut self, _action: &Action) -> Result<Ack, SinkError> {
        self.sent += 1;
        Ok(Ack::with_id(self.sent as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_split() {
        assert!(SinkError::Transient("database is locked".into()).is_retryable());
        assert!(!SinkError::Fatal("no such table".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = SinkError::Fatal("no such table: actions".into());
        assert_eq!(err.to_string(), "fatal sink error: no such table: actions");
    }

    #[test]
    fn test_null_sink_through_box() {
        let mut sink: Box<dyn PersistenceSink> = Box::new(NullSink::new());
        let action = Action::new("Boston_Knicks", "Boston", "p", "foul", 1);
        assert_eq!(sink.send(&action), Ok(Ack::with_id(1)));
        assert_eq!(sink.send(&action), Ok(Ack::with_id(2)));
        assert_eq!(sink.name(), "null");
    }
}
