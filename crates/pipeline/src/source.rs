//! Action sources.
//!
//! A source yields actions in delivery order and returns `None` once it is
//! closed, exhausted, or asked to stop.

use crossbeam_channel::{Receiver, select};
use types::Action;

/// Producer of actions for the pipeline.
pub trait ActionSource {
    /// Next action, blocking until one is available. `None` ends the run.
    fn next_action(&mut self) -> Option<Action>;
}

impl<S: ActionSource + ?Sized> ActionSource for Box<S> {
    fn next_action(&mut self) -> Option<Action> {
        (**self).next_action()
    }
}

// =============================================================================
// ChannelSource
// =============================================================================

/// Source fed through a crossbeam channel.
///
/// Ends when every sender is dropped, or when the optional shutdown channel
/// receives a message or loses its sender.
pub struct ChannelSource {
    actions: Receiver<Action>,
    shutdown: Option<Receiver<()>>,
}

impl ChannelSource {
    /// Source reading from `actions`.
    pub fn new(actions: Receiver<Action>) -> Self {
        Self {
            actions,
            shutdown: None,
        }
    }

    /// Also stop when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: Receiver<()>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }
}

impl ActionSource for ChannelSource {
    fn next_action(&mut self) -> Option<Action> {
        match &self.shutdown {
            None => self.actions.recv().ok(),
            Some(shutdown) => select! {
                recv(self.actions) -> msg => msg.ok(),
                recv(shutdown) -> _ => None,
            },
        }
    }
}

// =============================================================================
// IterSource
// =============================================================================

/// Source over any iterator of actions (recorded games, tests).
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Action>,
{
    pub fn new(actions: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: actions.into_iter(),
        }
    }
}

impl<I> ActionSource for IterSource<I>
where
    I: Iterator<Item = Action>,
{
    fn next_action(&mut self) -> Option<Action> {
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn action(minute: i32) -> Action {
        Action::new("Boston_Knicks", "Boston", "p", "2pts try", minute)
    }

    #[test]
    fn test_channel_source_preserves_order_and_ends_on_close() {
        let (tx, rx) = unbounded();
        for minute in 0..3 {
            tx.send(action(minute)).unwrap();
        }
        drop(tx);

        let mut source = ChannelSource::new(rx);
        let minutes: Vec<i32> = std::iter::from_fn(|| source.next_action())
            .map(|a| a.minute)
            .collect();
        assert_eq!(minutes, vec![0, 1, 2]);
    }

    #[test]
    fn test_channel_source_stops_on_shutdown() {
        let (_tx, rx) = unbounded::<Action>();
        let (stop_tx, stop_rx) = unbounded();
        let mut source = ChannelSource::new(rx).with_shutdown(stop_rx);

        stop_tx.send(()).unwrap();
        assert!(source.next_action().is_none());
    }

    #[test]
    fn test_channel_source_stops_when_shutdown_sender_dropped() {
        let (_tx, rx) = unbounded::<Action>();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let mut source = ChannelSource::new(rx).with_shutdown(stop_rx);

        drop(stop_tx);
        assert!(source.next_action().is_none());
    }

    #[test]
    fn test_iter_source() {
        let mut source = IterSource::new(vec![action(1), action(2)]);
        assert_eq!(source.next_action().map(|a| a.minute), Some(1));
        assert_eq!(source.next_action().map(|a| a.minute), Some(2));
        assert!(source.next_action().is_none());
    }
}
