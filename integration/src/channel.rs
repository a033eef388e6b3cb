// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! A thin `Tx` abstraction over [`tokio::sync::mpsc`], so producers (adapters, detectors,
//! orchestrators) don't need to know whether the consumer dropped the receiver - sends
//! are logged and swallowed rather than propagated as fatal errors.

use tokio::sync::mpsc;
use tracing::error;

/// Send-only view of an unbounded channel that logs (rather than panics or propagates)
/// when the receiver has been dropped.
#[derive(Debug, Clone)]
pub struct UnboundedTx<T> {
    tx: mpsc::UnboundedSender<T>,
    label: &'static str,
}

impl<T> UnboundedTx<T> {
    pub fn new(tx: mpsc::UnboundedSender<T>, label: &'static str) -> Self {
        Self { tx, label }
    }

    /// Sends `item`, logging and dropping it if the receiver is gone.
    pub fn send(&self, item: T) {
        if self.tx.send(item).is_err() {
            error!(channel = self.label, "receiver dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_succeeds_while_receiver_alive() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tx = UnboundedTx::new(tx, "test");
        tx.send(42);
        assert_eq!(rx.try_recv().unwrap(), 42);
    }

    #[test]
    fn send_after_drop_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx = UnboundedTx::new(tx, "test");
        drop(rx);
        tx.send(1);
    }
}
