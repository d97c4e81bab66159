//! Human-readable status feed from the pipeline to the UI.
//!
//! Every stage of a cycle reports a short message through a
//! [`StatusReporter`]; the UI drains the receiving end and appends each
//! message to its log pane. The channel is unbounded so reporting never
//! blocks pipeline work, and every message is mirrored to the log so
//! headless runs still show progress.

use tokio::sync::mpsc;

/// Cloneable sending half of the status feed.
#[derive(Clone)]
pub struct StatusReporter {
    tx: mpsc::UnboundedSender<String>,
}

impl StatusReporter {
    /// Create a reporter and the receiver the UI will drain.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit one status message.
    ///
    /// A closed receiver (UI shut down) is not an error; the message still
    /// reaches the log.
    pub fn report(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        let _ = self.tx.send(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn messages_arrive_in_order() {
        let (reporter, mut rx) = StatusReporter::channel();
        reporter.report("first");
        reporter.report("second");
        reporter.report("third");

        assert_eq!(rx.recv().await.unwrap(), "first");
        assert_eq!(rx.recv().await.unwrap(), "second");
        assert_eq!(rx.recv().await.unwrap(), "third");
    }

    #[tokio::test]
    async fn clones_share_one_channel() {
        let (reporter, mut rx) = StatusReporter::channel();
        let clone = reporter.clone();

        reporter.report("from original");
        clone.report("from clone");

        assert_eq!(rx.recv().await.unwrap(), "from original");
        assert_eq!(rx.recv().await.unwrap(), "from clone");
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (reporter, rx) = StatusReporter::channel();
        drop(rx);
        reporter.report("into the void");
    }
}
