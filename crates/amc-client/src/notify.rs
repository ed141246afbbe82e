//! Operator notices (toasts) broadcast to whichever view is listening.

use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// The action completed.
    Success,
    /// The action failed.
    Error,
}

/// One operator-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message shown to the operator.
    pub message: String,
}

/// Fan-out of notices. Publishing without subscribers is not an error.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Empty notifier.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Receive notices published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Publish a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Success, message.into());
    }

    /// Publish an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Error, message.into());
    }

    fn publish(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Success => tracing::info!(%message, "notice"),
            NoticeLevel::Error => tracing::warn!(%message, "notice"),
        }
        // Nobody listening is fine.
        let _ = self.tx.send(Notice { level, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notices_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        notifier.success("Client created successfully!");
        notifier.error("Failed to delete client");

        let first = rx.recv().await.expect("first notice");
        assert_eq!(first.level, NoticeLevel::Success);
        assert_eq!(first.message, "Client created successfully!");
        let second = rx.recv().await.expect("second notice");
        assert_eq!(second.level, NoticeLevel::Error);
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let notifier = Notifier::default();
        notifier.success("nobody hears this");
    }
}
