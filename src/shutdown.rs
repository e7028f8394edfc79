//! Process-wide stop signal.
//!
//! [`Shutdown`] wraps a [`tokio::sync::watch`] flag. The HTTP listener and
//! every session loop hold a [`ShutdownListener`]; triggering the signal
//! makes sessions close their sockets and run their deregister path.

use std::sync::Arc;

use tokio::sync::watch;

/// Trigger side of the stop signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Triggers the signal. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once [`Shutdown::trigger`] has been called.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Creates a listener that resolves when the signal fires.
    #[must_use]
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Waiting side of the stop signal.
#[derive(Debug)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered, or immediately if it
    /// already was. Also resolves if every [`Shutdown`] handle is dropped.
    pub async fn wait(&mut self) {
        let _ = self.receiver.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn listener_resolves_after_trigger() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        assert!(!shutdown.is_triggered());

        let pending = tokio::time::timeout(Duration::from_millis(20), listener.wait()).await;
        assert!(pending.is_err());

        shutdown.trigger();
        assert!(shutdown.is_triggered());
        let fired = tokio::time::timeout(Duration::from_secs(1), listener.wait()).await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn late_listener_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let mut listener = shutdown.subscribe();
        let fired = tokio::time::timeout(Duration::from_secs(1), listener.wait()).await;
        assert!(fired.is_ok());
    }
}
