//! Fan-out of chat messages to every registered connection.
//!
//! [`Broadcaster`] snapshots the [`ConnectionRegistry`] and sends to each
//! member from its own task, so one slow or broken client never delays
//! the others. A failed send is logged and counted but never removes the
//! member; its own session notices the broken transport and deregisters.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use super::ConnectionRegistry;

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members in the snapshot, i.e. sends attempted.
    pub attempted: usize,
    /// Sends that completed successfully.
    pub delivered: usize,
    /// Sends that failed or timed out.
    pub failed: usize,
}

/// Sends a text message to every connection in the registry.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    send_timeout: Duration,
}

impl Broadcaster {
    /// Creates a broadcaster over `registry`; each send is bounded by
    /// `send_timeout`.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>, send_timeout: Duration) -> Self {
        Self {
            registry,
            send_timeout,
        }
    }

    /// Returns the registry this broadcaster reads from.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Sends `message` to every member of a registry snapshot.
    ///
    /// Completes once every send has finished, failed, or timed out.
    /// Connections that join while the broadcast is in flight may miss it.
    pub async fn broadcast(&self, message: &str) -> BroadcastReport {
        let recipients = self.registry.snapshot();
        let payload: Arc<str> = Arc::from(message);
        let send_timeout = self.send_timeout;

        let mut sends = JoinSet::new();
        for conn in recipients {
            let payload = Arc::clone(&payload);
            sends.spawn(async move {
                let conn_id = conn.id();
                match tokio::time::timeout(send_timeout, conn.send_text(&payload)).await {
                    Ok(Ok(())) => true,
                    Ok(Err(err)) => {
                        tracing::warn!(%conn_id, error = %err, "broadcast send failed");
                        false
                    }
                    Err(_) => {
                        tracing::warn!(
                            %conn_id,
                            timeout_ms = send_timeout.as_millis(),
                            "broadcast send timed out"
                        );
                        false
                    }
                }
            });
        }

        let mut report = BroadcastReport {
            attempted: sends.len(),
            ..BroadcastReport::default()
        };
        while let Some(joined) = sends.join_next().await {
            match joined {
                Ok(true) => report.delivered += 1,
                Ok(false) => report.failed += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "broadcast send task aborted");
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            recipients = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast complete"
        );
        report
    }
}
