//! Per-connection control loop.
//!
//! A session registers its connection, processes inbound frames strictly
//! in arrival order, and deregisters when it ends. Deregistration is tied
//! to the [`crate::domain::Registration`] guard, so it also happens when
//! the task is cancelled or panics.

use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};

use super::router::CommandRouter;
use crate::domain::{ClientConnection, ConnectionRegistry};
use crate::shutdown::ShutdownListener;

/// Why a session loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer sent a close frame or the stream ended.
    Closed,
    /// Reading from or replying to the peer failed.
    Failed,
    /// The server is shutting down.
    Shutdown,
}

/// Runs the session for `connection` until the peer leaves, the
/// transport fails, or shutdown is signalled.
///
/// `inbound` is the read half of the transport. Text frames go to
/// `router`; binary, ping and pong frames are ignored.
pub async fn run_session<S>(
    connection: Arc<dyn ClientConnection>,
    mut inbound: S,
    router: &CommandRouter,
    registry: &Arc<ConnectionRegistry>,
    mut shutdown: ShutdownListener,
) -> SessionEnd
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let registration = registry.register(Arc::clone(&connection));
    let conn_id = registration.id();
    tracing::info!(%conn_id, active = registry.len(), "client connected");

    let end = loop {
        let frame = tokio::select! {
            () = shutdown.wait() => {
                if let Err(err) = connection.close().await {
                    tracing::debug!(%conn_id, error = %err, "close frame not delivered");
                }
                break SessionEnd::Shutdown;
            }
            frame = inbound.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                if let Err(err) = router.route(connection.as_ref(), text.as_str()).await {
                    tracing::warn!(%conn_id, error = %err, "reply failed, ending session");
                    break SessionEnd::Failed;
                }
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(
                    %conn_id,
                    code = frame.as_ref().map(|f| f.code),
                    "connection closed gracefully"
                );
                break SessionEnd::Closed;
            }
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                tracing::warn!(%conn_id, error = %err, "connection transport error");
                break SessionEnd::Failed;
            }
            None => {
                tracing::info!(%conn_id, "connection stream ended");
                break SessionEnd::Closed;
            }
        }
    };

    drop(registration);
    tracing::debug!(%conn_id, ?end, active = registry.len(), "session finished");
    end
}
