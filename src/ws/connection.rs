//! WebSocket-backed [`ClientConnection`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::SinkExt;
use futures_util::stream::SplitSink;
use tokio::sync::Mutex;

use crate::domain::{ClientConnection, ConnectionId};
use crate::error::RelayError;

/// Write half of an upgraded WebSocket.
///
/// Writes are serialized per connection by an async mutex, so a private
/// reply and a broadcast to the same client never interleave frames. The
/// read half stays with the session loop.
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, Message>>,
    closed: AtomicBool,
}

impl WsConnection {
    /// Wraps the write half of a freshly upgraded socket.
    #[must_use]
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            id: ConnectionId::new(),
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
        }
    }
}

impl fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsConnection")
            .field("id", &self.id)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ClientConnection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send_text(&self, text: &str) -> Result<(), RelayError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RelayError::Connection(format!("connection {} is closed", self.id)));
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::text(text)).await.map_err(|err| {
            self.closed.store(true, Ordering::Release);
            RelayError::Connection(err.to_string())
        })
    }

    async fn close(&self) -> Result<(), RelayError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::Close(None))
            .await
            .map_err(|err| RelayError::Connection(err.to_string()))
    }
}
