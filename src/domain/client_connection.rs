//! Transport-agnostic handle to one connected client.

use std::fmt;

use async_trait::async_trait;

use super::ConnectionId;
use crate::error::RelayError;

/// Outbound half of a live client connection.
///
/// The session task owns the connection; the
/// [`super::ConnectionRegistry`] only holds a shared reference so the
/// broadcaster can reach it. Once closed, every send fails with
/// [`RelayError::Connection`].
#[async_trait]
pub trait ClientConnection: Send + Sync + fmt::Debug {
    /// Stable identity of this connection.
    fn id(&self) -> ConnectionId;

    /// Sends one text frame to the client.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Connection`] if the transport is closed or
    /// the write fails.
    async fn send_text(&self, text: &str) -> Result<(), RelayError>;

    /// Sends a close frame and stops accepting further sends.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Connection`] if the close frame could not be
    /// written.
    async fn close(&self) -> Result<(), RelayError>;
}
