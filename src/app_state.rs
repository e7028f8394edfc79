//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::{Broadcaster, ConnectionRegistry};
use crate::service::RateLookup;
use crate::shutdown::Shutdown;
use crate::ws::CommandRouter;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Rate source for the HTTP endpoint and the `exchange` command.
    pub rates: Arc<dyn RateLookup>,
    /// Live connection set.
    pub registry: Arc<ConnectionRegistry>,
    /// Per-message dispatcher for WebSocket sessions.
    pub router: CommandRouter,
    /// Process-wide stop signal.
    pub shutdown: Shutdown,
}

impl AppState {
    /// Wires the registry, broadcaster and router around `rates`.
    #[must_use]
    pub fn new(rates: Arc<dyn RateLookup>, config: &RelayConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry), config.broadcast_send_timeout);
        let router = CommandRouter::new(Arc::clone(&rates), broadcaster, config.live_max_days);
        Self {
            rates,
            registry,
            router,
            shutdown: Shutdown::new(),
        }
    }
}
