//! Per-message dispatch: private rate replies versus chat broadcast.

use std::sync::Arc;

use super::messages::{Command, ErrorReply};
use crate::domain::{BroadcastReport, Broadcaster, ClientConnection, RateRequest};
use crate::error::RelayError;
use crate::service::RateLookup;

/// What the router did with one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A reply was sent to the originating connection only.
    Replied,
    /// The message was relayed to every registered connection.
    Broadcast(BroadcastReport),
}

/// Routes inbound text either to the rate lookup or to the broadcaster.
///
/// Stateless across messages; each call produces exactly one private
/// reply or exactly one broadcast, never both.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    rates: Arc<dyn RateLookup>,
    broadcaster: Broadcaster,
    live_max_days: u32,
}

impl CommandRouter {
    /// Creates a router. `live_max_days` caps the `exchange` day count.
    #[must_use]
    pub fn new(rates: Arc<dyn RateLookup>, broadcaster: Broadcaster, live_max_days: u32) -> Self {
        Self {
            rates,
            broadcaster,
            live_max_days,
        }
    }

    /// Returns the broadcaster used for chat messages.
    #[must_use]
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Handles one text frame received from `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Connection`] if the private reply cannot be
    /// delivered to `origin`. Broadcast failures are never errors here.
    pub async fn route(
        &self,
        origin: &dyn ClientConnection,
        text: &str,
    ) -> Result<Dispatch, RelayError> {
        match Command::parse(text) {
            Command::Chat(message) => {
                let report = self.broadcaster.broadcast(message).await;
                Ok(Dispatch::Broadcast(report))
            }
            Command::Malformed => {
                tracing::debug!(conn_id = %origin.id(), "malformed exchange command");
                self.reply(origin, &ErrorReply::usage().to_json()?).await
            }
            Command::Exchange(days) => {
                let reply = self.exchange_reply(origin, days).await?;
                self.reply(origin, &reply).await
            }
        }
    }

    async fn exchange_reply(
        &self,
        origin: &dyn ClientConnection,
        days: i64,
    ) -> Result<String, RelayError> {
        let request = match RateRequest::live(days, self.live_max_days) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(conn_id = %origin.id(), days, error = %err, "rejected exchange command");
                return Ok(ErrorReply::usage().to_json()?);
            }
        };

        match self.rates.lookup(&request).await {
            Ok(table) => {
                tracing::info!(conn_id = %origin.id(), days, "serving exchange rates");
                Ok(serde_json::to_string(&table)?)
            }
            Err(err) => {
                tracing::warn!(conn_id = %origin.id(), days, error = %err, "exchange lookup failed");
                Ok(ErrorReply::new(&err.to_string()).to_json()?)
            }
        }
    }

    async fn reply(
        &self,
        origin: &dyn ClientConnection,
        payload: &str,
    ) -> Result<Dispatch, RelayError> {
        origin.send_text(payload).await?;
        Ok(Dispatch::Replied)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::{ConnectionRegistry, RateTable};
    use crate::testing::{CannedRates, MockConnection};

    const USAGE_JSON: &str = r#"{"error":"Usage: exchange <days>"}"#;

    fn router_with(rates: Arc<CannedRates>) -> CommandRouter {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(registry, Duration::from_millis(200));
        CommandRouter::new(rates, broadcaster, 10)
    }

    #[tokio::test]
    async fn exchange_replies_privately() {
        let rates = CannedRates::ok();
        let router = router_with(Arc::clone(&rates));
        let origin = MockConnection::healthy();
        let peer = MockConnection::healthy();
        let _g1 = router.broadcaster().registry().register(Arc::<MockConnection>::clone(&origin));
        let _g2 = router.broadcaster().registry().register(Arc::<MockConnection>::clone(&peer));

        let dispatch = router.route(origin.as_ref(), "exchange 3").await;

        assert!(matches!(dispatch, Ok(Dispatch::Replied)));
        assert_eq!(rates.lookups(), 1);
        assert!(peer.sent().is_empty());
        let sent = origin.sent();
        assert_eq!(sent.len(), 1);
        let Some(reply) = sent.first() else {
            panic!("one reply");
        };
        let Ok(table) = serde_json::from_str::<RateTable>(reply) else {
            panic!("reply should be a rate table: {reply}");
        };
        assert_eq!(table.len(), 3);
    }

    #[tokio::test]
    async fn chat_is_broadcast_without_private_reply() {
        let rates = CannedRates::ok();
        let router = router_with(Arc::clone(&rates));
        let origin = MockConnection::healthy();
        let peers: Vec<_> = (0..2).map(|_| MockConnection::healthy()).collect();
        let registry = router.broadcaster().registry();
        let mut guards = vec![registry.register(Arc::<MockConnection>::clone(&origin))];
        for peer in &peers {
            guards.push(registry.register(Arc::<MockConnection>::clone(peer)));
        }

        let dispatch = router.route(origin.as_ref(), "hello, room").await;

        let Ok(Dispatch::Broadcast(report)) = dispatch else {
            panic!("expected broadcast, got {dispatch:?}");
        };
        assert_eq!(report.attempted, 3);
        assert_eq!(rates.lookups(), 0);
        // the sender receives the broadcast copy and nothing else
        assert_eq!(origin.sent(), vec!["hello, room".to_string()]);
        for peer in &peers {
            assert_eq!(peer.sent(), vec!["hello, room".to_string()]);
        }
    }

    #[tokio::test]
    async fn malformed_commands_get_usage_without_lookup() {
        for text in ["exchange", "exchange abc", "exchange 0", "exchange -1", "exchange 11"] {
            let rates = CannedRates::ok();
            let router = router_with(Arc::clone(&rates));
            let origin = MockConnection::healthy();
            let peer = MockConnection::healthy();
            let _g = router.broadcaster().registry().register(Arc::<MockConnection>::clone(&peer));

            let dispatch = router.route(origin.as_ref(), text).await;

            assert!(matches!(dispatch, Ok(Dispatch::Replied)), "{text}");
            assert_eq!(origin.sent(), vec![USAGE_JSON.to_string()], "{text}");
            assert_eq!(rates.lookups(), 0, "{text}");
            assert!(peer.sent().is_empty(), "{text}");
        }
    }

    #[tokio::test]
    async fn lookup_failure_replies_with_error() {
        let router = router_with(CannedRates::failing("provider offline"));
        let origin = MockConnection::healthy();

        let dispatch = router.route(origin.as_ref(), "exchange 2").await;

        assert!(matches!(dispatch, Ok(Dispatch::Replied)));
        let sent = origin.sent();
        let Some(reply) = sent.first() else {
            panic!("one reply");
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(reply) else {
            panic!("reply should be json");
        };
        let message = value.get("error").and_then(|v| v.as_str()).unwrap_or_default();
        assert!(message.contains("provider offline"));
    }

    #[tokio::test]
    async fn undeliverable_reply_is_a_connection_error() {
        let router = router_with(CannedRates::ok());
        let origin = MockConnection::failing();

        let dispatch = router.route(origin.as_ref(), "exchange").await;

        assert!(matches!(dispatch, Err(RelayError::Connection(_))));
    }
}
