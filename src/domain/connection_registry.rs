//! Set of currently open client connections.
//!
//! [`ConnectionRegistry`] is the only shared mutable state in the relay.
//! Membership changes go through [`ConnectionRegistry::register`] and
//! [`ConnectionRegistry::deregister`]; broadcasters read a snapshot so no
//! lock is held while sending.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use super::{ClientConnection, ConnectionId};

/// Registry of live connections keyed by [`ConnectionId`].
///
/// A connection is present exactly while its session loop runs. Only the
/// owning session removes it, by dropping its [`Registration`].
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<dyn ClientConnection>>>,
    active: watch::Sender<usize>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self {
            connections: RwLock::new(HashMap::new()),
            active,
        }
    }

    /// Adds `connection` and returns the guard that removes it again.
    ///
    /// Hold the guard for the lifetime of the session loop.
    #[must_use = "dropping the registration deregisters the connection"]
    pub fn register(self: &Arc<Self>, connection: Arc<dyn ClientConnection>) -> Registration {
        let id = connection.id();
        let count = {
            let mut map = self.connections.write();
            map.insert(id, connection);
            // published under the lock so counts are observed in mutation order
            self.active.send_replace(map.len());
            map.len()
        };
        tracing::debug!(conn_id = %id, active = count, "connection registered");
        Registration {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Removes the connection with `id`. A no-op if it is already absent.
    ///
    /// Returns `true` if the connection was present.
    pub fn deregister(&self, id: ConnectionId) -> bool {
        let (removed, count) = {
            let mut map = self.connections.write();
            let removed = map.remove(&id).is_some();
            if removed {
                self.active.send_replace(map.len());
            }
            (removed, map.len())
        };
        if removed {
            tracing::debug!(conn_id = %id, active = count, "connection deregistered");
        }
        removed
    }

    /// Returns a point-in-time copy of the current members.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn ClientConnection>> {
        self.connections.read().values().cloned().collect()
    }

    /// Returns `true` if a connection with `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().contains_key(&id)
    }

    /// Returns the number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    /// Returns `true` if no connection is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Resolves once every connection has deregistered.
    pub async fn wait_until_empty(&self) {
        let mut rx = self.active.subscribe();
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Membership guard returned by [`ConnectionRegistry::register`].
///
/// Dropping it deregisters the connection, on normal exit, error return,
/// panic unwind, or task cancellation alike.
#[derive(Debug)]
pub struct Registration {
    registry: Arc<ConnectionRegistry>,
    id: ConnectionId,
}

impl Registration {
    /// Identity of the registered connection.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::MockConnection;

    #[test]
    fn register_and_drop_guard() {
        let registry = Arc::new(ConnectionRegistry::new());
        let conn = MockConnection::healthy();
        let id = conn.id();

        let guard = registry.register(conn);
        assert_eq!(guard.id(), id);
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        drop(guard);
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn deregister_absent_is_noop() {
        let registry = Arc::new(ConnectionRegistry::new());
        assert!(!registry.deregister(ConnectionId::new()));

        let conn = MockConnection::healthy();
        let id = conn.id();
        let guard = registry.register(conn);
        assert!(registry.deregister(id));
        // guard drop after explicit removal must not panic
        drop(guard);
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_independent_of_later_changes() {
        let registry = Arc::new(ConnectionRegistry::new());
        let _a = registry.register(MockConnection::healthy());
        let b = registry.register(MockConnection::healthy());

        let snapshot = registry.snapshot();
        drop(b);
        let _c = registry.register(MockConnection::healthy());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn wait_until_empty_resolves_after_last_exit() {
        let registry = Arc::new(ConnectionRegistry::new());
        let guard = registry.register(MockConnection::healthy());

        let waiter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.wait_until_empty().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[test]
    fn active_count_tracks_membership_under_concurrent_churn() {
        let registry = Arc::new(ConnectionRegistry::new());
        let _held = registry.register(MockConnection::healthy());

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..2_000 {
                        let guard = registry.register(MockConnection::healthy());
                        drop(guard);
                    }
                })
            })
            .collect();
        for worker in workers {
            assert!(worker.join().is_ok());
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(*registry.active.borrow(), 1);
    }

    #[tokio::test]
    async fn wait_until_empty_returns_immediately_when_empty() {
        let registry = ConnectionRegistry::new();
        let waited = tokio::time::timeout(Duration::from_secs(1), registry.wait_until_empty()).await;
        assert!(waited.is_ok());
    }
}
