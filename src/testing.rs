//! Test doubles for connections and rate sources shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    ClientConnection, ConnectionId, CurrencyQuote, ExchangeRate, RateQuote, RateRequest, RateTable,
};
use crate::error::RelayError;
use crate::service::RateLookup;

/// How a [`MockConnection`] reacts to sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Every send succeeds.
    Healthy,
    /// Every send fails with a connection error.
    Failing,
    /// Every send hangs for the given duration before succeeding.
    Stalled(Duration),
}

/// Records every frame sent to it.
#[derive(Debug)]
pub struct MockConnection {
    id: ConnectionId,
    behavior: Behavior,
    attempts: AtomicUsize,
    sent: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockConnection {
    /// A connection whose sends behave as `behavior`.
    pub fn with_behavior(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::new(),
            behavior,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// A connection whose sends always succeed.
    pub fn healthy() -> Arc<Self> {
        Self::with_behavior(Behavior::Healthy)
    }

    /// A connection whose sends always fail.
    pub fn failing() -> Arc<Self> {
        Self::with_behavior(Behavior::Failing)
    }

    /// Frames delivered so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Number of send attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Whether [`ClientConnection::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientConnection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send_text(&self, text: &str) -> Result<(), RelayError> {
        let _ = self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Healthy => {}
            Behavior::Failing => {
                return Err(RelayError::Connection("mock transport closed".to_string()));
            }
            Behavior::Stalled(delay) => tokio::time::sleep(delay).await,
        }
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), RelayError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Rate source answering every request from a fixed calendar.
#[derive(Debug, Default)]
pub struct CannedRates {
    lookups: AtomicUsize,
    fail_with: Option<String>,
}

impl CannedRates {
    /// A source that always succeeds.
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A source whose lookups fail with an internal error carrying `message`.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            lookups: AtomicUsize::new(0),
            fail_with: Some(message.to_string()),
        })
    }

    /// Number of lookups served.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// The table every successful lookup returns for `request`.
    pub fn table_for(request: &RateRequest) -> RateTable {
        let quote = CurrencyQuote::Available(RateQuote {
            sale: 41.5,
            purchase: 41.0,
        });
        request
            .dates()
            .into_iter()
            .map(|date| (date, ExchangeRate::new(CurrencyQuote::Unavailable, quote)))
            .collect()
    }
}

#[async_trait]
impl RateLookup for CannedRates {
    async fn lookup(&self, request: &RateRequest) -> Result<RateTable, RelayError> {
        let _ = self.lookups.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(RelayError::Internal(message.clone())),
            None => Ok(Self::table_for(request)),
        }
    }
}
