//! # exchange-relay
//!
//! EUR/USD exchange-rate lookups against the PrivatBank public API, plus a
//! WebSocket relay that broadcasts chat messages to every connected client
//! and answers `exchange <days>` commands privately.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket, CLI)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler + Sessions (ws/)
//!     │       │
//!     │       └── CommandRouter ──┬── Broadcaster ── ConnectionRegistry (domain/)
//!     │                           │
//!     └───────────────────────────┴── RateLookupClient (service/)
//!                                         │
//!                                         └── PrivatBank exchange_rates API
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod shutdown;
pub mod ws;

#[cfg(test)]
pub(crate) mod testing;
