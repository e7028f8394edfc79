//! Domain layer: rate value types, request validation, and the live
//! connection set.
//!
//! This module contains the relay's core model: exchange-rate entries and
//! their wire shape, validated day-count requests, connection identity,
//! the registry of open connections, and the broadcaster that fans chat
//! messages out to them.

pub mod broadcaster;
pub mod client_connection;
pub mod connection_id;
pub mod connection_registry;
pub mod exchange_rate;
pub mod rate_request;

pub use broadcaster::{BroadcastReport, Broadcaster};
pub use client_connection::ClientConnection;
pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionRegistry, Registration};
pub use exchange_rate::{
    Currency, CurrencyQuote, ExchangeRate, RateQuote, RateTable, format_date, parse_date,
};
pub use rate_request::{BATCH_MAX_DAYS, LookupMode, RateRequest};
