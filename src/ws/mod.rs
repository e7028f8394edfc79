//! WebSocket layer: live rate commands and chat relay.
//!
//! The WebSocket endpoint at `/ws` speaks a plain-text protocol:
//! `exchange <days>` returns a private rate table, anything else is
//! broadcast to every connected client.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod router;
pub mod session;

pub use router::{CommandRouter, Dispatch};
pub use session::{SessionEnd, run_session};
