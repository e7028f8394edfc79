//! Service layer: the rate provider client.
//!
//! [`RateLookupClient`] fetches a window of dates from the remote
//! provider in parallel. Callers depend on the [`RateLookup`] trait.

pub mod provider;
pub mod rate_client;

pub use rate_client::{DEFAULT_API_URL, RateLookup, RateLookupClient};
