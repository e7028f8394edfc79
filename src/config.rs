//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use crate::service::DEFAULT_API_URL;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR {value:?}: {source}")]
    ListenAddr {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// `RATES_API_URL` is not an absolute URL.
    #[error("invalid RATES_API_URL {value:?}: {reason}")]
    ApiUrl {
        /// Raw value.
        value: String,
        /// Parse failure.
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP/WebSocket server to.
    pub listen_addr: SocketAddr,

    /// Base URL of the rate provider (without `/exchange_rates`).
    pub rates_api_url: String,

    /// Timeout applied to every rate provider request.
    pub rates_request_timeout: Duration,

    /// Largest day count accepted by the `exchange` command.
    pub live_max_days: u32,

    /// Timeout applied to each individual broadcast send.
    pub broadcast_send_timeout: Duration,

    /// How long shutdown waits for sessions to deregister.
    pub shutdown_grace: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 6789)),
            rates_api_url: DEFAULT_API_URL.to_string(),
            rates_request_timeout: Duration::from_secs(10),
            live_max_days: 10,
            broadcast_send_timeout: Duration::from_secs(5),
            shutdown_grace: Duration::from_secs(5),
            log_format: LogFormat::Text,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file,
    /// then falls back to defaults for anything not set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR` or `RATES_API_URL` is set
    /// but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::ListenAddr { value, source })?,
            None => defaults.listen_addr,
        };

        let rates_api_url = match lookup("RATES_API_URL") {
            Some(value) => {
                if let Err(err) = reqwest::Url::parse(&value) {
                    return Err(ConfigError::ApiUrl {
                        value,
                        reason: err.to_string(),
                    });
                }
                value
            }
            None => defaults.rates_api_url,
        };

        let rates_request_timeout = parse_secs(&lookup, "RATES_REQUEST_TIMEOUT_SECS")
            .unwrap_or(defaults.rates_request_timeout);
        let broadcast_send_timeout = parse_secs(&lookup, "BROADCAST_SEND_TIMEOUT_SECS")
            .unwrap_or(defaults.broadcast_send_timeout);
        let shutdown_grace =
            parse_secs(&lookup, "SHUTDOWN_GRACE_SECS").unwrap_or(defaults.shutdown_grace);

        let live_max_days = lookup("LIVE_MAX_DAYS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|days| *days >= 1)
            .unwrap_or(defaults.live_max_days);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            rates_api_url,
            rates_request_timeout,
            live_max_days,
            broadcast_send_timeout,
            shutdown_grace,
            log_format,
        })
    }
}

/// Parses a positive number of seconds. Returns `None` on missing, invalid
/// or zero values.
fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
