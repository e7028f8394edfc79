//! HTTP client for the remote rate provider.
//!
//! [`RateLookupClient`] issues one request per date in the window, all
//! concurrently, and assembles the answers into a [`RateTable`] keyed by
//! date. How a failed date is handled depends on the request's
//! [`LookupMode`]:
//!
//! - `Batch`: the first failure aborts the lookup; no partial table.
//! - `Live`: the failed date is logged and reported with both currencies
//!   unavailable, so the reply always covers the full window.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::future::{join_all, try_join_all};

use super::provider::ProviderPayload;
use crate::domain::{ExchangeRate, LookupMode, RateRequest, RateTable, format_date};
use crate::error::RelayError;

/// Public PrivatBank archive API.
pub const DEFAULT_API_URL: &str = "https://api.privatbank.ua/p24api";

/// Source of exchange-rate tables.
///
/// Implemented by [`RateLookupClient`]; the command router depends on this
/// trait so tests can substitute a canned source.
#[async_trait]
pub trait RateLookup: Send + Sync + fmt::Debug {
    /// Looks up every date in `request`'s window ending today.
    ///
    /// # Errors
    ///
    /// Batch requests fail with the first provider error; live requests
    /// only fail on internal errors.
    async fn lookup(&self, request: &RateRequest) -> Result<RateTable, RelayError>;
}

/// `reqwest`-backed client for `GET <base>/exchange_rates?date=DD.MM.YYYY`.
#[derive(Debug, Clone)]
pub struct RateLookupClient {
    client: reqwest::Client,
    base_url: String,
}

impl RateLookupClient {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Transport`] if the HTTP client cannot be built
    /// (e.g. TLS backend initialization failure).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Creates a client sharing an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Provider URL for `date`.
    #[must_use]
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!(
            "{}/exchange_rates?date={}",
            self.base_url,
            format_date(date)
        )
    }

    /// Looks up the window ending at the local wall-clock date.
    ///
    /// # Errors
    ///
    /// See [`RateLookupClient::fetch_from`].
    pub async fn fetch(&self, request: &RateRequest) -> Result<RateTable, RelayError> {
        self.fetch_from(request, chrono::Local::now().date_naive())
            .await
    }

    /// Looks up the window ending at `today`.
    ///
    /// # Errors
    ///
    /// For [`LookupMode::Batch`], returns the first [`RelayError::Fetch`],
    /// [`RelayError::Transport`], or [`RelayError::Decode`] raised by any
    /// date. [`LookupMode::Live`] never fails here.
    pub async fn fetch_from(
        &self,
        request: &RateRequest,
        today: NaiveDate,
    ) -> Result<RateTable, RelayError> {
        let dates = request.dates_from(today);
        tracing::debug!(days = request.days(), mode = ?request.mode(), "fetching rate window");

        match request.mode() {
            LookupMode::Batch => {
                let entries = try_join_all(dates.into_iter().map(|date| async move {
                    self.fetch_date(date).await.map(|rate| (date, rate))
                }))
                .await?;
                Ok(entries.into_iter().collect())
            }
            LookupMode::Live => {
                let entries = join_all(dates.into_iter().map(|date| async move {
                    match self.fetch_date(date).await {
                        Ok(rate) => (date, rate),
                        Err(err) => {
                            tracing::warn!(
                                date = %format_date(date),
                                error = %err,
                                "rate lookup failed, reporting date unavailable"
                            );
                            (date, ExchangeRate::unavailable())
                        }
                    }
                }))
                .await;
                Ok(entries.into_iter().collect())
            }
        }
    }

    /// Fetches and normalizes the rates for a single date.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Fetch`] on a non-success status.
    /// - [`RelayError::Transport`] if the request fails or times out.
    /// - [`RelayError::Decode`] if the body is not a provider payload.
    pub async fn fetch_date(&self, date: NaiveDate) -> Result<ExchangeRate, RelayError> {
        let url = self.url_for(date);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Fetch {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let payload: ProviderPayload = serde_json::from_slice(&body)
            .map_err(|err| RelayError::Decode(format!("{url}: {err}")))?;
        Ok(payload.exchange_rate())
    }
}

#[async_trait]
impl RateLookup for RateLookupClient {
    async fn lookup(&self, request: &RateRequest) -> Result<RateTable, RelayError> {
        self.fetch(request).await
    }
}
