//! Response body of the remote rate provider.
//!
//! `GET <base>/exchange_rates?date=DD.MM.YYYY` answers with an
//! `exchangeRate` array holding one object per currency. Only the fields
//! the relay reads are modelled; anything else is ignored.

use serde::Deserialize;

use crate::domain::{Currency, CurrencyQuote, ExchangeRate, RateQuote};

/// Top-level provider payload for one date.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderPayload {
    /// Per-currency entries. Absent arrays decode as empty.
    #[serde(rename = "exchangeRate", default)]
    pub exchange_rate: Vec<ProviderRate>,
}

/// One currency entry as published by the provider.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderRate {
    /// ISO 4217 code, e.g. `"USD"`.
    #[serde(default)]
    pub currency: Option<String>,
    /// Commercial sale rate. Missing for currencies the bank does not trade.
    #[serde(rename = "saleRate", default)]
    pub sale_rate: Option<f64>,
    /// Commercial purchase rate.
    #[serde(rename = "purchaseRate", default)]
    pub purchase_rate: Option<f64>,
}

impl ProviderPayload {
    /// Extracts the quote for `currency`.
    ///
    /// Uses the first matching entry. A quote missing either price is
    /// reported as [`CurrencyQuote::Unavailable`].
    #[must_use]
    pub fn quote(&self, currency: Currency) -> CurrencyQuote {
        let entry = self
            .exchange_rate
            .iter()
            .find(|rate| rate.currency.as_deref() == Some(currency.code()));
        match entry {
            Some(ProviderRate {
                sale_rate: Some(sale),
                purchase_rate: Some(purchase),
                ..
            }) => CurrencyQuote::Available(RateQuote {
                sale: *sale,
                purchase: *purchase,
            }),
            _ => CurrencyQuote::Unavailable,
        }
    }

    /// Normalizes the payload into an [`ExchangeRate`].
    #[must_use]
    pub fn exchange_rate(&self) -> ExchangeRate {
        ExchangeRate::new(self.quote(Currency::Eur), self.quote(Currency::Usd))
    }
}
