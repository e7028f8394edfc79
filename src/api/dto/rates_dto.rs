//! Rate lookup DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{RateQuote, RateTable, format_date};

/// Query parameters for `GET /api/v1/rates`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RatesQuery {
    /// Number of days to look back, including today (1–10).
    pub days: i64,
}

/// Rates for one calendar date.
#[derive(Debug, Serialize, ToSchema)]
pub struct DailyRatesDto {
    /// Date in `DD.MM.YYYY` format.
    pub date: String,
    /// Euro quote, `null` when the provider had none.
    pub eur: Option<RateQuote>,
    /// US dollar quote, `null` when the provider had none.
    pub usd: Option<RateQuote>,
}

/// Response body for `GET /api/v1/rates`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatesResponse {
    /// Number of days requested.
    pub days: u32,
    /// One entry per date, newest first.
    pub rates: Vec<DailyRatesDto>,
}

impl RatesResponse {
    /// Builds the response from a looked-up table.
    #[must_use]
    pub fn from_table(days: u32, table: &RateTable) -> Self {
        let rates = table
            .iter()
            .map(|(date, rate)| DailyRatesDto {
                date: format_date(date),
                eur: rate.eur.as_quote(),
                usd: rate.usd.as_quote(),
            })
            .collect();
        Self { days, rates }
    }
}
