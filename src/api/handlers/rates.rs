//! Batch rate lookup over HTTP.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{RatesQuery, RatesResponse};
use crate::app_state::AppState;
use crate::domain::RateRequest;
use crate::error::RelayError;

/// `GET /rates?days=N`: EUR/USD rates for the last `N` days.
///
/// Uses batch semantics: the day count must be 1–10 and any provider
/// failure fails the whole request.
#[utoipa::path(
    get,
    path = "/api/v1/rates",
    tag = "Rates",
    summary = "EUR/USD rates for recent days",
    description = "Fetches sale and purchase rates for each of the last `days` days, newest first.",
    params(RatesQuery),
    responses(
        (status = 200, description = "Rates for every requested day", body = RatesResponse),
        (status = 400, description = "Day count out of range"),
        (status = 502, description = "Rate provider failed"),
    )
)]
pub async fn rates_handler(
    State(state): State<AppState>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<RatesResponse>, RelayError> {
    let request = RateRequest::batch(query.days)?;
    let table = state.rates.lookup(&request).await?;
    tracing::debug!(days = request.days(), "served batch rates over http");
    Ok(Json(RatesResponse::from_table(request.days(), &table)))
}

/// Rate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rates", get(rates_handler))
}
