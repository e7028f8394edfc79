//! Request/response DTOs for the REST API.

pub mod rates_dto;

pub use rates_dto::{DailyRatesDto, RatesQuery, RatesResponse};
