//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. On the HTTP
//! surface each variant maps to a status code and a structured JSON body;
//! the WebSocket protocol uses its own flat `{"error": "..."}` payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: days must be between 1 and 10"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Relay error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Provider   | 502 Bad Gateway           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Day count or other input failed validation.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The rate provider answered with a non-success status.
    #[error("rate provider returned {status} for {url}")]
    Fetch {
        /// HTTP status returned by the provider.
        status: u16,
        /// Full request URL, including the date query.
        url: String,
    },

    /// The rate provider could not be reached or timed out.
    #[error("rate provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The rate provider body could not be decoded.
    #[error("malformed rate provider response: {0}")]
    Decode(String),

    /// A client connection is closed or broken.
    #[error("connection error: {0}")]
    Connection(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Fetch { .. } => 2001,
            Self::Transport(_) => 2002,
            Self::Decode(_) => 2003,
            Self::Internal(_) => 3000,
            Self::Connection(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Fetch { .. } | Self::Transport(_) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Connection(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("json: {err}"))
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
