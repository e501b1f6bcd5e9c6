//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ticketing::TicketingError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Request could not be read (bad JSON, bad path segment, empty text).
    BadRequest(String),
    /// Error raised by the ticketing services.
    Ticketing(TicketingError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Ticketing(err) => ticketing_status(err.root_cause()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "ValidationError",
            ApiError::Ticketing(err) => err.kind(),
        }
    }
}

fn ticketing_status(err: &TicketingError) -> StatusCode {
    match err {
        TicketingError::Validation(_) => StatusCode::BAD_REQUEST,
        TicketingError::Unauthorized => StatusCode::UNAUTHORIZED,
        TicketingError::NotFound(_) => StatusCode::NOT_FOUND,
        TicketingError::DuplicateOrder(_) | TicketingError::TicketMismatch(_) => {
            StatusCode::CONFLICT
        }
        TicketingError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        TicketingError::Encoding(_) | TicketingError::PurchaseFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Ticketing(err) => err.to_string(),
        };

        metrics::counter!("http_errors_total", "kind" => self.kind()).increment(1);
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %message, "request failed");
        }

        let body = serde_json::json!({ "error_kind": self.kind(), "message": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<TicketingError> for ApiError {
    fn from(err: TicketingError) -> Self {
        ApiError::Ticketing(err)
    }
}

impl From<ticketing::CodeGenError> for ApiError {
    fn from(err: ticketing::CodeGenError) -> Self {
        ApiError::Ticketing(err.into())
    }
}
