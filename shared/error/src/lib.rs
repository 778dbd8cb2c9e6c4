//! The closed error taxonomy shared by the REST and RPC adapters.
//!
//! Every business-rule failure the stock-transition engine can produce maps to
//! exactly one of these variants. Adapters translate a variant to a transport
//! shape (HTTP status + JSON body, or a gRPC response's `success`/`error`
//! fields) at the edge; the engine itself never encodes transport concerns.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad input: {0}")]
    BadInput(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("insufficient reservation: {0}")]
    InsufficientReservation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadInput(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InsufficientStock(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InsufficientReservation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadInput(_) => "BAD_INPUT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            AppError::InsufficientReservation(_) => "INSUFFICIENT_RESERVATION",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to return to a caller. `Internal` never leaks detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Internal(_)) {
            tracing::error!(error = %self, "internal error");
        }

        let status = self.status_code();
        let body = Json(json!({
            "error": self.error_code(),
            "message": self.public_message(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Infrastructure-level failures (pool exhaustion, connect errors, panics
/// caught at the RPC boundary) surface as a transport error. Business
/// failures are never converted this way — §4.5 requires they stay encoded
/// in the typed response instead.
impl From<AppError> for tonic::Status {
    fn from(err: AppError) -> Self {
        tonic::Status::internal(err.public_message())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
