//! Unified error handling for the order API.
//!
//! Provides an `ApiError` type that maps workflow failures onto HTTP status
//! codes and a JSON `{"message": ...}` body. All route handlers return
//! `Result<T, ApiError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use inkleaf_orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request carried no valid bearer token.
    #[error("missing or invalid bearer token")]
    Unauthorized,

    /// Order workflow failure.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Order(err) => match err {
                OrderError::UserNotFound
                | OrderError::CartNotFound
                | OrderError::BookNotFound
                | OrderError::AddressNotFound
                | OrderError::OrderNotFound => StatusCode::NOT_FOUND,
                OrderError::OrderAlreadyExists | OrderError::Contended => StatusCode::CONFLICT,
                OrderError::InsufficientStock { .. } | OrderError::InvalidOrderId(_) => {
                    StatusCode::NOT_ACCEPTABLE
                }
                OrderError::InvalidQuantity => StatusCode::BAD_REQUEST,
                OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Order(OrderError::Store(err)) = &self {
            tracing::error!(error = %err, "request failed in the store layer");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Order(OrderError::Store(_)) => "internal server error".to_string(),
            _ => self.to_string(),
        };

        (self.status(), Json(ErrorBody { message })).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
