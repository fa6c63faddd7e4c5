use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const AUTHENTICATION_ERROR: &str = "Authentication error";

/// Errors surfaced to the front-end as `{"error": "..."}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error")]
    Unauthenticated,

    #[error("Host page unavailable")]
    PageUnavailable(#[source] std::io::Error),

    #[error("Invalid request body")]
    InvalidRequest(#[source] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::PageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::PageUnavailable(source) => {
                tracing::error!("Failed to read host page: {}", source)
            }
            ApiError::InvalidRequest(source) => {
                tracing::warn!("Rejected malformed request body: {}", source)
            }
            ApiError::Unauthenticated => {}
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
