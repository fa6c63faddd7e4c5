use axum::{body::Bytes, Json};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct GreetRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GreetResponse {
    pub message: String,
}

/// POST /api/greet
///
/// Mounted behind `require_token`, which has already accepted the body. The
/// body is parsed here rather than through the `Json` extractor so requests
/// without a JSON content type still reach the handler.
pub async fn greet(body: Bytes) -> Result<Json<GreetResponse>, ApiError> {
    let request: GreetRequest = serde_json::from_slice(&body).map_err(ApiError::InvalidRequest)?;

    tracing::debug!(name = %request.name, "Greeting requested");
    Ok(Json(GreetResponse {
        message: format!("Hello, {}!", request.name),
    }))
}
