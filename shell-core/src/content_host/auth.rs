//! Per-process token shared between the served page and its backend
//!
//! The host page is rendered with the token embedded; the front-end echoes it
//! back in the JSON body of every protected request. Anything else that can
//! reach the loopback port does not know the value.

use axum::{
    body::{self, Body},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{fmt, sync::Arc};
use uuid::Uuid;

use super::{error::ApiError, AppState};

/// Upper bound for a buffered protected request body
pub const MAX_PROTECTED_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Arc<str>);

impl AuthToken {
    /// Generate a fresh token. Called once per content host start.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a client-supplied value
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        candidate == Some(self.as_str())
    }
}

impl From<&str> for AuthToken {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

// Keep the value out of logs
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Pull the `token` string out of a JSON body. Malformed JSON, a missing key
/// or a non-string value all count as no token.
pub fn extract_token(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("token")?.as_str().map(str::to_owned)
}

/// Guard for protected routes
///
/// Buffers the body, checks its token and either rejects with 401 or hands an
/// identical body on to the wrapped handler.
pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match body::to_bytes(body, MAX_PROTECTED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(uri = %parts.uri, "Rejected request with unreadable body: {}", e);
            return ApiError::Unauthenticated.into_response();
        }
    };

    if !state.token.matches(extract_token(&bytes).as_deref()) {
        tracing::warn!(uri = %parts.uri, "Rejected request with invalid token");
        return ApiError::Unauthenticated.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = AuthToken::generate();
        let b = AuthToken::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_matches_is_exact() {
        let token = AuthToken::from("abc123");
        assert!(token.matches(Some("abc123")));
        assert!(!token.matches(Some("ABC123")));
        assert!(!token.matches(Some("abc123 ")));
        assert!(!token.matches(Some("")));
        assert!(!token.matches(None));
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(
            extract_token(br#"{"token": "abc", "name": "x"}"#).as_deref(),
            Some("abc")
        );
        assert_eq!(extract_token(br#"{"name": "x"}"#), None);
        assert_eq!(extract_token(br#"{"token": 42}"#), None);
        assert_eq!(extract_token(br#"["token"]"#), None);
        assert_eq!(extract_token(b"token=abc"), None);
        assert_eq!(extract_token(b""), None);
    }

    #[test]
    fn test_debug_hides_value() {
        let token = AuthToken::from("secret-value");
        assert!(!format!("{:?}", token).contains("secret-value"));
    }
}
