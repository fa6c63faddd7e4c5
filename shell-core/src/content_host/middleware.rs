//! Response header middleware for the content host

use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, EXPIRES, PRAGMA},
        HeaderValue, Request,
    },
    middleware,
    response::Response,
};

pub const NO_STORE_CACHE_CONTROL: &str =
    "no-store, no-cache, must-revalidate, post-check=0, pre-check=0, max-age=0";

/// Disable client-side caching on every response
///
/// The webview must pick up edited front-end assets without a manual cache
/// flush.
pub async fn disable_caching(request: Request<Body>, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE_CACHE_CONTROL));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("-1"));

    response
}
