use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use super::*;

const TEST_TOKEN: &str = "0123456789abcdef0123456789abcdef";

fn create_test_web_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("frame.html"),
        r#"<html><head><meta name="bridge-token" content="{{ token }}"></head><body></body></html>"#,
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("js")).unwrap();
    std::fs::write(dir.path().join("js").join("bridge.js"), "console.log('bridge');").unwrap();
    dir
}

fn create_test_router(web_dir: &TempDir) -> Router {
    create_router(AppState::new(
        AuthToken::from(TEST_TOKEN),
        web_dir.path(),
        "frame.html",
    ))
}

fn greet_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(GREET_ROUTE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_no_store(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers[header::CACHE_CONTROL], NO_STORE_CACHE_CONTROL);
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::EXPIRES], "-1");
}

#[tokio::test]
async fn index_renders_token_into_host_page() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_no_store(&response);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(&format!(r#"content="{}""#, TEST_TOKEN)));
    assert!(!html.contains(TOKEN_PLACEHOLDER));
}

#[tokio::test]
async fn index_reports_missing_page() {
    let web_dir = tempfile::tempdir().unwrap();
    let app = create_router(AppState::new(
        AuthToken::from(TEST_TOKEN),
        web_dir.path(),
        "frame.html",
    ));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_no_store(&response);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Host page unavailable" })
    );
}

#[tokio::test]
async fn static_asset_responses_are_never_cacheable() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/js/bridge.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);
    }
}

#[tokio::test]
async fn missing_static_asset_is_not_found_and_not_cacheable() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/js/missing.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_no_store(&response);
}

#[tokio::test]
async fn greet_with_matching_token_runs_handler() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let body = json!({ "token": TEST_TOKEN, "name": "PackLens" }).to_string();
    let response = app.oneshot(greet_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_no_store(&response);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Hello, PackLens!" })
    );
}

#[tokio::test]
async fn greet_rejects_every_invalid_token_shape() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let bodies = [
        json!({ "token": "wrong", "name": "x" }).to_string(),
        json!({ "name": "x" }).to_string(),
        json!({ "token": null, "name": "x" }).to_string(),
        json!({ "token": 12345, "name": "x" }).to_string(),
        json!({ "token": TEST_TOKEN.to_uppercase(), "name": "x" }).to_string(),
        "{not json".to_string(),
        String::new(),
    ];

    for body in bodies {
        let response = app.clone().oneshot(greet_request(body.clone())).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "body: {}", body);
        assert_no_store(&response);
        assert_eq!(
            body_json(response).await,
            json!({ "error": AUTHENTICATION_ERROR })
        );
    }
}

#[tokio::test]
async fn greet_rejects_oversized_body() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let padding = "x".repeat(MAX_PROTECTED_BODY_BYTES + 1);
    let body = json!({ "token": TEST_TOKEN, "name": padding }).to_string();
    let response = app.oneshot(greet_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn content_host_binds_loopback_only() {
    let web_dir = create_test_web_dir();
    let host = ContentHost::start(
        &ServerConfig { port: 0 },
        web_dir.path().to_path_buf(),
        "frame.html",
    )
    .await
    .unwrap();

    assert!(host.addr().ip().is_loopback());
    assert_ne!(host.addr().port(), 0);
    assert_eq!(host.url(), format!("http://127.0.0.1:{}/", host.addr().port()));
    assert!(host.is_running());
}

#[tokio::test]
async fn content_host_refuses_missing_web_dir() {
    let web_dir = tempfile::tempdir().unwrap();
    let missing = web_dir.path().join("does-not-exist");

    let result = ContentHost::start(&ServerConfig { port: 0 }, missing, "frame.html").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn greet_accepts_valid_token_without_content_type() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let request = Request::builder()
        .method("POST")
        .uri(GREET_ROUTE)
        .body(Body::from(
            json!({ "token": TEST_TOKEN, "name": "PackLens" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Hello, PackLens!" })
    );
}

#[tokio::test]
async fn greet_with_valid_token_but_no_name_is_bad_request() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let body = json!({ "token": TEST_TOKEN }).to_string();
    let response = app.oneshot(greet_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_no_store(&response);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Invalid request body" })
    );
}

#[tokio::test]
async fn entry_page_by_name_is_rendered_not_raw() {
    let web_dir = create_test_web_dir();
    let app = create_test_router(&web_dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/frame.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(TEST_TOKEN));
    assert!(!html.contains(TOKEN_PLACEHOLDER));
}

struct BundledAssets;

impl AssetSource for BundledAssets {
    fn get(&self, path: &str) -> Option<EmbeddedAsset> {
        let (content, mime_type) = match path {
            "frame.html" => (r#"<meta name="bridge-token" content="{{ token }}">"#, "text/html"),
            "js/bridge.js" => ("console.log('embedded');", "text/javascript"),
            _ => return None,
        };
        Some(EmbeddedAsset {
            bytes: content.as_bytes().to_vec(),
            mime_type: mime_type.to_string(),
        })
    }
}

fn create_embedded_router() -> Router {
    create_router(AppState::new(
        AuthToken::from(TEST_TOKEN),
        WebRoot::embedded(BundledAssets),
        "frame.html",
    ))
}

#[tokio::test]
async fn embedded_root_renders_host_page() {
    let response = create_embedded_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        String::from_utf8(body.to_vec()).unwrap(),
        format!(r#"<meta name="bridge-token" content="{}">"#, TEST_TOKEN)
    );
}

#[tokio::test]
async fn embedded_root_serves_assets_with_mime_type() {
    let app = create_embedded_router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/js/bridge.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/javascript");
    assert_no_store(&response);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"console.log('embedded');");

    let missing = app
        .oneshot(
            Request::builder()
                .uri("/js/missing.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_no_store(&missing);
}

#[tokio::test]
async fn content_host_refuses_embedded_root_without_entry_page() {
    let result = ContentHost::start(
        &ServerConfig { port: 0 },
        WebRoot::embedded(BundledAssets),
        "index.html",
    )
    .await;
    assert!(result.is_err());
}
