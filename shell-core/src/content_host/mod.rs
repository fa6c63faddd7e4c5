//! Loopback content host
//!
//! Serves the front-end directory to the embedded webview over
//! `http://127.0.0.1:<port>/` from disk or from embedded assets, renders the host page with the per-process
//! AuthToken and guards the API route by that token. Every response has
//! caching disabled.

mod api;
mod assets;
mod auth;
mod error;
mod middleware;
mod pages;

pub use api::{greet, GreetRequest, GreetResponse};
pub use assets::{embedded_asset, AssetSource, EmbeddedAsset, WebRoot};
pub use auth::{extract_token, require_token, AuthToken, MAX_PROTECTED_BODY_BYTES};
pub use error::{ApiError, AUTHENTICATION_ERROR};
pub use middleware::{disable_caching, NO_STORE_CACHE_CONTROL};
pub use pages::{index, render_host_page, TOKEN_PLACEHOLDER};

use anyhow::{Context, Result};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

use crate::config::ServerConfig;

pub const GREET_ROUTE: &str = "/api/greet";

#[derive(Clone)]
pub struct AppState {
    pub token: AuthToken,
    pub web_root: WebRoot,
    pub entry_page: Arc<str>,
}

impl AppState {
    pub fn new(token: AuthToken, web_root: impl Into<WebRoot>, entry_page: &str) -> Self {
        Self {
            token,
            web_root: web_root.into(),
            entry_page: entry_page.into(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(tracing::Level::DEBUG)
                .latency_unit(LatencyUnit::Millis),
        );

    // The template must never go out unrendered under its own name
    let entry_route = format!("/{}", state.entry_page.trim_start_matches('/'));

    let mut router = Router::new().route("/", get(index));
    if entry_route != "/" {
        router = router.route(&entry_route, get(index));
    }
    let router = router.route(
        GREET_ROUTE,
        post(greet).route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_token,
        )),
    );

    let router = match &state.web_root {
        WebRoot::Directory(dir) => router.fallback_service(ServeDir::new(dir.as_path())),
        WebRoot::Embedded(_) => router.fallback(embedded_asset),
    };

    router
        .layer(trace_layer)
        // Outermost so error and static responses get the headers too
        .layer(axum_middleware::from_fn(disable_caching))
        .with_state(state)
}

/// Running loopback server
///
/// The accept loop lives on its own task; it is not stopped explicitly and
/// ends with the process.
pub struct ContentHost {
    addr: SocketAddr,
    token: AuthToken,
    handle: JoinHandle<()>,
}

impl ContentHost {
    /// Bind to loopback, generate the token and start serving.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(
        config: &ServerConfig,
        web_root: impl Into<WebRoot>,
        entry_page: &str,
    ) -> Result<Self> {
        let web_root = web_root.into();
        web_root.verify(entry_page)?;

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, config.port))
            .await
            .with_context(|| format!("Failed to bind loopback port {}", config.port))?;
        let addr = listener
            .local_addr()
            .context("Failed to read content host address")?;

        let token = AuthToken::generate();
        let source = web_root.describe();
        let router = create_router(AppState::new(token.clone(), web_root, entry_page));

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Content host stopped: {}", e);
            }
        });

        tracing::info!(
            "Content host listening on http://{} (assets: {})",
            addr,
            source
        );

        Ok(Self {
            addr,
            token,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL the webview loads
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests;
