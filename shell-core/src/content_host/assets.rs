//! Where the content host reads its front-end files from
//!
//! Source checkouts serve `web/` straight from disk. Packaged builds carry the
//! same tree inside the executable and reach it through an `AssetSource`.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::AppState;

/// One file from an embedded asset bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedAsset {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Read-only lookup into assets compiled into the binary
///
/// Paths are relative to the web root without a leading slash
/// (`js/bridge.js`).
pub trait AssetSource: Send + Sync {
    fn get(&self, path: &str) -> Option<EmbeddedAsset>;
}

#[derive(Clone)]
pub enum WebRoot {
    Directory(Arc<PathBuf>),
    Embedded(Arc<dyn AssetSource>),
}

impl WebRoot {
    pub fn embedded(source: impl AssetSource + 'static) -> Self {
        WebRoot::Embedded(Arc::new(source))
    }

    /// Read a text file, used for the host page template
    pub async fn read_to_string(&self, path: &str) -> io::Result<String> {
        match self {
            WebRoot::Directory(dir) => tokio::fs::read_to_string(dir.join(path)).await,
            WebRoot::Embedded(source) => {
                let asset = source.get(path).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, format!("{} is not embedded", path))
                })?;
                String::from_utf8(asset.bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
        }
    }

    /// Check the root exists and holds the entry page
    pub fn verify(&self, entry_page: &str) -> anyhow::Result<()> {
        match self {
            WebRoot::Directory(dir) if !dir.is_dir() => {
                anyhow::bail!("Web directory not found at: {}", dir.display())
            }
            WebRoot::Embedded(source) if source.get(entry_page).is_none() => {
                anyhow::bail!("Embedded assets do not contain {}", entry_page)
            }
            _ => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            WebRoot::Directory(dir) => dir.display().to_string(),
            WebRoot::Embedded(_) => "embedded".to_string(),
        }
    }
}

impl From<PathBuf> for WebRoot {
    fn from(dir: PathBuf) -> Self {
        WebRoot::Directory(Arc::new(dir))
    }
}

impl From<&Path> for WebRoot {
    fn from(dir: &Path) -> Self {
        WebRoot::from(dir.to_path_buf())
    }
}

/// Fallback handler for embedded roots
pub async fn embedded_asset(State(state): State<AppState>, uri: Uri) -> Response {
    let WebRoot::Embedded(source) = &state.web_root else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let path = uri.path().trim_start_matches('/');
    match source.get(path) {
        Some(asset) => {
            let content_type = HeaderValue::from_str(&asset.mime_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            ([(header::CONTENT_TYPE, content_type)], asset.bytes).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
