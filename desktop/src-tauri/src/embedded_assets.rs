use packlens_core::content_host::{AssetSource, EmbeddedAsset};
use tauri::{AssetResolver, Wry};

/// `web/` as compiled into the executable through `frontendDist`
pub(crate) struct TauriAssets(AssetResolver<Wry>);

impl TauriAssets {
    pub(crate) fn new(resolver: AssetResolver<Wry>) -> Self {
        Self(resolver)
    }
}

impl AssetSource for TauriAssets {
    fn get(&self, path: &str) -> Option<EmbeddedAsset> {
        self.0.get(path.to_string()).map(|asset| EmbeddedAsset {
            bytes: asset.bytes().to_vec(),
            mime_type: asset.mime_type().to_string(),
        })
    }
}
