//! Catalog assembler
//!
//! Runs the source loaders and merges their output into one catalog:
//!
//! ```text
//! CanvasImageLoader ─┐
//!                    ├─ join ─→ exclusion set ─→ CanvasVideoLoader
//! CollectionLoader  ─┘
//!
//! catalog = images ++ videos ++ collection entries
//! ```

use crate::config::CatalogConfig;
use crate::loaders::{
    CanvasImageLoader, CanvasVideoLoader, CollectionLoader, LoaderContext, SourceLoader,
};
use crate::pages::PageResolver;
use crate::types::AssetEntry;
use assetify_host::{HostDocument, NodeId};
use std::collections::HashSet;
use std::sync::Arc;

/// Entry point for scanning and editing the assets of one document
#[derive(Clone)]
pub struct AssetCatalog {
    pub(crate) host: Arc<dyn HostDocument>,
    pub(crate) pages: PageResolver,
    pub(crate) config: Arc<CatalogConfig>,
}

impl std::fmt::Debug for AssetCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCatalog")
            .field("pages", &self.pages)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AssetCatalog {
    /// Create catalog over a host document
    #[must_use]
    pub fn new(host: Arc<dyn HostDocument>, config: CatalogConfig) -> Self {
        let pages = PageResolver::new(host.clone(), &config);
        Self {
            host,
            pages,
            config: Arc::new(config),
        }
    }

    /// Create catalog with default configuration
    #[inline]
    #[must_use]
    pub fn with_defaults(host: Arc<dyn HostDocument>) -> Self {
        Self::new(host, CatalogConfig::default())
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Get host document
    #[inline]
    #[must_use]
    pub fn host(&self) -> &Arc<dyn HostDocument> {
        &self.host
    }

    /// Get page resolver
    #[inline]
    #[must_use]
    pub fn pages(&self) -> &PageResolver {
        &self.pages
    }

    fn context(&self) -> LoaderContext {
        LoaderContext {
            host: self.host.clone(),
            pages: self.pages.clone(),
            config: self.config.clone(),
        }
    }

    /// Scan the whole document
    ///
    /// Never fails: a loader that errors contributes no entries. Canvas
    /// videos whose URL was already found as a canvas image are dropped.
    pub async fn load(&self) -> Vec<AssetEntry> {
        let images = CanvasImageLoader::new(self.context());
        let collections = CollectionLoader::new(self.context());
        let (images, collections) = futures::join!(images.load(), collections.load());

        let exclude: HashSet<String> = images.iter().map(|entry| entry.url.clone()).collect();
        let videos = CanvasVideoLoader::new(self.context(), exclude).load().await;

        tracing::info!(
            "Catalog loaded: {} images, {} videos, {} collection assets",
            images.len(),
            videos.len(),
            collections.len()
        );

        let mut catalog = images;
        catalog.extend(videos);
        catalog.extend(collections);
        catalog
    }

    /// Resolve page names for a batch of nodes, preserving order
    pub async fn resolve_page_names(&self, node_ids: &[NodeId]) -> Vec<String> {
        self.pages.resolve_many(node_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetType;
    use assetify_host::{DocumentSnapshot, MemoryDocument, NodeSnapshot};
    use serde_json::json;

    #[tokio::test]
    async fn image_urls_suppress_videos() {
        let host: Arc<dyn HostDocument> = Arc::new(MemoryDocument::new(DocumentSnapshot {
            nodes: vec![
                NodeSnapshot::new("root"),
                NodeSnapshot::new("still")
                    .with_parent("root")
                    .with_attribute("backgroundImage", json!({"url": "https://x/loop.mp4"})),
                NodeSnapshot::new("player")
                    .with_parent("root")
                    .with_attribute("controls", json!({"srcType": "Link", "srcLink": "https://x/loop.mp4"})),
                NodeSnapshot::new("other")
                    .with_parent("root")
                    .with_attribute("controls", json!({"srcType": "Link", "srcLink": "https://x/other.mp4"})),
            ],
            ..DocumentSnapshot::default()
        }));

        let catalog = AssetCatalog::with_defaults(host).load().await;
        let keys: Vec<&str> = catalog.iter().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, vec!["canvas:https://x/loop.mp4", "video:https://x/other.mp4"]);
        assert_eq!(catalog[0].asset_type, AssetType::Video);
    }

    #[tokio::test]
    async fn empty_document_loads_empty() {
        let host: Arc<dyn HostDocument> = Arc::new(MemoryDocument::default());
        assert!(AssetCatalog::with_defaults(host).load().await.is_empty());
    }
}
