//! Source loaders
//!
//! One loader per place assets live in a document:
//! - [`CanvasImageLoader`] for image attributes on canvas nodes
//! - [`CanvasVideoLoader`] for video files referenced by component controls
//! - [`CollectionLoader`] for image fields of structured collections
//!
//! Every loader is fault-isolated: [`SourceLoader::load`] logs a failed scan
//! and yields an empty list, so one broken source never hides the others.

use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::pages::PageResolver;
use crate::types::AssetEntry;
use assetify_host::HostDocument;
use async_trait::async_trait;
use std::sync::Arc;

mod canvas;
mod collection;

pub use canvas::{extract_video, CanvasImageLoader, CanvasVideoLoader, VideoRef};
pub use collection::CollectionLoader;

/// Shared handles every loader reads from
#[derive(Clone)]
pub struct LoaderContext {
    /// Host document
    pub host: Arc<dyn HostDocument>,
    /// Page resolver shared across loaders of one catalog
    pub pages: PageResolver,
    /// Catalog configuration
    pub config: Arc<CatalogConfig>,
}

impl std::fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderContext")
            .field("pages", &self.pages)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A fault-isolated asset source
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Scan the source, propagating host failures
    async fn try_load(&self) -> CatalogResult<Vec<AssetEntry>>;

    /// Scan the source; a failure is logged and yields no entries
    async fn load(&self) -> Vec<AssetEntry> {
        match self.try_load().await {
            Ok(entries) => {
                tracing::debug!("{} loader found {} assets", self.name(), entries.len());
                entries
            }
            Err(e) => {
                tracing::warn!("{} loader failed: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}
