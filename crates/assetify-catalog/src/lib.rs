//! Assetify Catalog
//!
//! Discovers every image and video used by a design document, deduplicates
//! them into one catalog, and writes edits back through the host.
//!
//! # Core Operations
//!
//! - **Load**: scan canvas images, canvas videos and collection fields into
//!   [`AssetEntry`] records
//! - **Resolve**: map usage nodes to the pages that contain them
//! - **Mutate**: save alt text, place an asset on the canvas, navigate to usages
//!
//! # Architecture
//!
//! ```text
//! HostDocument → Loaders → Normalizer → Classifier → Dedup → AssetEntry[]
//!                    ↑                                          ↓
//!               PageResolver (memoized)              CatalogStore / AssetQuery
//! ```
//!
//! Scanning never fails: malformed payloads are skipped and a failing loader
//! contributes nothing. Only mutations report errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use assetify_catalog::{AssetCatalog, AssetQuery, StorageFilter};
//! use assetify_host::MemoryDocument;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let document = Arc::new(MemoryDocument::from_json(&std::fs::read_to_string("site.json")?)?);
//! let catalog = AssetCatalog::with_defaults(document);
//!
//! let entries = catalog.load().await;
//! let external = AssetQuery::new().with_storage(StorageFilter::External);
//! for entry in external.apply(&entries) {
//!     println!("{} ({})", entry.name, entry.location_label);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod identity;
pub mod label;
pub mod loaders;
pub mod mutation;
pub mod navigator;
pub mod normalize;
pub mod pages;
pub mod query;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use catalog::AssetCatalog;
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult, MutationError, MutationResult};
pub use mutation::SmartAddOutcome;
pub use navigator::UsageNavigator;
pub use normalize::{AssetPayload, ImageData};
pub use pages::PageResolver;
pub use query::{AssetQuery, SourceCounts, SourceFilter, StorageCounts, StorageFilter};
pub use store::{CatalogStore, RefreshTicket};
pub use types::{AssetEntry, AssetKey, AssetSource, AssetType, KeyOrigin, StorageSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the asset catalog
    pub use crate::catalog::AssetCatalog;
    pub use crate::config::CatalogConfig;
    pub use crate::error::{MutationError, MutationResult};
    pub use crate::mutation::SmartAddOutcome;
    pub use crate::query::{AssetQuery, SourceFilter, StorageFilter};
    pub use crate::store::CatalogStore;
    pub use crate::types::{AssetEntry, AssetKey, AssetSource, AssetType, StorageSource};
    pub use assetify_host::{HostDocument, MemoryDocument};
}
