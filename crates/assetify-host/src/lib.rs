//! Assetify Host Layer
//!
//! The boundary between the asset catalog and the design application that
//! hosts it. The catalog never touches the document directly; every read and
//! write goes through the [`HostDocument`] capability.
//!
//! # Architecture
//!
//! ```text
//! Catalog pipeline → HostDocument (trait) → design application
//!                         ↑
//!                  MemoryDocument (JSON snapshot, tests, CLI)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use assetify_host::{HostDocument, MemoryDocument};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let document = MemoryDocument::from_json(&std::fs::read_to_string("site.json")?)?;
//! let nodes = document.nodes_with_attribute("backgroundImage").await?;
//! println!("{} image nodes", nodes.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod memory;
pub mod types;

pub use document::{HostDocument, PluginStorage};
pub use error::{HostError, HostResult};
pub use memory::{CollectionSnapshot, DocumentSnapshot, MemoryDocument, NodeSnapshot};
pub use types::{
    CollectionId, CollectionInfo, CollectionItem, FieldDefinition, FieldKind, ImagePlacement,
    ItemId, ItemUpsert, NodeId, NodeRecord,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the host layer
    pub use crate::document::{HostDocument, PluginStorage};
    pub use crate::error::{HostError, HostResult};
    pub use crate::memory::MemoryDocument;
    pub use crate::types::{CollectionId, ItemId, NodeId, NodeRecord};
}
