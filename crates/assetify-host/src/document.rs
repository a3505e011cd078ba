//! Host document capability
//!
//! The catalog is written against these traits rather than against a global
//! host object, so any document source (the live design application, a JSON
//! snapshot, a fault-injecting test double) can drive it.

use crate::error::HostResult;
use crate::types::{
    CollectionId, CollectionInfo, CollectionItem, FieldDefinition, ImagePlacement, ItemUpsert,
    NodeId, NodeRecord,
};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Read/write access to the design document
///
/// Implementations must be safe to call concurrently; the catalog issues
/// overlapping queries while assembling a snapshot.
#[async_trait]
pub trait HostDocument: Send + Sync {
    /// All nodes that expose a non-null attribute with this name
    async fn nodes_with_attribute(&self, attribute: &str) -> HostResult<Vec<NodeRecord>>;

    /// Fetch a single node, `None` if it no longer exists
    async fn node(&self, id: &NodeId) -> HostResult<Option<NodeRecord>>;

    /// Parent of a node, `None` for a root
    async fn parent(&self, id: &NodeId) -> HostResult<Option<NodeId>>;

    /// Merge attributes into a node
    async fn set_attributes(&self, id: &NodeId, attributes: Map<String, Value>) -> HostResult<()>;

    /// Enumerate structured collections
    async fn collections(&self) -> HostResult<Vec<CollectionInfo>>;

    /// Field definitions of a collection
    async fn fields(&self, collection: &CollectionId) -> HostResult<Vec<FieldDefinition>>;

    /// Items of a collection
    async fn items(&self, collection: &CollectionId) -> HostResult<Vec<CollectionItem>>;

    /// Insert or replace items, matched by id
    async fn upsert_items(&self, collection: &CollectionId, items: Vec<ItemUpsert>)
        -> HostResult<()>;

    /// Currently selected nodes
    async fn selection(&self) -> HostResult<Vec<NodeId>>;

    /// Replace the selection
    async fn set_selection(&self, ids: &[NodeId]) -> HostResult<()>;

    /// Scroll/zoom the viewport to the given nodes
    async fn zoom_into_view(&self, ids: &[NodeId]) -> HostResult<()>;

    /// Set the image of every selected node
    async fn set_image(&self, image: ImagePlacement) -> HostResult<()>;

    /// Insert a new image node
    async fn add_image(&self, image: ImagePlacement) -> HostResult<NodeId>;

    /// Navigate the editor to an arbitrary target (collection item, page)
    async fn navigate_to(&self, target: &str) -> HostResult<()>;
}

/// Small key-value store scoped to the plugin
#[async_trait]
pub trait PluginStorage: Send + Sync {
    /// Read a stored value
    async fn plugin_data(&self, key: &str) -> HostResult<Option<String>>;

    /// Store a value
    async fn set_plugin_data(&self, key: &str, value: &str) -> HostResult<()>;
}
