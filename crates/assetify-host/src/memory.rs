//! In-memory host document
//!
//! [`MemoryDocument`] holds a whole design document in process memory. It is
//! loaded from (and exported back to) a JSON [`DocumentSnapshot`], which makes
//! it the host for the command-line tool and for deterministic tests.

use crate::document::{HostDocument, PluginStorage};
use crate::error::{HostError, HostResult};
use crate::types::{
    CollectionId, CollectionInfo, CollectionItem, FieldDefinition, ImagePlacement, ItemUpsert,
    NodeId, NodeRecord,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Attribute that carries a node's image
const IMAGE_ATTRIBUTE: &str = "backgroundImage";

/// Serializable form of a whole document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Canvas nodes in document order
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
    /// Structured collections
    #[serde(default)]
    pub collections: Vec<CollectionSnapshot>,
    /// Selected node ids
    #[serde(default)]
    pub selection: Vec<NodeId>,
    /// Plugin-scoped key-value data
    #[serde(default)]
    pub plugin_data: BTreeMap<String, String>,
}

/// A node with its parent link and flattened attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Node identifier
    pub id: NodeId,
    /// Parent node, absent for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Every other key of the node object
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl NodeSnapshot {
    /// Create a root node with no attributes
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            attributes: Map::new(),
        }
    }

    /// With parent node
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// With `name` attribute
    #[inline]
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_attribute("name", Value::String(name.into()))
    }

    /// With arbitrary attribute
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    fn record(&self) -> NodeRecord {
        NodeRecord::new(self.id.clone(), self.attributes.clone())
    }
}

/// A collection with its schema and items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Collection identifier
    pub id: CollectionId,
    /// Display name
    pub name: String,
    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Items
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

impl CollectionSnapshot {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<CollectionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: Vec::new(),
            items: Vec::new(),
        }
    }

    /// With field definition
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// With item
    #[inline]
    #[must_use]
    pub fn with_item(mut self, item: CollectionItem) -> Self {
        self.items.push(item);
        self
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    nodes: IndexMap<NodeId, NodeSnapshot>,
    collections: IndexMap<CollectionId, CollectionSnapshot>,
    selection: Vec<NodeId>,
    plugin_data: BTreeMap<String, String>,
    viewport: Vec<NodeId>,
    navigations: Vec<String>,
    inserted_images: u64,
}

/// Host document held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: RwLock<DocumentState>,
}

impl MemoryDocument {
    /// Create document from snapshot
    #[must_use]
    pub fn new(snapshot: DocumentSnapshot) -> Self {
        let state = DocumentState {
            nodes: snapshot
                .nodes
                .into_iter()
                .map(|node| (node.id.clone(), node))
                .collect(),
            collections: snapshot
                .collections
                .into_iter()
                .map(|collection| (collection.id.clone(), collection))
                .collect(),
            selection: snapshot.selection,
            plugin_data: snapshot.plugin_data,
            ..DocumentState::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Parse a JSON document snapshot
    ///
    /// # Errors
    /// - `HostError::Snapshot` if the JSON does not describe a document
    pub fn from_json(json: &str) -> HostResult<Self> {
        let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Export the current state as a snapshot
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        let state = self.state.read();
        DocumentSnapshot {
            nodes: state.nodes.values().cloned().collect(),
            collections: state.collections.values().cloned().collect(),
            selection: state.selection.clone(),
            plugin_data: state.plugin_data.clone(),
        }
    }

    /// Export the current state as pretty-printed JSON
    ///
    /// # Errors
    /// - `HostError::Snapshot` if encoding fails
    pub fn to_json(&self) -> HostResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Insert or replace a node
    pub fn insert_node(&self, node: NodeSnapshot) {
        self.state.write().nodes.insert(node.id.clone(), node);
    }

    /// Remove a node, leaving its children dangling
    pub fn remove_node(&self, id: &NodeId) -> Option<NodeSnapshot> {
        self.state.write().nodes.shift_remove(id)
    }

    /// Remove a collection
    pub fn remove_collection(&self, id: &CollectionId) -> Option<CollectionSnapshot> {
        self.state.write().collections.shift_remove(id)
    }

    /// Read a node attribute directly
    #[must_use]
    pub fn node_attribute(&self, id: &NodeId, name: &str) -> Option<Value> {
        self.state
            .read()
            .nodes
            .get(id)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    /// Read an item directly
    #[must_use]
    pub fn item(&self, collection: &CollectionId, item: &str) -> Option<CollectionItem> {
        self.state.read().collections.get(collection).and_then(|c| {
            c.items
                .iter()
                .find(|candidate| candidate.id.as_str() == item)
                .cloned()
        })
    }

    /// Node ids most recently zoomed into view
    #[must_use]
    pub fn viewport(&self) -> Vec<NodeId> {
        self.state.read().viewport.clone()
    }

    /// Every navigation target requested so far
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.state.read().navigations.clone()
    }

    /// Number of nodes in the document
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.read().nodes.len()
    }
}

fn image_value(placement: &ImagePlacement) -> Value {
    let mut image = Map::new();
    image.insert("url".into(), json!(placement.image));
    if let Some(alt_text) = &placement.alt_text {
        image.insert("altText".into(), json!(alt_text));
    }
    Value::Object(image)
}

#[async_trait]
impl HostDocument for MemoryDocument {
    async fn nodes_with_attribute(&self, attribute: &str) -> HostResult<Vec<NodeRecord>> {
        let state = self.state.read();
        Ok(state
            .nodes
            .values()
            .filter(|node| node.attributes.get(attribute).is_some_and(|v| !v.is_null()))
            .map(NodeSnapshot::record)
            .collect())
    }

    async fn node(&self, id: &NodeId) -> HostResult<Option<NodeRecord>> {
        Ok(self.state.read().nodes.get(id).map(NodeSnapshot::record))
    }

    async fn parent(&self, id: &NodeId) -> HostResult<Option<NodeId>> {
        self.state
            .read()
            .nodes
            .get(id)
            .map(|node| node.parent.clone())
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))
    }

    async fn set_attributes(&self, id: &NodeId, attributes: Map<String, Value>) -> HostResult<()> {
        let mut state = self.state.write();
        let node = state
            .nodes
            .get_mut(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))?;
        node.attributes.extend(attributes);
        Ok(())
    }

    async fn collections(&self) -> HostResult<Vec<CollectionInfo>> {
        Ok(self
            .state
            .read()
            .collections
            .values()
            .map(|c| CollectionInfo {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect())
    }

    async fn fields(&self, collection: &CollectionId) -> HostResult<Vec<FieldDefinition>> {
        self.state
            .read()
            .collections
            .get(collection)
            .map(|c| c.fields.clone())
            .ok_or_else(|| HostError::CollectionNotFound(collection.to_string()))
    }

    async fn items(&self, collection: &CollectionId) -> HostResult<Vec<CollectionItem>> {
        self.state
            .read()
            .collections
            .get(collection)
            .map(|c| c.items.clone())
            .ok_or_else(|| HostError::CollectionNotFound(collection.to_string()))
    }

    async fn upsert_items(
        &self,
        collection: &CollectionId,
        items: Vec<ItemUpsert>,
    ) -> HostResult<()> {
        let mut state = self.state.write();
        let target = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| HostError::CollectionNotFound(collection.to_string()))?;

        for upsert in items {
            let item = CollectionItem {
                id: upsert.id,
                slug: Some(upsert.slug),
                field_data: upsert.field_data,
            };
            match target.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => *existing = item,
                None => target.items.push(item),
            }
        }
        Ok(())
    }

    async fn selection(&self) -> HostResult<Vec<NodeId>> {
        Ok(self.state.read().selection.clone())
    }

    async fn set_selection(&self, ids: &[NodeId]) -> HostResult<()> {
        self.state.write().selection = ids.to_vec();
        Ok(())
    }

    async fn zoom_into_view(&self, ids: &[NodeId]) -> HostResult<()> {
        self.state.write().viewport = ids.to_vec();
        Ok(())
    }

    async fn set_image(&self, image: ImagePlacement) -> HostResult<()> {
        let mut state = self.state.write();
        if state.selection.is_empty() {
            return Err(HostError::rejected("nothing selected"));
        }

        let value = image_value(&image);
        let selection = state.selection.clone();
        for id in &selection {
            if let Some(node) = state.nodes.get_mut(id) {
                node.attributes.insert(IMAGE_ATTRIBUTE.into(), value.clone());
            }
        }
        Ok(())
    }

    async fn add_image(&self, image: ImagePlacement) -> HostResult<NodeId> {
        let mut state = self.state.write();
        state.inserted_images += 1;
        let id = NodeId::new(format!("image-{}", state.inserted_images));

        let parent = state
            .nodes
            .values()
            .find(|node| node.parent.is_none())
            .map(|node| node.id.clone());

        let mut node = NodeSnapshot::new(id.clone())
            .with_name(image.name.clone().unwrap_or_else(|| "Image".to_string()))
            .with_attribute(IMAGE_ATTRIBUTE, image_value(&image));
        node.parent = parent;

        tracing::debug!("Inserted image node {}", id);
        state.nodes.insert(id.clone(), node);
        Ok(id)
    }

    async fn navigate_to(&self, target: &str) -> HostResult<()> {
        self.state.write().navigations.push(target.to_string());
        Ok(())
    }
}

#[async_trait]
impl PluginStorage for MemoryDocument {
    async fn plugin_data(&self, key: &str) -> HostResult<Option<String>> {
        Ok(self.state.read().plugin_data.get(key).cloned())
    }

    async fn set_plugin_data(&self, key: &str, value: &str) -> HostResult<()> {
        self.state
            .write()
            .plugin_data
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
