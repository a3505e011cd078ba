use assetify_host::{
    CollectionId, CollectionInfo, CollectionItem, FieldDefinition, HostDocument, HostError,
    HostResult, ImagePlacement, ItemUpsert, NodeId, NodeRecord,
};
use async_trait::async_trait;
use dashmap::DashSet;
use serde_json::{Map, Value};
use std::sync::Arc;

/// One [`HostDocument`] operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    NodesWithAttribute,
    Node,
    Parent,
    SetAttributes,
    Collections,
    Fields,
    Items,
    UpsertItems,
    Selection,
    SetSelection,
    ZoomIntoView,
    SetImage,
    AddImage,
    NavigateTo,
}

/// Host wrapper that fails chosen operations with `HostError::Unavailable`
pub struct FaultyDocument {
    inner: Arc<dyn HostDocument>,
    failing: DashSet<HostOp>,
    failing_attributes: DashSet<String>,
    failing_nodes: DashSet<NodeId>,
}

impl std::fmt::Debug for FaultyDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultyDocument")
            .field("failing", &self.failing)
            .field("failing_attributes", &self.failing_attributes)
            .field("failing_nodes", &self.failing_nodes)
            .finish_non_exhaustive()
    }
}

impl FaultyDocument {
    pub fn new(inner: Arc<dyn HostDocument>) -> Self {
        Self {
            inner,
            failing: DashSet::new(),
            failing_attributes: DashSet::new(),
            failing_nodes: DashSet::new(),
        }
    }

    /// Fail every call of `op`
    pub fn fail(self, op: HostOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// Fail `nodes_with_attribute` for one attribute name only
    pub fn fail_attribute(self, attribute: &str) -> Self {
        self.failing_attributes.insert(attribute.to_string());
        self
    }

    /// Fail `node` and `set_attributes` for one node only
    pub fn fail_node(self, id: &str) -> Self {
        self.failing_nodes.insert(NodeId::from(id));
        self
    }

    pub fn heal(&self, op: HostOp) {
        self.failing.remove(&op);
    }

    fn check(&self, op: HostOp) -> HostResult<()> {
        if self.failing.contains(&op) {
            Err(HostError::unavailable(format!("injected failure in {op:?}")))
        } else {
            Ok(())
        }
    }

    fn check_node(&self, op: HostOp, id: &NodeId) -> HostResult<()> {
        self.check(op)?;
        if self.failing_nodes.contains(id) {
            return Err(HostError::unavailable(format!("injected failure on node {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl HostDocument for FaultyDocument {
    async fn nodes_with_attribute(&self, attribute: &str) -> HostResult<Vec<NodeRecord>> {
        self.check(HostOp::NodesWithAttribute)?;
        if self.failing_attributes.contains(attribute) {
            return Err(HostError::unavailable(format!("injected failure for {attribute}")));
        }
        self.inner.nodes_with_attribute(attribute).await
    }

    async fn node(&self, id: &NodeId) -> HostResult<Option<NodeRecord>> {
        self.check_node(HostOp::Node, id)?;
        self.inner.node(id).await
    }

    async fn parent(&self, id: &NodeId) -> HostResult<Option<NodeId>> {
        self.check(HostOp::Parent)?;
        self.inner.parent(id).await
    }

    async fn set_attributes(&self, id: &NodeId, attributes: Map<String, Value>) -> HostResult<()> {
        self.check_node(HostOp::SetAttributes, id)?;
        self.inner.set_attributes(id, attributes).await
    }

    async fn collections(&self) -> HostResult<Vec<CollectionInfo>> {
        self.check(HostOp::Collections)?;
        self.inner.collections().await
    }

    async fn fields(&self, collection: &CollectionId) -> HostResult<Vec<FieldDefinition>> {
        self.check(HostOp::Fields)?;
        self.inner.fields(collection).await
    }

    async fn items(&self, collection: &CollectionId) -> HostResult<Vec<CollectionItem>> {
        self.check(HostOp::Items)?;
        self.inner.items(collection).await
    }

    async fn upsert_items(
        &self,
        collection: &CollectionId,
        items: Vec<ItemUpsert>,
    ) -> HostResult<()> {
        self.check(HostOp::UpsertItems)?;
        self.inner.upsert_items(collection, items).await
    }

    async fn selection(&self) -> HostResult<Vec<NodeId>> {
        self.check(HostOp::Selection)?;
        self.inner.selection().await
    }

    async fn set_selection(&self, ids: &[NodeId]) -> HostResult<()> {
        self.check(HostOp::SetSelection)?;
        self.inner.set_selection(ids).await
    }

    async fn zoom_into_view(&self, ids: &[NodeId]) -> HostResult<()> {
        self.check(HostOp::ZoomIntoView)?;
        self.inner.zoom_into_view(ids).await
    }

    async fn set_image(&self, image: ImagePlacement) -> HostResult<()> {
        self.check(HostOp::SetImage)?;
        self.inner.set_image(image).await
    }

    async fn add_image(&self, image: ImagePlacement) -> HostResult<NodeId> {
        self.check(HostOp::AddImage)?;
        self.inner.add_image(image).await
    }

    async fn navigate_to(&self, target: &str) -> HostResult<()> {
        self.check(HostOp::NavigateTo)?;
        self.inner.navigate_to(target).await
    }
}
