use crate::faulty::HostOp;
use assetify_host::{
    CollectionId, CollectionInfo, CollectionItem, FieldDefinition, HostDocument, HostResult,
    ImagePlacement, ItemUpsert, NodeId, NodeRecord,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Host wrapper that counts calls per operation
pub struct CountingDocument {
    inner: Arc<dyn HostDocument>,
    calls: DashMap<HostOp, usize>,
}

impl std::fmt::Debug for CountingDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingDocument")
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}

impl CountingDocument {
    pub fn new(inner: Arc<dyn HostDocument>) -> Self {
        Self {
            inner,
            calls: DashMap::new(),
        }
    }

    pub fn calls(&self, op: HostOp) -> usize {
        self.calls.get(&op).map_or(0, |count| *count)
    }

    pub fn reset(&self) {
        self.calls.clear();
    }

    fn record(&self, op: HostOp) {
        *self.calls.entry(op).or_insert(0) += 1;
    }
}

#[async_trait]
impl HostDocument for CountingDocument {
    async fn nodes_with_attribute(&self, attribute: &str) -> HostResult<Vec<NodeRecord>> {
        self.record(HostOp::NodesWithAttribute);
        self.inner.nodes_with_attribute(attribute).await
    }

    async fn node(&self, id: &NodeId) -> HostResult<Option<NodeRecord>> {
        self.record(HostOp::Node);
        self.inner.node(id).await
    }

    async fn parent(&self, id: &NodeId) -> HostResult<Option<NodeId>> {
        self.record(HostOp::Parent);
        self.inner.parent(id).await
    }

    async fn set_attributes(&self, id: &NodeId, attributes: Map<String, Value>) -> HostResult<()> {
        self.record(HostOp::SetAttributes);
        self.inner.set_attributes(id, attributes).await
    }

    async fn collections(&self) -> HostResult<Vec<CollectionInfo>> {
        self.record(HostOp::Collections);
        self.inner.collections().await
    }

    async fn fields(&self, collection: &CollectionId) -> HostResult<Vec<FieldDefinition>> {
        self.record(HostOp::Fields);
        self.inner.fields(collection).await
    }

    async fn items(&self, collection: &CollectionId) -> HostResult<Vec<CollectionItem>> {
        self.record(HostOp::Items);
        self.inner.items(collection).await
    }

    async fn upsert_items(
        &self,
        collection: &CollectionId,
        items: Vec<ItemUpsert>,
    ) -> HostResult<()> {
        self.record(HostOp::UpsertItems);
        self.inner.upsert_items(collection, items).await
    }

    async fn selection(&self) -> HostResult<Vec<NodeId>> {
        self.record(HostOp::Selection);
        self.inner.selection().await
    }

    async fn set_selection(&self, ids: &[NodeId]) -> HostResult<()> {
        self.record(HostOp::SetSelection);
        self.inner.set_selection(ids).await
    }

    async fn zoom_into_view(&self, ids: &[NodeId]) -> HostResult<()> {
        self.record(HostOp::ZoomIntoView);
        self.inner.zoom_into_view(ids).await
    }

    async fn set_image(&self, image: ImagePlacement) -> HostResult<()> {
        self.record(HostOp::SetImage);
        self.inner.set_image(image).await
    }

    async fn add_image(&self, image: ImagePlacement) -> HostResult<NodeId> {
        self.record(HostOp::AddImage);
        self.inner.add_image(image).await
    }

    async fn navigate_to(&self, target: &str) -> HostResult<()> {
        self.record(HostOp::NavigateTo);
        self.inner.navigate_to(target).await
    }
}
