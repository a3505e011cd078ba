//! Mutation operations
//!
//! Write paths back into the host document, each scoped to one asset. Unlike
//! scanning, these report failure to the caller.

use crate::catalog::AssetCatalog;
use crate::error::{MutationError, MutationResult};
use crate::normalize::{read_image_data, replace_alt_text};
use crate::types::{AssetEntry, AssetSource};
use assetify_host::{CollectionId, ImagePlacement, ItemId, ItemUpsert, NodeId};
use serde_json::{Map, Value};

/// What a smart add did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartAddOutcome {
    /// Image set on the current selection
    Set,
    /// New image node inserted
    Add,
    /// Video: viewport moved to its usage instead
    Navigated,
}

impl SmartAddOutcome {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Navigated => "navigate",
        }
    }
}

impl std::fmt::Display for SmartAddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AssetCatalog {
    /// Write new alt text for an asset
    ///
    /// Canvas assets are updated node by node; nodes that disappeared or no
    /// longer carry an image are skipped. Collection assets rewrite the
    /// owning item, keeping the field's payload shape.
    ///
    /// # Errors
    /// - `MutationError::CollectionNotFound` / `ItemNotFound` / `FieldNotFound`
    ///   if the collection field no longer exists
    /// - `MutationError::UnsupportedFieldShape` if the field is not an object
    /// - `MutationError::InvalidKey` if a collection entry lacks its ids or its
    ///   key does not address them
    /// - `MutationError::Host` if the host fails; canvas writes still attempt
    ///   every node and report the first failure
    pub async fn save_alt_text(&self, entry: &AssetEntry, alt_text: &str) -> MutationResult<()> {
        match entry.source {
            AssetSource::Canvas => self.save_canvas_alt_text(&entry.node_ids, alt_text).await,
            AssetSource::Collection => {
                let (Some(collection), Some(item)) =
                    (&entry.cms_collection_id, &entry.cms_item_id)
                else {
                    return Err(MutationError::InvalidKey(entry.key.to_string()));
                };
                let field = entry
                    .key
                    .collection_field_id(collection, item)
                    .ok_or_else(|| MutationError::InvalidKey(entry.key.to_string()))?;
                self.save_collection_alt_text(collection, item, field, alt_text).await
            }
        }
    }

    /// Every node is attempted; the first host error is returned afterwards
    async fn save_canvas_alt_text(&self, node_ids: &[NodeId], alt_text: &str) -> MutationResult<()> {
        let mut written = 0usize;
        let mut first_error: Option<MutationError> = None;

        for id in node_ids {
            match self.save_node_alt_text(id, alt_text).await {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!("Failed to save alt text on node {}: {}", id, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        tracing::info!("Saved alt text on {} of {} nodes", written, node_ids.len());
        first_error.map_or(Ok(()), Err)
    }

    /// `Ok(false)` when the node is gone or carries no image
    async fn save_node_alt_text(&self, id: &NodeId, alt_text: &str) -> MutationResult<bool> {
        let attribute = &self.config.image_attribute;
        let Some(node) = self.host.node(id).await? else {
            tracing::debug!("Skipping alt text for missing node {}", id);
            return Ok(false);
        };
        let Some(updated) = node
            .attribute(attribute)
            .filter(|raw| read_image_data(raw).is_asset())
            .and_then(|raw| replace_alt_text(raw, alt_text))
        else {
            tracing::debug!("Skipping alt text for node {} without image", id);
            return Ok(false);
        };

        let mut attributes = Map::new();
        attributes.insert(attribute.clone(), updated);
        self.host.set_attributes(id, attributes).await?;
        Ok(true)
    }

    async fn save_collection_alt_text(
        &self,
        collection: &CollectionId,
        item_id: &ItemId,
        field: &str,
        alt_text: &str,
    ) -> MutationResult<()> {
        let exists = self
            .host
            .collections()
            .await?
            .iter()
            .any(|info| &info.id == collection);
        if !exists {
            return Err(MutationError::CollectionNotFound);
        }

        let item = self
            .host
            .items(collection)
            .await?
            .into_iter()
            .find(|item| &item.id == item_id)
            .ok_or(MutationError::ItemNotFound)?;

        let raw = match item.field(field) {
            None | Some(Value::Null) => return Err(MutationError::FieldNotFound),
            Some(raw) => raw,
        };
        let updated = replace_alt_text(raw, alt_text)
            .ok_or_else(|| MutationError::UnsupportedFieldShape(field.to_string()))?;

        let mut field_data = item.field_data.clone();
        field_data.insert(field.to_string(), updated);
        let slug = item.slug().unwrap_or(item.id.as_str()).to_string();

        self.host
            .upsert_items(
                collection,
                vec![ItemUpsert {
                    id: item.id.clone(),
                    slug,
                    field_data,
                }],
            )
            .await?;

        tracing::info!("Saved alt text on {}/{} field {}", collection, item_id, field);
        Ok(())
    }

    /// Place an asset on the canvas
    ///
    /// With a selection the image is set on it, otherwise a new image node
    /// is inserted. Videos are not placed; the viewport moves to their first
    /// usage instead.
    ///
    /// # Errors
    /// - `MutationError::NoUsageLocation` for a video with nowhere to go
    /// - `MutationError::Host` if the host rejects the operation
    pub async fn smart_add(&self, entry: &AssetEntry) -> MutationResult<SmartAddOutcome> {
        if entry.is_video() {
            if let Some(node_id) = entry.navigate_id.as_ref().or_else(|| entry.node_ids.first()) {
                self.navigate_to_node(node_id).await?;
            } else if let Some(item_id) = &entry.cms_item_id {
                self.navigate_to_item(item_id).await?;
            } else {
                return Err(MutationError::NoUsageLocation);
            }
            return Ok(SmartAddOutcome::Navigated);
        }

        let placement = ImagePlacement::new(entry.url.clone()).with_alt_text(entry.alt_text.clone());
        if self.host.selection().await?.is_empty() {
            let node_id = self
                .host
                .add_image(placement.with_name(entry.name.clone()))
                .await?;
            tracing::info!("Inserted {} as node {}", entry.key, node_id);
            Ok(SmartAddOutcome::Add)
        } else {
            self.host.set_image(placement).await?;
            tracing::info!("Set {} on selection", entry.key);
            Ok(SmartAddOutcome::Set)
        }
    }

    /// Select a node and zoom the viewport to it
    ///
    /// # Errors
    /// - `MutationError::Host` if the host rejects either step
    pub async fn navigate_to_node(&self, node_id: &NodeId) -> MutationResult<()> {
        let ids = std::slice::from_ref(node_id);
        self.host.set_selection(ids).await?;
        self.host.zoom_into_view(ids).await?;
        Ok(())
    }

    /// Open a collection item in the editor
    ///
    /// # Errors
    /// - `MutationError::Host` if the host rejects navigation
    pub async fn navigate_to_item(&self, item_id: &ItemId) -> MutationResult<()> {
        self.host.navigate_to(item_id.as_str()).await?;
        Ok(())
    }
}
