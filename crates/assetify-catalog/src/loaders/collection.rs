//! Structured collection loader

use super::{LoaderContext, SourceLoader};
use crate::classify::{classify_asset_type, detect_storage_source};
use crate::error::CatalogResult;
use crate::label::collection_location_label;
use crate::normalize::read_image_data;
use crate::types::{AssetEntry, AssetKey, AssetSource};
use assetify_host::FieldDefinition;
use async_trait::async_trait;

/// Image fields of every collection item
#[derive(Debug, Clone)]
pub struct CollectionLoader {
    ctx: LoaderContext,
}

impl CollectionLoader {
    /// Create loader
    #[inline]
    #[must_use]
    pub fn new(ctx: LoaderContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl SourceLoader for CollectionLoader {
    fn name(&self) -> &'static str {
        "collections"
    }

    async fn try_load(&self) -> CatalogResult<Vec<AssetEntry>> {
        let host = &self.ctx.host;
        let config = &self.ctx.config;
        let mut entries = Vec::new();

        for collection in host.collections().await? {
            let fields: Vec<FieldDefinition> = host
                .fields(&collection.id)
                .await?
                .into_iter()
                .filter(FieldDefinition::is_image)
                .collect();
            if fields.is_empty() {
                continue;
            }

            for item in host.items(&collection.id).await? {
                for field in &fields {
                    let Some(data) = item
                        .field(&field.id)
                        .and_then(|raw| read_image_data(raw).into_asset())
                    else {
                        continue;
                    };

                    let name = [field.name.as_str(), data.name.as_str()]
                        .into_iter()
                        .find(|name| !name.is_empty())
                        .unwrap_or(config.untitled_name.as_str())
                        .to_string();

                    entries.push(AssetEntry {
                        key: AssetKey::collection_field(&collection.id, &item.id, &field.id),
                        name,
                        asset_type: classify_asset_type(&data.url, None),
                        storage_source: detect_storage_source(&data.url, &config.first_party_hosts),
                        url: data.url,
                        alt_text: data.alt_text,
                        source: AssetSource::Collection,
                        node_ids: Vec::new(),
                        location_label: collection_location_label(
                            &collection.name,
                            item.slug(),
                            item.id.as_str(),
                        ),
                        page_name: String::new(),
                        navigate_id: None,
                        cms_collection_id: Some(collection.id.clone()),
                        cms_item_id: Some(item.id.clone()),
                    });
                }
            }
        }

        Ok(entries)
    }
}
