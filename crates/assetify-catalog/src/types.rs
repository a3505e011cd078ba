//! Catalog data model
//!
//! [`AssetEntry`] is the unit of record. Every field except `alt_text` is
//! fixed for the lifetime of a catalog snapshot; the next refresh rebuilds
//! the whole catalog rather than patching it.

use assetify_host::{CollectionId, ItemId, NodeId};
use serde::{Deserialize, Serialize};

/// Which part of the host document an asset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSource {
    /// Canvas node attribute
    #[serde(rename = "canvas")]
    Canvas,
    /// Structured collection field
    #[serde(rename = "cms")]
    Collection,
}

impl AssetSource {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Collection => "cms",
        }
    }
}

impl std::fmt::Display for AssetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of media behind an asset URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Still image
    Image,
    /// Video file
    Video,
}

impl AssetType {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the asset binary is hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageSource {
    /// Hosted by the document platform
    #[serde(rename = "framer")]
    FirstParty,
    /// Hosted by a third party
    #[serde(rename = "external")]
    External,
}

impl StorageSource {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstParty => "framer",
            Self::External => "external",
        }
    }
}

impl std::fmt::Display for StorageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of one logical asset within a snapshot
///
/// Tagged by origin:
/// - `canvas:<id>` for canvas images (asset id or normalized URL)
/// - `video:<url>` for canvas videos
/// - `cms:<collectionId>:<itemId>:<fieldId>` for collection fields
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetKey(String);

/// Parsed form of an [`AssetKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin<'a> {
    /// Canvas image, keyed by canonical id
    Canvas(&'a str),
    /// Canvas video, keyed by URL
    Video(&'a str),
    /// Collection field location
    Collection {
        /// Collection id
        collection: &'a str,
        /// Item id
        item: &'a str,
        /// Field id (may itself contain `:`)
        field: &'a str,
    },
}

impl AssetKey {
    /// Key for a canvas image group
    #[inline]
    #[must_use]
    pub fn canvas(canonical: &str) -> Self {
        Self(format!("canvas:{canonical}"))
    }

    /// Key for a canvas video group
    #[inline]
    #[must_use]
    pub fn video(url: &str) -> Self {
        Self(format!("video:{url}"))
    }

    /// Key for a collection field value
    #[inline]
    #[must_use]
    pub fn collection_field(collection: &CollectionId, item: &ItemId, field: &str) -> Self {
        Self(format!("cms:{collection}:{item}:{field}"))
    }

    /// Wrap a raw key string without validation
    #[inline]
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw key
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Field id of a collection key addressed at `collection`/`item`
    ///
    /// Ids may contain `:`, so the known ids are stripped as a prefix rather
    /// than split out of the key.
    #[must_use]
    pub fn collection_field_id(&self, collection: &CollectionId, item: &ItemId) -> Option<&str> {
        let field = self
            .0
            .strip_prefix("cms:")?
            .strip_prefix(collection.as_str())?
            .strip_prefix(':')?
            .strip_prefix(item.as_str())?
            .strip_prefix(':')?;
        (!field.is_empty()).then_some(field)
    }

    /// Parse the origin tag, `None` for unknown tags or truncated keys
    ///
    /// Collection ids containing `:` are ambiguous here; write-back uses
    /// [`AssetKey::collection_field_id`] instead.
    #[must_use]
    pub fn origin(&self) -> Option<KeyOrigin<'_>> {
        let (tag, rest) = self.0.split_once(':')?;
        match tag {
            "canvas" => Some(KeyOrigin::Canvas(rest)),
            "video" => Some(KeyOrigin::Video(rest)),
            "cms" => {
                let mut parts = rest.splitn(3, ':');
                let collection = parts.next()?;
                let item = parts.next()?;
                let field = parts.next()?;
                Some(KeyOrigin::Collection {
                    collection,
                    item,
                    field,
                })
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logical asset in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    /// Unique key within the snapshot
    pub key: AssetKey,
    /// Best-effort display name
    pub name: String,
    /// Resource URL, possibly carrying variant query parameters
    pub url: String,
    /// Accessibility description, empty if unset
    pub alt_text: String,
    /// Origin subsystem
    pub source: AssetSource,
    /// Derived media kind
    pub asset_type: AssetType,
    /// Derived storage provenance
    pub storage_source: StorageSource,
    /// Referencing canvas nodes, deduplicated, in discovery order
    pub node_ids: Vec<NodeId>,
    /// Human-readable usage summary
    pub location_label: String,
    /// Page of the first usage, empty when unresolved
    pub page_name: String,
    /// First usage node for single-click navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_id: Option<NodeId>,
    /// Owning collection, collection entries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_collection_id: Option<CollectionId>,
    /// Owning item, collection entries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_item_id: Option<ItemId>,
}

impl AssetEntry {
    /// Check if entry is a video
    #[inline]
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.asset_type == AssetType::Video
    }

    /// Number of canvas usages
    #[inline]
    #[must_use]
    pub fn usage_count(&self) -> usize {
        self.node_ids.len()
    }
}
