//! Host value types
//!
//! Identifiers are opaque strings handed out by the host. Attribute bags and
//! collection field data stay as [`serde_json::Value`]: the host gives no
//! guarantees about their shape, so interpretation is left to the catalog.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create identifier from any string
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Canvas node identifier
    NodeId
);
string_id!(
    /// Structured collection identifier
    CollectionId
);
string_id!(
    /// Collection item identifier
    ItemId
);

/// A canvas node as returned by attribute queries and lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node identifier
    pub id: NodeId,
    /// Every attribute the host exposes for this node
    pub attributes: Map<String, Value>,
}

impl NodeRecord {
    /// Create node record
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, attributes: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Read a raw attribute
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Read a string attribute, ignoring other value types
    #[inline]
    #[must_use]
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// The node's own `name` attribute, if it is a non-empty string
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.string_attribute("name").filter(|n| !n.is_empty())
    }
}

/// Collection summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection identifier
    pub id: CollectionId,
    /// Display name
    pub name: String,
}

/// Kind of a collection field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Image field
    Image,
    /// File field
    File,
    /// Plain string
    String,
    /// Formatted text
    FormattedText,
    /// Link
    Link,
    /// Anything the catalog does not inspect
    #[serde(other)]
    Other,
}

/// Field definition of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field identifier (key into item field data)
    pub id: String,
    /// Display name
    pub name: String,
    /// Field kind
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

impl FieldDefinition {
    /// Create field definition
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Check if field holds images
    #[inline]
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.kind == FieldKind::Image
    }
}

/// An item stored in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    /// Item identifier
    pub id: ItemId,
    /// URL slug, when the collection defines one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Field values keyed by field id
    #[serde(default)]
    pub field_data: Map<String, Value>,
}

impl CollectionItem {
    /// Read a raw field value
    #[inline]
    #[must_use]
    pub fn field(&self, field_id: &str) -> Option<&Value> {
        self.field_data.get(field_id)
    }

    /// Slug if present and non-empty
    #[inline]
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }
}

/// Batch upsert payload for one item, keyed by id and slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpsert {
    /// Item identifier
    pub id: ItemId,
    /// Item slug
    pub slug: String,
    /// Complete field data to store
    pub field_data: Map<String, Value>,
}

/// Image to place on the canvas, either on the selection or as a new node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    /// Image URL
    pub image: String,
    /// Node name for inserted images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Accessibility text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl ImagePlacement {
    /// Create placement for URL
    #[inline]
    #[must_use]
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: None,
            alt_text: None,
        }
    }

    /// With node name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With alt text; empty text is treated as unset
    #[inline]
    #[must_use]
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        let alt_text = alt_text.into();
        self.alt_text = (!alt_text.is_empty()).then_some(alt_text);
        self
    }
}
