//! Shape normalizer for loosely-typed asset payloads
//!
//! Image attributes and collection image fields arrive in two shapes:
//!
//! ```text
//! Flat:    { "url": "...", "altText": "...", "name": "..." }
//! Wrapped: { "type": "image", "value": { "url": "...", "altText": "...", "name": "..." } }
//! ```
//!
//! Both collapse into [`ImageData`]. Anything else, including `null`,
//! scalars and objects without a usable URL, is [`AssetPayload::NotAnAsset`].

use serde_json::{Map, Value};

/// Canonical image payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageData {
    /// Resource URL, never empty
    pub url: String,
    /// Accessibility text, empty if unset
    pub alt_text: String,
    /// Embedded asset name, empty if unset
    pub name: String,
}

/// Result of reading a raw payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPayload {
    /// Value does not describe an image-like asset
    NotAnAsset,
    /// Value describes an asset
    Asset(ImageData),
}

impl AssetPayload {
    /// Convert into the image data, if any
    #[inline]
    #[must_use]
    pub fn into_asset(self) -> Option<ImageData> {
        match self {
            Self::Asset(data) => Some(data),
            Self::NotAnAsset => None,
        }
    }

    /// Check if payload is an asset
    #[inline]
    #[must_use]
    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset(_))
    }
}

/// Layout of a payload object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Fields live directly on the object
    Flat,
    /// Fields live under a nested `value` object
    Wrapped,
}

/// File object stored in a component control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAsset {
    /// Resource URL, never empty
    pub url: String,
    /// MIME type, empty if unknown
    pub mime_type: String,
    /// Uploaded file name
    pub name: Option<String>,
}

/// Detect the layout of a payload, `None` for non-objects
#[must_use]
pub fn payload_shape(raw: &Value) -> Option<PayloadShape> {
    let object = raw.as_object()?;
    match object.get("value") {
        Some(Value::Object(_)) => Some(PayloadShape::Wrapped),
        _ => Some(PayloadShape::Flat),
    }
}

fn payload_fields(raw: &Value) -> Option<&Map<String, Value>> {
    let object = raw.as_object()?;
    match object.get("value") {
        Some(Value::Object(inner)) => Some(inner),
        _ => Some(object),
    }
}

fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Read an image-like payload of either shape
///
/// `url` wins over `src` whenever it is present and non-null, even if it is
/// then unusable.
#[must_use]
pub fn read_image_data(raw: &Value) -> AssetPayload {
    let Some(fields) = payload_fields(raw) else {
        return AssetPayload::NotAnAsset;
    };

    let url = match fields.get("url") {
        Some(url) if !url.is_null() => url,
        _ => fields.get("src").unwrap_or(&Value::Null),
    };

    match url.as_str() {
        Some(url) if !url.is_empty() => AssetPayload::Asset(ImageData {
            url: url.to_string(),
            alt_text: string_field(fields, "altText").to_string(),
            name: string_field(fields, "name").to_string(),
        }),
        _ => AssetPayload::NotAnAsset,
    }
}

/// Copy a payload with `altText` replaced, keeping its shape
///
/// Returns `None` when the value is not an object.
#[must_use]
pub fn replace_alt_text(raw: &Value, alt_text: &str) -> Option<Value> {
    let object = raw.as_object()?;
    let mut updated = object.clone();

    if let Some(inner) = object.get("value") {
        let mut inner = inner.as_object().cloned().unwrap_or_default();
        inner.insert("altText".into(), Value::String(alt_text.to_string()));
        updated.insert("value".into(), Value::Object(inner));
    } else {
        updated.insert("altText".into(), Value::String(alt_text.to_string()));
    }

    Some(Value::Object(updated))
}

/// Read a file object (`{ url, mimeType, name }`) from a control value
#[must_use]
pub fn read_file_asset(raw: &Value) -> Option<FileAsset> {
    let object = raw.as_object()?;
    let url = object.get("url").and_then(Value::as_str)?;
    if url.is_empty() {
        return None;
    }

    Some(FileAsset {
        url: url.to_string(),
        mime_type: string_field(object, "mimeType").to_string(),
        name: object
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn reads_flat_payload() {
        let raw = json!({"url": "https://x/a.png", "altText": "A", "name": "a.png"});
        assert_eq!(
            read_image_data(&raw),
            AssetPayload::Asset(ImageData {
                url: "https://x/a.png".into(),
                alt_text: "A".into(),
                name: "a.png".into(),
            })
        );
    }

    #[test]
    fn reads_wrapped_payload() {
        let raw = json!({"type": "image", "value": {"url": "https://x/a.png", "altText": "A"}});
        let data = read_image_data(&raw).into_asset().unwrap();
        assert_eq!(data.url, "https://x/a.png");
        assert_eq!(data.alt_text, "A");
        assert_eq!(data.name, "");
        assert_eq!(payload_shape(&raw), Some(PayloadShape::Wrapped));
    }

    #[test]
    fn falls_back_to_src() {
        let raw = json!({"src": "https://x/b.png"});
        assert_eq!(read_image_data(&raw).into_asset().unwrap().url, "https://x/b.png");

        let raw = json!({"url": null, "src": "https://x/b.png"});
        assert!(read_image_data(&raw).is_asset());
    }

    #[test]
    fn present_but_empty_url_shadows_src() {
        let raw = json!({"url": "", "src": "https://x/b.png"});
        assert_eq!(read_image_data(&raw), AssetPayload::NotAnAsset);
    }

    #[test]
    fn malformed_inputs_are_not_assets() {
        for raw in [
            Value::Null,
            json!(7),
            json!("https://x/a.png"),
            json!([]),
            json!({}),
            json!({"altText": "orphan"}),
            json!({"url": 42}),
            json!({"value": {}}),
            json!({"value": null}),
        ] {
            assert_eq!(read_image_data(&raw), AssetPayload::NotAnAsset, "{raw}");
        }
    }

    #[test]
    fn non_string_alt_text_reads_empty() {
        let raw = json!({"url": "https://x/a.png", "altText": 5, "name": false});
        let data = read_image_data(&raw).into_asset().unwrap();
        assert_eq!(data.alt_text, "");
        assert_eq!(data.name, "");
    }

    #[test]
    fn replace_alt_text_keeps_shape() {
        let flat = json!({"url": "https://x/a.png", "altText": "old", "id": "img"});
        assert_eq!(
            replace_alt_text(&flat, "new").unwrap(),
            json!({"url": "https://x/a.png", "altText": "new", "id": "img"})
        );

        let wrapped = json!({"type": "image", "value": {"url": "https://x/a.png"}});
        assert_eq!(
            replace_alt_text(&wrapped, "new").unwrap(),
            json!({"type": "image", "value": {"url": "https://x/a.png", "altText": "new"}})
        );

        assert_eq!(replace_alt_text(&json!("x"), "new"), None);
    }

    #[test]
    fn reads_file_assets() {
        let file = read_file_asset(&json!({
            "url": "https://x/clip",
            "mimeType": "video/mp4",
            "name": "clip.mp4"
        }))
        .unwrap();
        assert_eq!(file.mime_type, "video/mp4");
        assert_eq!(file.name.as_deref(), Some("clip.mp4"));

        assert!(read_file_asset(&json!({"url": ""})).is_none());
        assert!(read_file_asset(&json!("https://x/clip.mp4")).is_none());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map(
                    prop_oneof![
                        Just("url".to_string()),
                        Just("src".to_string()),
                        Just("value".to_string()),
                        Just("altText".to_string()),
                        "[a-z]{1,6}",
                    ],
                    inner,
                    0..4
                )
                .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_never_panics_and_assets_have_urls(raw in arb_json()) {
            if let AssetPayload::Asset(data) = read_image_data(&raw) {
                prop_assert!(!data.url.is_empty());
            }
        }

        #[test]
        fn prop_non_objects_are_not_assets(text in ".*", n in any::<i64>()) {
            prop_assert_eq!(read_image_data(&Value::String(text)), AssetPayload::NotAnAsset);
            prop_assert_eq!(read_image_data(&json!(n)), AssetPayload::NotAnAsset);
        }
    }
}
