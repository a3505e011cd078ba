//! Identity and dedup engine
//!
//! Responsive layouts replicate the same image on every breakpoint, often
//! with a different `?scale=` or CDN parameter. Occurrences are grouped by a
//! canonical key so each logical asset yields one catalog entry that lists
//! all of its usage nodes.

use crate::classify::normalize_url;
use crate::normalize::ImageData;
use assetify_host::{NodeId, NodeRecord};
use indexmap::IndexMap;
use serde_json::Value;

fn is_placeholder(untitled: &str, name: &str) -> bool {
    name.is_empty() || name == untitled
}

fn push_unique(node_ids: &mut Vec<NodeId>, id: &NodeId) -> bool {
    if node_ids.contains(id) {
        false
    } else {
        node_ids.push(id.clone());
        true
    }
}

/// Canonical identity of a canvas image occurrence
///
/// An explicit, non-empty `id` on the raw payload wins; otherwise the URL
/// without query string and fragment.
#[must_use]
pub fn canonical_image_key(raw: &Value, data: &ImageData) -> String {
    match raw.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => normalize_url(&data.url).to_string(),
    }
}

/// All occurrences of one canvas image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    /// Canonical key
    pub canonical: String,
    /// URL of the first occurrence
    pub url: String,
    /// Best display name found so far
    pub name: String,
    /// Alt text of the first occurrence
    pub alt_text: String,
    /// Referencing nodes, deduplicated, in discovery order
    pub node_ids: Vec<NodeId>,
}

/// Accumulator for canvas image occurrences
#[derive(Debug, Clone)]
pub struct ImageGroups {
    groups: IndexMap<String, ImageGroup>,
    untitled: String,
}

impl ImageGroups {
    /// Create accumulator using the given placeholder name
    #[inline]
    #[must_use]
    pub fn new(untitled: impl Into<String>) -> Self {
        Self {
            groups: IndexMap::new(),
            untitled: untitled.into(),
        }
    }

    /// Record one occurrence on `node`
    ///
    /// A group's name is only replaced while it is still the placeholder; the
    /// node's own name is preferred over the payload's embedded name.
    pub fn record(&mut self, node: &NodeRecord, raw: &Value, data: ImageData) {
        let canonical = canonical_image_key(raw, &data);
        let candidate = node
            .name()
            .map(ToString::to_string)
            .or_else(|| (!data.name.is_empty()).then(|| data.name.clone()));

        if let Some(group) = self.groups.get_mut(&canonical) {
            push_unique(&mut group.node_ids, &node.id);
            if is_placeholder(&self.untitled, &group.name) {
                if let Some(name) = candidate {
                    group.name = name;
                }
            }
            return;
        }

        let name = candidate.unwrap_or_else(|| self.untitled.clone());
        self.groups.insert(
            canonical.clone(),
            ImageGroup {
                canonical,
                url: data.url,
                name,
                alt_text: data.alt_text,
                node_ids: vec![node.id.clone()],
            },
        );
    }

    /// Number of distinct images
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume into groups, in first-seen order
    pub fn into_groups(self) -> impl Iterator<Item = ImageGroup> {
        self.groups.into_values()
    }
}

/// All occurrences of one canvas video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoGroup {
    /// Resource URL, also the canonical key
    pub url: String,
    /// Name of the first occurrence
    pub name: String,
    /// Referencing nodes, deduplicated, in discovery order
    pub node_ids: Vec<NodeId>,
}

/// Accumulator for canvas video occurrences, keyed by exact URL
#[derive(Debug, Clone, Default)]
pub struct VideoGroups {
    groups: IndexMap<String, VideoGroup>,
}

impl VideoGroups {
    /// Create empty accumulator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence on `node_id`
    pub fn record(&mut self, node_id: &NodeId, url: String, name: String) {
        match self.groups.get_mut(&url) {
            Some(group) => {
                push_unique(&mut group.node_ids, node_id);
            }
            None => {
                self.groups.insert(
                    url.clone(),
                    VideoGroup {
                        url,
                        name,
                        node_ids: vec![node_id.clone()],
                    },
                );
            }
        }
    }

    /// Number of distinct videos
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume into groups, in first-seen order
    pub fn into_groups(self) -> impl Iterator<Item = VideoGroup> {
        self.groups.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn node(id: &str, name: Option<&str>) -> NodeRecord {
        let mut attributes = Map::new();
        if let Some(name) = name {
            attributes.insert("name".into(), json!(name));
        }
        NodeRecord::new(id, attributes)
    }

    fn data(url: &str, name: &str) -> ImageData {
        ImageData {
            url: url.into(),
            alt_text: String::new(),
            name: name.into(),
        }
    }

    #[test]
    fn explicit_id_wins_over_url() {
        let raw = json!({"id": "img-7", "url": "https://x/a.png?scale=2"});
        assert_eq!(canonical_image_key(&raw, &data("https://x/a.png?scale=2", "")), "img-7");

        let raw = json!({"id": "", "url": "https://x/a.png?scale=2"});
        assert_eq!(
            canonical_image_key(&raw, &data("https://x/a.png?scale=2", "")),
            "https://x/a.png"
        );

        let raw = json!({"id": 3, "url": "https://x/a.png"});
        assert_eq!(canonical_image_key(&raw, &data("https://x/a.png", "")), "https://x/a.png");
    }

    #[test]
    fn query_variants_merge() {
        let mut groups = ImageGroups::new("Untitled");
        for (id, url) in [("n1", "https://x/a.png?scale=1"), ("n2", "https://x/a.png?scale=2")] {
            let raw = json!({"url": url});
            groups.record(&node(id, None), &raw, data(url, ""));
        }

        assert_eq!(groups.len(), 1);
        let group = groups.into_groups().next().unwrap();
        assert_eq!(group.node_ids, vec![NodeId::from("n1"), NodeId::from("n2")]);
        assert_eq!(group.url, "https://x/a.png?scale=1");
        assert_eq!(group.name, "Untitled");
    }

    #[test]
    fn node_ids_are_deduplicated() {
        let mut groups = ImageGroups::new("Untitled");
        let raw = json!({"url": "https://x/a.png"});
        groups.record(&node("n1", None), &raw, data("https://x/a.png", ""));
        groups.record(&node("n1", None), &raw, data("https://x/a.png", ""));

        let group = groups.into_groups().next().unwrap();
        assert_eq!(group.node_ids.len(), 1);
    }

    #[test]
    fn placeholder_name_is_upgraded_once() {
        let mut groups = ImageGroups::new("Untitled");
        let raw = json!({"url": "https://x/a.png"});
        groups.record(&node("n1", None), &raw, data("https://x/a.png", ""));
        groups.record(&node("n2", Some("Hero")), &raw, data("https://x/a.png", "a.png"));
        groups.record(&node("n3", Some("Banner")), &raw, data("https://x/a.png", ""));

        let group = groups.into_groups().next().unwrap();
        assert_eq!(group.name, "Hero");
    }

    #[test]
    fn node_name_preferred_over_embedded_name() {
        let mut groups = ImageGroups::new("Untitled");
        let raw = json!({"url": "https://x/a.png"});
        groups.record(&node("n1", Some("Hero")), &raw, data("https://x/a.png", "a.png"));
        assert_eq!(groups.into_groups().next().unwrap().name, "Hero");

        let mut groups = ImageGroups::new("Untitled");
        groups.record(&node("n1", None), &raw, data("https://x/a.png", "a.png"));
        assert_eq!(groups.into_groups().next().unwrap().name, "a.png");
    }

    #[test]
    fn videos_group_by_exact_url() {
        let mut videos = VideoGroups::new();
        videos.record(&NodeId::from("n1"), "https://x/v.mp4".into(), "v.mp4".into());
        videos.record(&NodeId::from("n2"), "https://x/v.mp4".into(), "other".into());
        videos.record(&NodeId::from("n2"), "https://x/v.mp4".into(), "other".into());
        videos.record(&NodeId::from("n3"), "https://x/v.mp4?t=1".into(), "v.mp4".into());

        assert_eq!(videos.len(), 2);
        let first = videos.into_groups().next().unwrap();
        assert_eq!(first.name, "v.mp4");
        assert_eq!(first.node_ids, vec![NodeId::from("n1"), NodeId::from("n2")]);
    }
}
