//! Canvas image and video loaders

use super::{LoaderContext, SourceLoader};
use crate::classify::{classify_asset_type, detect_storage_source, is_video_url};
use crate::error::CatalogResult;
use crate::identity::{ImageGroup, ImageGroups, VideoGroup, VideoGroups};
use crate::label::canvas_location_label;
use crate::normalize::{read_file_asset, read_image_data};
use crate::types::{AssetEntry, AssetKey, AssetSource, AssetType};
use assetify_host::NodeId;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Name used for videos whose file carries no name
const DEFAULT_VIDEO_NAME: &str = "Video";

/// Grouped canvas usages awaiting page resolution
struct CanvasUsage {
    key: AssetKey,
    asset_type: AssetType,
    name: String,
    url: String,
    alt_text: String,
    node_ids: Vec<NodeId>,
}

impl From<ImageGroup> for CanvasUsage {
    fn from(group: ImageGroup) -> Self {
        Self {
            key: AssetKey::canvas(&group.canonical),
            asset_type: classify_asset_type(&group.url, None),
            name: group.name,
            url: group.url,
            alt_text: group.alt_text,
            node_ids: group.node_ids,
        }
    }
}

impl From<VideoGroup> for CanvasUsage {
    fn from(group: VideoGroup) -> Self {
        Self {
            key: AssetKey::video(&group.url),
            asset_type: AssetType::Video,
            name: group.name,
            url: group.url,
            alt_text: String::new(),
            node_ids: group.node_ids,
        }
    }
}

/// Resolve the page of each usage's first node and build entries
async fn into_entries(ctx: &LoaderContext, usages: Vec<CanvasUsage>) -> Vec<AssetEntry> {
    let first_nodes: Vec<NodeId> = usages
        .iter()
        .filter_map(|usage| usage.node_ids.first().cloned())
        .collect();
    let mut page_names = ctx.pages.resolve_many(&first_nodes).await.into_iter();

    usages
        .into_iter()
        .map(|usage| {
            let page_name = if usage.node_ids.is_empty() {
                String::new()
            } else {
                page_names.next().unwrap_or_default()
            };
            AssetEntry {
                storage_source: detect_storage_source(&usage.url, &ctx.config.first_party_hosts),
                location_label: canvas_location_label(&page_name, usage.node_ids.len()),
                navigate_id: usage.node_ids.first().cloned(),
                key: usage.key,
                name: usage.name,
                url: usage.url,
                alt_text: usage.alt_text,
                source: AssetSource::Canvas,
                asset_type: usage.asset_type,
                node_ids: usage.node_ids,
                page_name,
                cms_collection_id: None,
                cms_item_id: None,
            }
        })
        .collect()
}

/// Images set as a node attribute on the canvas
#[derive(Debug, Clone)]
pub struct CanvasImageLoader {
    ctx: LoaderContext,
}

impl CanvasImageLoader {
    /// Create loader
    #[inline]
    #[must_use]
    pub fn new(ctx: LoaderContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl SourceLoader for CanvasImageLoader {
    fn name(&self) -> &'static str {
        "canvas images"
    }

    async fn try_load(&self) -> CatalogResult<Vec<AssetEntry>> {
        let attribute = &self.ctx.config.image_attribute;
        let nodes = self.ctx.host.nodes_with_attribute(attribute).await?;

        let mut groups = ImageGroups::new(self.ctx.config.untitled_name.clone());
        for node in &nodes {
            let Some(raw) = node.attribute(attribute) else {
                continue;
            };
            if let Some(data) = read_image_data(raw).into_asset() {
                groups.record(node, raw, data);
            }
        }

        let usages = groups.into_groups().map(CanvasUsage::from).collect();
        Ok(into_entries(&self.ctx, usages).await)
    }
}

/// A video file referenced from component controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    /// Resource URL
    pub url: String,
    /// Display name
    pub name: String,
}

fn file_video(value: &Value) -> Option<VideoRef> {
    let file = read_file_asset(value)?;
    if !file.mime_type.starts_with("video/") && !is_video_url(&file.url) {
        return None;
    }
    let name = file
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_VIDEO_NAME.to_string());
    Some(VideoRef {
        url: file.url,
        name,
    })
}

fn link_video(value: &Value) -> Option<VideoRef> {
    let url = value.as_str().filter(|url| is_video_url(url))?;
    let name = url
        .rsplit('/')
        .next()
        .and_then(|segment| segment.split('?').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_VIDEO_NAME);
    Some(VideoRef {
        url: url.to_string(),
        name: name.to_string(),
    })
}

/// Find the video referenced by a component's controls
///
/// Tried in order:
/// 1. `srcType: "Upload"` with a video file in `srcFile`
/// 2. `srcType: "Link"` with a video URL in `srcLink`
/// 3. the first control value, in iteration order, that is a video URL
///    string or a video file object
#[must_use]
pub fn extract_video(controls: &Map<String, Value>) -> Option<VideoRef> {
    let declared = match controls.get("srcType").and_then(Value::as_str) {
        Some("Upload") => controls.get("srcFile").and_then(file_video),
        Some("Link") => controls.get("srcLink").and_then(link_video),
        _ => None,
    };

    declared.or_else(|| {
        controls.values().find_map(|value| match value {
            Value::String(_) => link_video(value),
            Value::Object(_) => file_video(value),
            _ => None,
        })
    })
}

/// Videos referenced by component controls on the canvas
#[derive(Debug, Clone)]
pub struct CanvasVideoLoader {
    ctx: LoaderContext,
    exclude: HashSet<String>,
}

impl CanvasVideoLoader {
    /// Create loader that skips every URL in `exclude`
    #[inline]
    #[must_use]
    pub fn new(ctx: LoaderContext, exclude: HashSet<String>) -> Self {
        Self { ctx, exclude }
    }
}

#[async_trait]
impl SourceLoader for CanvasVideoLoader {
    fn name(&self) -> &'static str {
        "canvas videos"
    }

    async fn try_load(&self) -> CatalogResult<Vec<AssetEntry>> {
        let attribute = &self.ctx.config.controls_attribute;
        let nodes = self.ctx.host.nodes_with_attribute(attribute).await?;

        let mut groups = VideoGroups::new();
        for node in &nodes {
            let Some(controls) = node.attribute(attribute).and_then(Value::as_object) else {
                continue;
            };
            if let Some(video) = extract_video(controls) {
                groups.record(&node.id, video.url, video.name);
            }
        }

        let usages = groups
            .into_groups()
            .filter(|group| !self.exclude.contains(&group.url))
            .map(CanvasUsage::from)
            .collect();
        Ok(into_entries(&self.ctx, usages).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::pages::PageResolver;
    use crate::types::StorageSource;
    use assetify_host::{DocumentSnapshot, HostDocument, MemoryDocument, NodeSnapshot};
    use serde_json::json;
    use std::sync::Arc;

    fn context(nodes: Vec<NodeSnapshot>) -> LoaderContext {
        let mut all = vec![
            NodeSnapshot::new("root"),
            NodeSnapshot::new("page").with_parent("root").with_name("Landing"),
        ];
        all.extend(nodes);
        let host: Arc<dyn HostDocument> = Arc::new(MemoryDocument::new(DocumentSnapshot {
            nodes: all,
            ..DocumentSnapshot::default()
        }));
        let config = CatalogConfig::default();
        LoaderContext {
            pages: PageResolver::new(host.clone(), &config),
            host,
            config: Arc::new(config),
        }
    }

    fn image_node(id: &str, url: &str) -> NodeSnapshot {
        NodeSnapshot::new(id)
            .with_parent("page")
            .with_attribute("backgroundImage", json!({"url": url}))
    }

    fn video_node(id: &str, controls: Value) -> NodeSnapshot {
        NodeSnapshot::new(id)
            .with_parent("page")
            .with_attribute("controls", controls)
    }

    #[test]
    fn upload_control_wins() {
        let controls = json!({
            "srcLink": "https://x/link.mp4",
            "srcType": "Upload",
            "srcFile": {"url": "https://x/blob", "mimeType": "video/mp4", "name": "intro.mp4"}
        });
        assert_eq!(
            extract_video(controls.as_object().unwrap()),
            Some(VideoRef {
                url: "https://x/blob".into(),
                name: "intro.mp4".into(),
            })
        );
    }

    #[test]
    fn link_control_names_from_path() {
        let controls = json!({"srcType": "Link", "srcLink": "https://x/media/clip.webm?t=3"});
        let video = extract_video(controls.as_object().unwrap()).unwrap();
        assert_eq!(video.name, "clip.webm");
    }

    #[test]
    fn scans_remaining_controls_in_order() {
        let controls = json!({
            "title": "Intro",
            "poster": {"url": "https://x/poster.png", "mimeType": "image/png"},
            "file": {"url": "https://x/a.mov"},
            "backup": "https://x/b.mp4"
        });
        let video = extract_video(controls.as_object().unwrap()).unwrap();
        assert_eq!(video.url, "https://x/a.mov");
        assert_eq!(video.name, "Video");

        let controls = json!({"srcType": "Link", "srcLink": "https://x/page.html", "alt": "https://x/c.m4v"});
        assert_eq!(extract_video(controls.as_object().unwrap()).unwrap().url, "https://x/c.m4v");

        let controls = json!({"label": "hello", "count": 3});
        assert_eq!(extract_video(controls.as_object().unwrap()), None);
    }

    #[tokio::test]
    async fn image_loader_groups_and_labels() {
        let ctx = context(vec![
            image_node("a", "https://framerusercontent.com/a.png?scale=1"),
            image_node("b", "https://framerusercontent.com/a.png?scale=2"),
            image_node("c", "https://cdn.example.com/c.jpg"),
            NodeSnapshot::new("broken")
                .with_parent("page")
                .with_attribute("backgroundImage", json!({"altText": "no url"})),
        ]);

        let entries = CanvasImageLoader::new(ctx).load().await;
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.key.as_str(), "canvas:https://framerusercontent.com/a.png");
        assert_eq!(first.node_ids.len(), 2);
        assert_eq!(first.page_name, "Landing");
        assert_eq!(first.location_label, "Landing · 2 nodes");
        assert_eq!(first.storage_source, StorageSource::FirstParty);
        assert_eq!(first.navigate_id, Some(NodeId::from("a")));
        assert_eq!(first.name, "Untitled");

        assert_eq!(entries[1].storage_source, StorageSource::External);
        assert_eq!(entries[1].location_label, "Landing · 1 node");
    }

    #[tokio::test]
    async fn video_loader_honours_exclusions() {
        let ctx = context(vec![
            video_node("v1", json!({"srcType": "Link", "srcLink": "https://x/a.mp4"})),
            video_node("v2", json!({"srcType": "Link", "srcLink": "https://x/a.mp4"})),
            video_node("v3", json!({"file": "https://x/b.mp4"})),
            video_node("v4", json!("not an object")),
        ]);

        let exclude: HashSet<String> = ["https://x/b.mp4".to_string()].into();
        let entries = CanvasVideoLoader::new(ctx, exclude).load().await;

        assert_eq!(entries.len(), 1);
        let video = &entries[0];
        assert_eq!(video.key.as_str(), "video:https://x/a.mp4");
        assert_eq!(video.asset_type, AssetType::Video);
        assert_eq!(video.alt_text, "");
        assert_eq!(video.node_ids, vec![NodeId::from("v1"), NodeId::from("v2")]);
        assert_eq!(video.page_name, "Landing");
    }
}
