use assetify_host::{
    CollectionItem, CollectionSnapshot, DocumentSnapshot, FieldDefinition, FieldKind, ItemId,
    MemoryDocument, NodeId, NodeSnapshot,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Id of the document root created by [`DocumentBuilder`]
pub const ROOT_ID: &str = "root";

pub fn flat_image(url: &str) -> Value {
    json!({ "url": url })
}

pub fn wrapped_image(url: &str, alt_text: &str) -> Value {
    json!({ "type": "image", "value": { "url": url, "altText": alt_text } })
}

pub fn file_asset(url: &str, mime_type: &str, name: &str) -> Value {
    json!({ "url": url, "mimeType": mime_type, "name": name })
}

pub fn link_video_controls(url: &str) -> Value {
    json!({ "srcType": "Link", "srcLink": url })
}

pub fn upload_video_controls(url: &str, mime_type: &str, name: &str) -> Value {
    json!({ "srcType": "Upload", "srcFile": file_asset(url, mime_type, name) })
}

/// Fluent builder for a document of `root → pages → nodes`
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    snapshot: DocumentSnapshot,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: DocumentSnapshot {
                nodes: vec![NodeSnapshot::new(ROOT_ID)],
                ..DocumentSnapshot::default()
            },
        }
    }

    pub fn page(mut self, id: &str, name: &str) -> Self {
        self.snapshot
            .nodes
            .push(NodeSnapshot::new(id).with_parent(ROOT_ID).with_name(name));
        self
    }

    pub fn node(mut self, node: NodeSnapshot) -> Self {
        self.snapshot.nodes.push(node);
        self
    }

    pub fn image(self, id: &str, parent: &str, payload: Value) -> Self {
        self.node(
            NodeSnapshot::new(id)
                .with_parent(parent)
                .with_attribute("backgroundImage", payload),
        )
    }

    pub fn named_image(self, id: &str, parent: &str, name: &str, payload: Value) -> Self {
        self.node(
            NodeSnapshot::new(id)
                .with_parent(parent)
                .with_name(name)
                .with_attribute("backgroundImage", payload),
        )
    }

    pub fn component(self, id: &str, parent: &str, controls: Value) -> Self {
        self.node(
            NodeSnapshot::new(id)
                .with_parent(parent)
                .with_attribute("controls", controls),
        )
    }

    pub fn collection(mut self, collection: CollectionSnapshot) -> Self {
        self.snapshot.collections.push(collection);
        self
    }

    pub fn select(mut self, id: &str) -> Self {
        self.snapshot.selection.push(NodeId::from(id));
        self
    }

    pub fn plugin_data(mut self, key: &str, value: &str) -> Self {
        self.snapshot
            .plugin_data
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn snapshot(self) -> DocumentSnapshot {
        self.snapshot
    }

    pub fn build(self) -> Arc<MemoryDocument> {
        Arc::new(MemoryDocument::new(self.snapshot))
    }
}

fn item(id: &str, slug: Option<&str>, fields: &[(&str, Value)]) -> CollectionItem {
    let field_data: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect();
    CollectionItem {
        id: ItemId::from(id),
        slug: slug.map(ToString::to_string),
        field_data,
    }
}

/// Three breakpoint copies of one first-party image on a "Landing" page
pub fn landing_scenario() -> DocumentBuilder {
    DocumentBuilder::new()
        .page("landing", "Landing")
        .named_image(
            "desktop",
            "landing",
            "Hero",
            flat_image("https://framerusercontent.com/a.png?scale=1"),
        )
        .image(
            "tablet",
            "landing",
            flat_image("https://framerusercontent.com/a.png?scale=1"),
        )
        .image(
            "phone",
            "landing",
            flat_image("https://framerusercontent.com/a.png?scale=2"),
        )
}

/// A "Blog" collection with an externally hosted cover on `hello-world`
pub fn blog_scenario() -> DocumentBuilder {
    DocumentBuilder::new().collection(
        CollectionSnapshot::new("blog", "Blog")
            .with_field(FieldDefinition::new("cover", "Cover", FieldKind::Image))
            .with_field(FieldDefinition::new("title", "Title", FieldKind::String))
            .with_item(item(
                "post-1",
                Some("hello-world"),
                &[
                    ("cover", json!({ "url": "https://cdn.example.com/x.jpg", "altText": "" })),
                    ("title", json!("Hello, world")),
                ],
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetify_host::HostDocument;

    #[tokio::test]
    async fn landing_scenario_shape() {
        let doc = landing_scenario().build();
        let images = doc.nodes_with_attribute("backgroundImage").await.unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(
            doc.parent(&NodeId::from("landing")).await.unwrap(),
            Some(NodeId::from(ROOT_ID))
        );
    }

    #[tokio::test]
    async fn blog_scenario_shape() {
        let doc = blog_scenario().build();
        let collections = doc.collections().await.unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "Blog");
    }
}
