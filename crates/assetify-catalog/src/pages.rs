//! Page resolver
//!
//! Maps a canvas node to the name of the page that contains it. A page is a
//! node whose parent is a document root (a node with no parent).
//!
//! Lookups are memoized in an owned [`moka`] cache. The cache is never
//! invalidated automatically; call [`PageResolver::clear`] before a load when
//! page names may have changed.

use crate::config::CatalogConfig;
use assetify_host::{HostDocument, HostResult, NodeId, NodeRecord};
use futures::future::join_all;
use moka::future::Cache;
use std::sync::Arc;

/// Attributes tried, in order, when reading a page's display name
const PAGE_NAME_KEYS: &[&str] = &["name", "pageName", "title", "label"];

/// Read a page's display name from the first usable name attribute
fn read_page_name(node: &NodeRecord) -> Option<String> {
    PAGE_NAME_KEYS.iter().find_map(|key| {
        let value = node.string_attribute(key)?.trim();
        (!value.is_empty() && value != "undefined").then(|| value.to_string())
    })
}

/// Memoizing page-name resolver
#[derive(Clone)]
pub struct PageResolver {
    host: Arc<dyn HostDocument>,
    cache: Cache<NodeId, String>,
    home_page_name: String,
}

impl std::fmt::Debug for PageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageResolver")
            .field("cached", &self.cache.entry_count())
            .field("home_page_name", &self.home_page_name)
            .finish_non_exhaustive()
    }
}

impl PageResolver {
    /// Create resolver over a host document
    #[must_use]
    pub fn new(host: Arc<dyn HostDocument>, config: &CatalogConfig) -> Self {
        Self {
            host,
            cache: Cache::new(config.page_cache_capacity),
            home_page_name: config.home_page_name.clone(),
        }
    }

    /// Resolve the page name of one node
    ///
    /// Returns an empty string when the ancestor chain cannot be completed:
    /// the node is a root, a node on the chain is missing, the chain loops,
    /// or a host lookup fails. Failures are not memoized.
    pub async fn resolve(&self, node_id: &NodeId) -> String {
        if let Some(page_name) = self.cache.get(node_id).await {
            return page_name;
        }

        match self.walk(node_id).await {
            Ok(Some((page_name, visited))) => {
                for id in visited {
                    self.cache.insert(id, page_name.clone()).await;
                }
                page_name
            }
            Ok(None) => {
                tracing::debug!("No page above node {}", node_id);
                String::new()
            }
            Err(e) => {
                tracing::debug!("Page lookup for node {} failed: {}", node_id, e);
                String::new()
            }
        }
    }

    /// Resolve a batch concurrently, preserving input order
    pub async fn resolve_many(&self, node_ids: &[NodeId]) -> Vec<String> {
        join_all(node_ids.iter().map(|id| self.resolve(id))).await
    }

    /// Drop every memoized lookup
    #[inline]
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Walk upward until a node whose parent is a root
    ///
    /// Yields the page name and every node id seen on the way, the page
    /// included.
    async fn walk(&self, node_id: &NodeId) -> HostResult<Option<(String, Vec<NodeId>)>> {
        let mut visited: Vec<NodeId> = Vec::new();
        let mut current = node_id.clone();

        loop {
            if visited.contains(&current) {
                return Ok(None);
            }
            let Some(node) = self.host.node(&current).await? else {
                return Ok(None);
            };
            let Some(parent) = self.host.parent(&node.id).await? else {
                return Ok(None);
            };
            visited.push(node.id.clone());

            if self.host.parent(&parent).await?.is_none() {
                let page_name =
                    read_page_name(&node).unwrap_or_else(|| self.home_page_name.clone());
                return Ok(Some((page_name, visited)));
            }
            current = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetify_host::{DocumentSnapshot, MemoryDocument, NodeSnapshot};
    use serde_json::json;

    fn document() -> Arc<MemoryDocument> {
        Arc::new(MemoryDocument::new(DocumentSnapshot {
            nodes: vec![
                NodeSnapshot::new("root"),
                NodeSnapshot::new("landing").with_parent("root").with_name("Landing"),
                NodeSnapshot::new("hero").with_parent("landing").with_name("Hero"),
                NodeSnapshot::new("deep").with_parent("hero"),
                NodeSnapshot::new("blank").with_parent("root"),
                NodeSnapshot::new("in-blank").with_parent("blank"),
                NodeSnapshot::new("titled")
                    .with_parent("root")
                    .with_attribute("name", json!("  "))
                    .with_attribute("title", json!(" About ")),
                NodeSnapshot::new("in-titled").with_parent("titled"),
                NodeSnapshot::new("orphan").with_parent("gone"),
            ],
            ..DocumentSnapshot::default()
        }))
    }

    fn resolver(document: &Arc<MemoryDocument>) -> PageResolver {
        let host: Arc<dyn HostDocument> = document.clone();
        PageResolver::new(host, &CatalogConfig::default())
    }

    #[tokio::test]
    async fn resolves_named_page() {
        let doc = document();
        let pages = resolver(&doc);
        assert_eq!(pages.resolve(&NodeId::from("hero")).await, "Landing");
        assert_eq!(pages.resolve(&NodeId::from("deep")).await, "Landing");
        assert_eq!(pages.resolve(&NodeId::from("landing")).await, "Landing");
    }

    #[tokio::test]
    async fn falls_back_through_name_keys() {
        let doc = document();
        let pages = resolver(&doc);
        assert_eq!(pages.resolve(&NodeId::from("in-blank")).await, "Home");
        assert_eq!(pages.resolve(&NodeId::from("in-titled")).await, "About");
    }

    #[tokio::test]
    async fn incomplete_chains_resolve_empty() {
        let doc = document();
        let pages = resolver(&doc);
        assert_eq!(pages.resolve(&NodeId::from("root")).await, "");
        assert_eq!(pages.resolve(&NodeId::from("orphan")).await, "");
        assert_eq!(pages.resolve(&NodeId::from("missing")).await, "");
    }

    #[tokio::test]
    async fn cycles_resolve_empty() {
        let doc = Arc::new(MemoryDocument::new(DocumentSnapshot {
            nodes: vec![
                NodeSnapshot::new("a").with_parent("b"),
                NodeSnapshot::new("b").with_parent("a"),
            ],
            ..DocumentSnapshot::default()
        }));
        assert_eq!(resolver(&doc).resolve(&NodeId::from("a")).await, "");
    }

    #[tokio::test]
    async fn lookups_are_memoized_until_cleared() {
        let doc = document();
        let pages = resolver(&doc);
        assert_eq!(pages.resolve(&NodeId::from("deep")).await, "Landing");

        doc.remove_node(&NodeId::from("landing"));
        assert_eq!(pages.resolve(&NodeId::from("deep")).await, "Landing");
        assert_eq!(pages.resolve(&NodeId::from("hero")).await, "Landing");

        pages.clear();
        assert_eq!(pages.resolve(&NodeId::from("deep")).await, "");
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let doc = document();
        let pages = resolver(&doc);
        let ids: Vec<NodeId> = ["in-titled", "root", "hero", "in-blank"]
            .into_iter()
            .map(NodeId::from)
            .collect();
        assert_eq!(pages.resolve_many(&ids).await, vec!["About", "", "Landing", "Home"]);
    }
}
