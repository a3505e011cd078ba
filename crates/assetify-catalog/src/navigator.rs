//! Usage navigator
//!
//! Steps through the canvas usages of one asset, moving the editor's
//! selection and viewport along.

use crate::catalog::AssetCatalog;
use crate::error::MutationResult;
use crate::types::{AssetEntry, AssetSource};
use assetify_host::NodeId;

/// Cursor over the usage nodes of a selected asset
#[derive(Debug, Clone)]
pub struct UsageNavigator {
    catalog: AssetCatalog,
    entry: Option<AssetEntry>,
    index: usize,
    page_names: Vec<String>,
}

impl UsageNavigator {
    /// Create navigator with nothing selected
    #[inline]
    #[must_use]
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            entry: None,
            index: 0,
            page_names: Vec::new(),
        }
    }

    /// Select an asset, rewind to its first usage and resolve usage pages
    pub async fn init(&mut self, entry: AssetEntry) {
        self.index = 0;
        self.page_names = self.catalog.resolve_page_names(&entry.node_ids).await;
        self.entry = Some(entry);
    }

    /// Selected asset
    #[inline]
    #[must_use]
    pub fn entry(&self) -> Option<&AssetEntry> {
        self.entry.as_ref()
    }

    /// Current position in the usage list
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Page name of every usage, in usage order
    #[inline]
    #[must_use]
    pub fn page_names(&self) -> &[String] {
        &self.page_names
    }

    /// Page name of the current usage
    #[must_use]
    pub fn current_page_name(&self) -> Option<&str> {
        self.page_names.get(self.index).map(String::as_str)
    }

    fn node_ids(&self) -> &[NodeId] {
        self.entry
            .as_ref()
            .map(|entry| entry.node_ids.as_slice())
            .unwrap_or_default()
    }

    async fn step(&mut self, forward: bool) -> MutationResult<Option<NodeId>> {
        let len = self.node_ids().len();
        if len == 0 {
            return Ok(None);
        }
        self.index = if forward {
            (self.index + 1) % len
        } else {
            (self.index + len - 1) % len
        };
        self.visit().await
    }

    async fn visit(&self) -> MutationResult<Option<NodeId>> {
        let Some(node_id) = self.node_ids().get(self.index).cloned() else {
            return Ok(None);
        };
        self.catalog.navigate_to_node(&node_id).await?;
        Ok(Some(node_id))
    }

    /// Move to the next usage, wrapping to the first
    ///
    /// # Errors
    /// - `MutationError::Host` if navigation is rejected
    pub async fn step_next(&mut self) -> MutationResult<Option<NodeId>> {
        self.step(true).await
    }

    /// Move to the previous usage, wrapping to the last
    ///
    /// # Errors
    /// - `MutationError::Host` if navigation is rejected
    pub async fn step_prev(&mut self) -> MutationResult<Option<NodeId>> {
        self.step(false).await
    }

    /// Jump to a usage by position; out-of-range positions are ignored
    ///
    /// # Errors
    /// - `MutationError::Host` if navigation is rejected
    pub async fn go_to(&mut self, index: usize) -> MutationResult<Option<NodeId>> {
        if index >= self.node_ids().len() {
            return Ok(None);
        }
        self.index = index;
        self.visit().await
    }

    /// Show the current usage
    ///
    /// Collection assets open their item; canvas assets move to the current
    /// usage node, or the first one.
    ///
    /// # Errors
    /// - `MutationError::Host` if navigation is rejected
    pub async fn navigate_current(&self) -> MutationResult<()> {
        let Some(entry) = &self.entry else {
            return Ok(());
        };

        if entry.source == AssetSource::Collection {
            if let Some(item_id) = &entry.cms_item_id {
                return self.catalog.navigate_to_item(item_id).await;
            }
        }

        let node_id = entry
            .node_ids
            .get(self.index)
            .or_else(|| entry.node_ids.first());
        if let Some(node_id) = node_id {
            self.catalog.navigate_to_node(node_id).await?;
        }
        Ok(())
    }
}
