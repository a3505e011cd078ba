//! Catalog store
//!
//! Holds the current catalog snapshot for a UI or long-running process.
//! Overlapping refreshes are sequenced with tickets: a load is committed only
//! if no load that started later has already been committed, so a slow stale
//! scan can never overwrite a newer one.

use crate::catalog::AssetCatalog;
use crate::error::{MutationError, MutationResult};
use crate::types::{AssetEntry, AssetKey};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a refresh was started, ordered by start time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// Sequence number
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<AssetEntry>,
    committed: u64,
}

/// Current catalog snapshot with refresh sequencing
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: RwLock<StoreState>,
    issued: AtomicU64,
}

impl CatalogStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the snapshot unless a newer refresh already landed
    ///
    /// Returns whether the entries were stored.
    pub fn commit(&self, ticket: RefreshTicket, entries: Vec<AssetEntry>) -> bool {
        let mut state = self.state.write();
        if ticket.0 <= state.committed {
            tracing::debug!(
                "Dropping stale refresh {} (committed {})",
                ticket.0,
                state.committed
            );
            return false;
        }
        state.entries = entries;
        state.committed = ticket.0;
        true
    }

    /// Load the catalog and commit it
    ///
    /// Returns whether this load became the current snapshot.
    pub async fn refresh(&self, catalog: &AssetCatalog) -> bool {
        let ticket = self.begin_refresh();
        let entries = catalog.load().await;
        self.commit(ticket, entries)
    }

    /// Copy of the current entries
    #[must_use]
    pub fn entries(&self) -> Vec<AssetEntry> {
        self.state.read().entries.clone()
    }

    /// Look up one entry by key
    #[must_use]
    pub fn get(&self, key: &AssetKey) -> Option<AssetEntry> {
        self.state
            .read()
            .entries
            .iter()
            .find(|entry| &entry.key == key)
            .cloned()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Check if store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Update one entry's alt text locally, ahead of the next refresh
    ///
    /// Returns whether the key was found.
    pub fn apply_alt_text(&self, key: &AssetKey, alt_text: &str) -> bool {
        let mut state = self.state.write();
        match state.entries.iter_mut().find(|entry| &entry.key == key) {
            Some(entry) => {
                entry.alt_text = alt_text.to_string();
                true
            }
            None => false,
        }
    }

    /// Write alt text through the catalog, then update the stored entry
    ///
    /// The snapshot is left untouched when the write fails.
    ///
    /// # Errors
    /// - `MutationError::InvalidKey` if the key is not in the snapshot
    /// - any error from [`AssetCatalog::save_alt_text`]
    pub async fn save_alt_text(
        &self,
        catalog: &AssetCatalog,
        key: &AssetKey,
        alt_text: &str,
    ) -> MutationResult<()> {
        let entry = self
            .get(key)
            .ok_or_else(|| MutationError::InvalidKey(key.to_string()))?;
        catalog.save_alt_text(&entry, alt_text).await?;
        self.apply_alt_text(key, alt_text);
        Ok(())
    }
}
