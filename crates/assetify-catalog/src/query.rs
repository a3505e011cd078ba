//! Search and filtering over a loaded catalog
//!
//! A query combines free-text search with a source tab and a storage tab.
//! Tab counts respect every other active criterion, so each tab shows how
//! many results selecting it would produce.

use crate::classify::file_extension;
use crate::types::{AssetEntry, AssetSource, StorageSource};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Source tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    /// Every source
    #[default]
    All,
    /// Canvas nodes only
    Canvas,
    /// Collection fields only
    Cms,
}

impl SourceFilter {
    /// Every tab, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Canvas, Self::Cms];

    /// Check if entry belongs to this tab
    #[must_use]
    pub fn matches(&self, entry: &AssetEntry) -> bool {
        match self {
            Self::All => true,
            Self::Canvas => entry.source == AssetSource::Canvas,
            Self::Cms => entry.source == AssetSource::Collection,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "canvas" => Ok(Self::Canvas),
            "cms" | "collection" => Ok(Self::Cms),
            other => Err(format!("unknown source filter: {other}")),
        }
    }
}

/// Storage tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageFilter {
    /// Every storage
    #[default]
    All,
    /// Hosted by the document platform
    FirstParty,
    /// Hosted elsewhere
    External,
}

impl StorageFilter {
    /// Every tab, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::FirstParty, Self::External];

    /// Check if entry belongs to this tab
    #[must_use]
    pub fn matches(&self, entry: &AssetEntry) -> bool {
        match self {
            Self::All => true,
            Self::FirstParty => entry.storage_source == StorageSource::FirstParty,
            Self::External => entry.storage_source == StorageSource::External,
        }
    }
}

impl FromStr for StorageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "first-party" | "framer" => Ok(Self::FirstParty),
            "external" => Ok(Self::External),
            other => Err(format!("unknown storage filter: {other}")),
        }
    }
}

/// Check if entry matches a free-text query
///
/// Case-insensitive substring match over the entry's descriptive fields,
/// its file extension and its URL. A blank query matches everything.
#[must_use]
pub fn matches_search(entry: &AssetEntry, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let haystack = [
        entry.name.as_str(),
        entry.location_label.as_str(),
        entry.page_name.as_str(),
        entry.alt_text.as_str(),
        entry.asset_type.as_str(),
        entry.storage_source.as_str(),
        entry.source.as_str(),
        file_extension(&entry.url).as_str(),
        entry.url.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    haystack.contains(&needle)
}

/// Result counts per source tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceCounts {
    /// All sources
    pub all: usize,
    /// Canvas
    pub canvas: usize,
    /// Collections
    pub cms: usize,
}

/// Result counts per storage tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StorageCounts {
    /// All storage
    pub all: usize,
    /// First-party
    pub first_party: usize,
    /// External
    pub external: usize,
}

/// Search text plus active tabs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetQuery {
    /// Free-text search
    pub search: String,
    /// Active source tab
    pub source: SourceFilter,
    /// Active storage tab
    pub storage: StorageFilter,
}

impl AssetQuery {
    /// Create query matching everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With search text
    #[inline]
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// With source tab
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: SourceFilter) -> Self {
        self.source = source;
        self
    }

    /// With storage tab
    #[inline]
    #[must_use]
    pub fn with_storage(mut self, storage: StorageFilter) -> Self {
        self.storage = storage;
        self
    }

    /// Check if entry passes every criterion
    #[must_use]
    pub fn matches(&self, entry: &AssetEntry) -> bool {
        self.source.matches(entry)
            && self.storage.matches(entry)
            && matches_search(entry, &self.search)
    }

    /// Matching entries, in catalog order
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [AssetEntry]) -> Vec<&'a AssetEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }

    fn count(&self, entries: &[AssetEntry], source: SourceFilter, storage: StorageFilter) -> usize {
        entries
            .iter()
            .filter(|entry| {
                source.matches(entry)
                    && storage.matches(entry)
                    && matches_search(entry, &self.search)
            })
            .count()
    }

    /// Counts per source tab under the active storage tab and search
    #[must_use]
    pub fn source_counts(&self, entries: &[AssetEntry]) -> SourceCounts {
        SourceCounts {
            all: self.count(entries, SourceFilter::All, self.storage),
            canvas: self.count(entries, SourceFilter::Canvas, self.storage),
            cms: self.count(entries, SourceFilter::Cms, self.storage),
        }
    }

    /// Counts per storage tab under the active source tab and search
    #[must_use]
    pub fn storage_counts(&self, entries: &[AssetEntry]) -> StorageCounts {
        StorageCounts {
            all: self.count(entries, self.source, StorageFilter::All),
            first_party: self.count(entries, self.source, StorageFilter::FirstParty),
            external: self.count(entries, self.source, StorageFilter::External),
        }
    }
}
