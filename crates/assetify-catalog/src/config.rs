//! Catalog configuration
//!
//! Host attribute names, the first-party host allowlist and the display
//! placeholders used while building entries.

use serde::{Deserialize, Serialize};

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Hostname suffixes treated as first-party storage
    pub first_party_hosts: Vec<String>,
    /// Node attribute that carries an image payload
    pub image_attribute: String,
    /// Node attribute that carries component controls
    pub controls_attribute: String,
    /// Name given to assets with no readable name
    pub untitled_name: String,
    /// Page name used when the page node has no readable name
    pub home_page_name: String,
    /// Maximum memoized page lookups
    pub page_cache_capacity: u64,
}

impl CatalogConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With first-party host suffixes
    #[inline]
    #[must_use]
    pub fn with_first_party_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.first_party_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// With image attribute name
    #[inline]
    #[must_use]
    pub fn with_image_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.image_attribute = attribute.into();
        self
    }

    /// With page cache capacity
    #[inline]
    #[must_use]
    pub fn with_page_cache_capacity(mut self, capacity: u64) -> Self {
        self.page_cache_capacity = capacity;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            first_party_hosts: vec!["framerusercontent.com".to_string(), "framer.com".to_string()],
            image_attribute: "backgroundImage".to_string(),
            controls_attribute: "controls".to_string(),
            untitled_name: "Untitled".to_string(),
            home_page_name: "Home".to_string(),
            page_cache_capacity: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CatalogConfig::new();
        assert_eq!(config.image_attribute, "backgroundImage");
        assert_eq!(config.controls_attribute, "controls");
        assert_eq!(config.untitled_name, "Untitled");
        assert_eq!(config.home_page_name, "Home");
        assert_eq!(config.first_party_hosts.len(), 2);
    }

    #[test]
    fn builder_overrides() {
        let config = CatalogConfig::new()
            .with_first_party_hosts(["assets.example.com"])
            .with_page_cache_capacity(16);
        assert_eq!(config.first_party_hosts, vec!["assets.example.com"]);
        assert_eq!(config.page_cache_capacity, 16);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: CatalogConfig = toml::from_str(
            r#"
            first_party_hosts = ["media.example.org"]
            untitled_name = "Unnamed"
            "#,
        )
        .unwrap();
        assert_eq!(config.first_party_hosts, vec!["media.example.org"]);
        assert_eq!(config.untitled_name, "Unnamed");
        assert_eq!(config.image_attribute, "backgroundImage");
    }
}
