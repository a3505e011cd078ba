//! Subcommand implementations
//!
//! Each command returns the text to print so it can be tested without a
//! terminal. Documents are JSON snapshots loaded into a [`MemoryDocument`].

use anyhow::{bail, Context, Result};
use assetify_catalog::{AssetCatalog, AssetEntry, AssetKey, AssetQuery, CatalogConfig, CatalogStore};
use assetify_host::{HostDocument, MemoryDocument, NodeId};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// Read a document snapshot from disk
pub(crate) fn load_document(path: &Path) -> Result<Arc<MemoryDocument>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let doc = MemoryDocument::from_json(&json)
        .with_context(|| format!("invalid document snapshot {}", path.display()))?;
    tracing::debug!("Loaded {} nodes from {}", doc.node_count(), path.display());
    Ok(Arc::new(doc))
}

/// Write the current document state back to disk
pub(crate) fn write_document(doc: &MemoryDocument, path: &Path) -> Result<()> {
    let json = doc.to_json().context("failed to serialize document")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write document {}", path.display()))?;
    tracing::info!("Wrote document to {}", path.display());
    Ok(())
}

/// Read catalog settings from an optional TOML file
pub(crate) fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    let Some(path) = path else {
        return Ok(CatalogConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn catalog_over(doc: &Arc<MemoryDocument>, config: CatalogConfig) -> AssetCatalog {
    let host: Arc<dyn HostDocument> = doc.clone();
    AssetCatalog::new(host, config)
}

fn find_entry(entries: &[AssetEntry], key: &str) -> Result<AssetEntry> {
    match entries.iter().find(|entry| entry.key.as_str() == key) {
        Some(entry) => Ok(entry.clone()),
        None => bail!("no asset with key {key}"),
    }
}

/// List the catalog, filtered by `query`
pub(crate) async fn scan(
    doc: &Arc<MemoryDocument>,
    config: CatalogConfig,
    query: &AssetQuery,
    json: bool,
) -> Result<String> {
    let entries = catalog_over(doc, config).load().await;
    let hits = query.apply(&entries);

    if json {
        return serde_json::to_string_pretty(&hits).context("failed to encode catalog");
    }

    let counts = query.source_counts(&entries);
    let mut out = String::new();
    writeln!(
        out,
        "{} assets ({} canvas, {} cms)",
        hits.len(),
        counts.canvas,
        counts.cms
    )?;
    for entry in hits {
        writeln!(
            out,
            "{:<5}  {:<8}  {:<6}  {}  [{}]  {}",
            entry.asset_type.as_str(),
            entry.storage_source.as_str(),
            entry.source.as_str(),
            entry.name,
            entry.location_label,
            entry.key
        )?;
    }
    Ok(out)
}

/// Page name per node, `-` when unresolved
pub(crate) async fn pages(
    doc: &Arc<MemoryDocument>,
    config: CatalogConfig,
    node_ids: &[String],
) -> Result<String> {
    let ids: Vec<NodeId> = node_ids.iter().map(|id| NodeId::from(id.as_str())).collect();
    let names = catalog_over(doc, config).resolve_page_names(&ids).await;

    let mut out = String::new();
    for (id, name) in ids.iter().zip(names) {
        let name = if name.is_empty() { "-" } else { name.as_str() };
        writeln!(out, "{id}\t{name}")?;
    }
    Ok(out)
}

/// Write alt text for one asset
pub(crate) async fn set_alt(
    doc: &Arc<MemoryDocument>,
    config: CatalogConfig,
    key: &str,
    text: &str,
) -> Result<String> {
    let catalog = catalog_over(doc, config);
    let store = CatalogStore::new();
    store.refresh(&catalog).await;

    let key = AssetKey::from_raw(key);
    if store.get(&key).is_none() {
        bail!("no asset with key {key}");
    }
    store
        .save_alt_text(&catalog, &key, text)
        .await
        .with_context(|| format!("failed to save alt text for {key}"))?;
    Ok(format!("saved alt text for {key}\n"))
}

/// Set the asset on the selection, or insert it when nothing is selected
pub(crate) async fn add(
    doc: &Arc<MemoryDocument>,
    config: CatalogConfig,
    key: &str,
) -> Result<String> {
    let catalog = catalog_over(doc, config);
    let entry = find_entry(&catalog.load().await, key)?;
    let outcome = catalog
        .smart_add(&entry)
        .await
        .with_context(|| format!("failed to add {key}"))?;
    Ok(format!("{outcome} {key}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetify_catalog::{SourceFilter, StorageFilter};
    use assetify_test_utils::{blog_scenario, landing_scenario};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir, doc: &MemoryDocument) -> std::path::PathBuf {
        let path = dir.path().join("document.json");
        write_document(doc, &path).unwrap();
        path
    }

    #[tokio::test]
    async fn scan_prints_one_line_per_asset() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, &landing_scenario().build());
        let doc = load_document(&path).unwrap();

        let out = scan(&doc, CatalogConfig::default(), &AssetQuery::new(), false)
            .await
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "1 assets (1 canvas, 0 cms)");
        assert!(lines[1].contains("Hero"));
        assert!(lines[1].contains("[Landing · 3 nodes]"));
    }

    #[tokio::test]
    async fn scan_json_respects_filters() {
        let doc = blog_scenario()
            .page("home", "Home")
            .image("hero", "home", assetify_test_utils::flat_image("https://x/hero.png"))
            .build();
        let query = AssetQuery::new()
            .with_source(SourceFilter::Cms)
            .with_storage(StorageFilter::External);

        let out = scan(&doc, CatalogConfig::default(), &query, true).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["locationLabel"], "Blog › hello-world");
    }

    #[tokio::test]
    async fn pages_marks_unresolved_nodes() {
        let doc = landing_scenario().build();
        let ids = vec!["tablet".to_string(), "missing".to_string()];
        let out = pages(&doc, CatalogConfig::default(), &ids).await.unwrap();
        assert_eq!(out, "tablet\tLanding\nmissing\t-\n");
    }

    #[tokio::test]
    async fn set_alt_round_trips_through_a_file() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, &blog_scenario().build());

        let doc = load_document(&path).unwrap();
        set_alt(&doc, CatalogConfig::default(), "cms:blog:post-1:cover", "Sunrise")
            .await
            .unwrap();
        write_document(&doc, &path).unwrap();

        let reloaded = load_document(&path).unwrap();
        let out = scan(&reloaded, CatalogConfig::default(), &AssetQuery::new(), true)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["altText"], "Sunrise");
    }

    #[tokio::test]
    async fn set_alt_rejects_unknown_keys() {
        let doc = blog_scenario().build();
        let err = set_alt(&doc, CatalogConfig::default(), "canvas:nope", "x")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no asset with key canvas:nope");
    }

    #[tokio::test]
    async fn add_without_selection_inserts_a_node() {
        let doc = landing_scenario().build();
        let before = doc.node_count();
        let out = add(
            &doc,
            CatalogConfig::default(),
            "canvas:https://framerusercontent.com/a.png",
        )
        .await
        .unwrap();
        assert_eq!(out, "add canvas:https://framerusercontent.com/a.png\n");
        assert_eq!(doc.node_count(), before + 1);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assetify.toml");
        std::fs::write(&path, "untitled_name = \"Unnamed\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.untitled_name, "Unnamed");
        assert_eq!(config.image_attribute, "backgroundImage");
        assert_eq!(load_config(None).unwrap(), CatalogConfig::default());
    }

    #[test]
    fn unreadable_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_document(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read document"));
    }
}
