//! Loader fault isolation and page-lookup memoization
//!
//! Run with: cargo test --package assetify-catalog --test fault_isolation

use assetify_catalog::prelude::*;
use assetify_host::NodeId;
use assetify_test_utils::{
    blog_scenario, flat_image, link_video_controls, CountingDocument, FaultyDocument, HostOp,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn mixed_document() -> Arc<MemoryDocument> {
    blog_scenario()
        .page("home", "Home")
        .image("hero", "home", flat_image("https://x/hero.png"))
        .component("player", "home", link_video_controls("https://x/clip.mp4"))
        .build()
}

fn keys(entries: &[AssetEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.key.as_str()).collect()
}

async fn load_with(faulty: FaultyDocument) -> Vec<AssetEntry> {
    let host: Arc<dyn HostDocument> = Arc::new(faulty);
    AssetCatalog::with_defaults(host).load().await
}

#[tokio::test]
async fn failing_collections_keep_canvas_assets() {
    let entries = load_with(FaultyDocument::new(mixed_document()).fail(HostOp::Items)).await;
    assert_eq!(
        keys(&entries),
        vec!["canvas:https://x/hero.png", "video:https://x/clip.mp4"]
    );
}

#[tokio::test]
async fn failing_video_scan_keeps_images_and_collections() {
    let entries =
        load_with(FaultyDocument::new(mixed_document()).fail_attribute("controls")).await;
    assert_eq!(
        keys(&entries),
        vec!["canvas:https://x/hero.png", "cms:blog:post-1:cover"]
    );
}

#[tokio::test]
async fn failing_image_scan_still_lists_videos() {
    let entries =
        load_with(FaultyDocument::new(mixed_document()).fail_attribute("backgroundImage")).await;
    assert_eq!(
        keys(&entries),
        vec!["video:https://x/clip.mp4", "cms:blog:post-1:cover"]
    );
}

#[tokio::test]
async fn broken_parent_lookups_only_blank_page_names() {
    let entries = load_with(FaultyDocument::new(mixed_document()).fail(HostOp::Parent)).await;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].page_name, "");
    assert_eq!(entries[0].location_label, "Canvas · 1 node");
}

#[tokio::test]
async fn every_source_failing_yields_an_empty_catalog() {
    let faulty = FaultyDocument::new(mixed_document())
        .fail(HostOp::NodesWithAttribute)
        .fail(HostOp::Collections);
    assert!(load_with(faulty).await.is_empty());
}

#[tokio::test]
async fn page_lookups_are_served_from_cache_on_reload() {
    let counting = Arc::new(CountingDocument::new(mixed_document()));
    let host: Arc<dyn HostDocument> = counting.clone();
    let catalog = AssetCatalog::with_defaults(host);

    let first = catalog.load().await;
    assert!(counting.calls(HostOp::Parent) > 0);

    counting.reset();
    let second = catalog.load().await;
    assert_eq!(counting.calls(HostOp::Parent), 0);
    assert_eq!(counting.calls(HostOp::Node), 0);
    assert_eq!(first, second);

    catalog.pages().clear();
    counting.reset();
    catalog.load().await;
    assert!(counting.calls(HostOp::Parent) > 0);
}

#[tokio::test]
async fn host_write_failures_surface_from_mutations() {
    let doc = mixed_document();
    let faulty = FaultyDocument::new(doc.clone()).fail(HostOp::SetAttributes);
    let host: Arc<dyn HostDocument> = Arc::new(faulty);
    let catalog = AssetCatalog::with_defaults(host);

    let hero = catalog.load().await.remove(0);
    let err = catalog.save_alt_text(&hero, "Hero").await.unwrap_err();
    assert!(matches!(err, MutationError::Host(_)));
    assert_eq!(
        doc.node_attribute(&NodeId::from("hero"), "backgroundImage"),
        Some(serde_json::json!({"url": "https://x/hero.png"}))
    );
}
