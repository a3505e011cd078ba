//! Human-readable usage summaries shown next to each asset

/// Label for a canvas asset, e.g. `Home · 3 nodes`
///
/// Falls back to `Canvas` when the page is unresolved.
#[must_use]
pub fn canvas_location_label(page_name: &str, node_count: usize) -> String {
    let page = if page_name.is_empty() { "Canvas" } else { page_name };
    let plural = if node_count == 1 { "" } else { "s" };
    format!("{page} · {node_count} node{plural}")
}

/// Label for a collection asset, e.g. `Blog › hello-world`
#[must_use]
pub fn collection_location_label(collection_name: &str, slug: Option<&str>, item_id: &str) -> String {
    let item = slug
        .filter(|slug| !slug.is_empty())
        .or_else(|| (!item_id.is_empty()).then_some(item_id))
        .unwrap_or("item");
    format!("{collection_name} › {item}")
}
