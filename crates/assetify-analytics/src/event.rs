//! Event names and the rows written to the sink

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A usage event emitted by the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// Panel opened
    PluginOpened,
    /// Panel closed
    PluginClosed,
    /// Catalog finished loading
    AssetsLoaded,
    /// Search box used
    SearchUsed,
    /// Source tab changed
    FilterSource,
    /// Storage tab changed
    FilterStorage,
    /// Asset detail opened
    DetailOpened,
    /// Alt text written back
    AltTextSaved,
    /// Asset inserted as a new node
    AddToCanvas,
    /// Asset set on selected frames
    SetOnFrame,
    /// Light/dark theme switched
    ThemeToggled,
    /// Usage navigator stepped
    NavigateUsage,
    /// Catalog refreshed manually
    Refresh,
}

impl AnalyticsEvent {
    /// Every event, in declaration order
    pub const ALL: [Self; 13] = [
        Self::PluginOpened,
        Self::PluginClosed,
        Self::AssetsLoaded,
        Self::SearchUsed,
        Self::FilterSource,
        Self::FilterStorage,
        Self::DetailOpened,
        Self::AltTextSaved,
        Self::AddToCanvas,
        Self::SetOnFrame,
        Self::ThemeToggled,
        Self::NavigateUsage,
        Self::Refresh,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PluginOpened => "plugin_opened",
            Self::PluginClosed => "plugin_closed",
            Self::AssetsLoaded => "assets_loaded",
            Self::SearchUsed => "search_used",
            Self::FilterSource => "filter_source",
            Self::FilterStorage => "filter_storage",
            Self::DetailOpened => "detail_opened",
            Self::AltTextSaved => "alt_text_saved",
            Self::AddToCanvas => "add_to_canvas",
            Self::SetOnFrame => "set_on_frame",
            Self::ThemeToggled => "theme_toggled",
            Self::NavigateUsage => "navigate_usage",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Panel colour scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light
    #[default]
    Light,
    /// Dark
    Dark,
}

impl Theme {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Row inserted when a session opens
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    /// Stable per-install id
    pub anonymous_id: String,
    pub project_id: String,
    pub theme: Theme,
    /// Catalog size at open
    pub assets_loaded: usize,
    pub plugin_version: String,
    pub user_agent: String,
}

/// Row inserted per tracked event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct EventRecord {
    pub session_id: Option<String>,
    pub anonymous_id: String,
    pub project_id: String,
    pub event: AnalyticsEvent,
    pub properties: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_match_serde() {
        for event in AnalyticsEvent::ALL {
            assert_eq!(serde_json::to_value(event).unwrap(), json!(event.as_str()));
        }
    }

    #[test]
    fn event_record_shape() {
        let record = EventRecord {
            session_id: None,
            anonymous_id: "anon".to_string(),
            project_id: String::new(),
            event: AnalyticsEvent::SearchUsed,
            properties: Map::new(),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "session_id": null,
                "anonymous_id": "anon",
                "project_id": "",
                "event": "search_used",
                "properties": {}
            })
        );
    }
}
