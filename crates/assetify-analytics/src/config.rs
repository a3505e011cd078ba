//! Analytics endpoint configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Marker left in unconfigured endpoint templates
const PLACEHOLDER_MARKER: &str = "YOUR_PROJECT";

/// Where and how often usage events are sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Base URL of the REST endpoint, without a trailing `/rest/v1`
    pub endpoint: String,
    /// Public API key sent as `apikey` and bearer token
    pub api_key: String,
    /// Seconds between session heartbeats
    pub heartbeat_secs: u64,
    /// Plugin version recorded on each session
    pub plugin_version: String,
    /// Project the plugin is running in, empty when unknown
    pub project_id: String,
}

impl AnalyticsConfig {
    /// Config pointing at `endpoint`
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// With heartbeat interval
    #[inline]
    #[must_use]
    pub fn with_heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat_secs = interval.as_secs().max(1);
        self
    }

    /// With project id
    #[inline]
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// With plugin version
    #[inline]
    #[must_use]
    pub fn with_plugin_version(mut self, version: impl Into<String>) -> Self {
        self.plugin_version = version.into();
        self
    }

    /// Heartbeat interval
    #[inline]
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs.max(1))
    }

    /// Whether tracking is enabled
    ///
    /// False for an empty endpoint or an untouched placeholder.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let endpoint = self.endpoint.trim();
        !endpoint.is_empty() && !endpoint.contains(PLACEHOLDER_MARKER)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            heartbeat_secs: 60,
            plugin_version: crate::VERSION.to_string(),
            project_id: String::new(),
        }
    }
}
