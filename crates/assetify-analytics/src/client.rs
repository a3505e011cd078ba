//! Analytics handle and its background worker
//!
//! `init` spawns one worker task that owns the session. Callers only ever
//! push onto an unbounded queue, so tracking never waits on the network and
//! never fails. Sink errors are logged at debug and dropped.

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::event::{AnalyticsEvent, EventRecord, NewSession, Theme};
use crate::sink::EventSink;
use assetify_host::PluginStorage;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Plugin storage key holding the per-install anonymous id
pub const ANONYMOUS_ID_KEY: &str = "analyticsId";

/// What the panel knows when it opens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Active theme
    pub theme: Theme,
    /// Catalog size at open
    pub assets_loaded: usize,
}

enum Command {
    Track(AnalyticsEvent, Map<String, Value>),
    Shutdown(oneshot::Sender<()>),
}

/// Fire-and-forget analytics handle
///
/// A handle built from an unconfigured [`AnalyticsConfig`] is disabled:
/// every call is a no-op.
pub struct Analytics {
    anonymous_id: Option<String>,
    queue: Mutex<Option<mpsc::UnboundedSender<Command>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics")
            .field("anonymous_id", &self.anonymous_id)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Analytics {
    /// Handle that drops everything
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            anonymous_id: None,
            queue: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    /// Start a session and its heartbeat
    ///
    /// Must be called inside a tokio runtime. Emits `plugin_opened` once the
    /// session is open.
    pub async fn init(
        config: &AnalyticsConfig,
        sink: Arc<dyn EventSink>,
        storage: &dyn PluginStorage,
        options: SessionOptions,
    ) -> Self {
        if !config.is_configured() {
            tracing::warn!("Analytics endpoint not configured, tracking disabled");
            return Self::disabled();
        }

        let anonymous_id = anonymous_id(storage).await;
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            sink,
            anonymous_id: anonymous_id.clone(),
            project_id: config.project_id.clone(),
            plugin_version: config.plugin_version.clone(),
            session: None,
        };
        let handle = tokio::spawn(worker.run(rx, options, config.heartbeat_interval()));
        tracing::debug!("Analytics started for {}", anonymous_id);

        Self {
            anonymous_id: Some(anonymous_id),
            queue: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Whether events are being delivered
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.queue.lock().is_some()
    }

    /// Anonymous install id, when enabled
    #[inline]
    #[must_use]
    pub fn anonymous_id(&self) -> Option<&str> {
        self.anonymous_id.as_deref()
    }

    /// Queue an event and return immediately
    pub fn track(&self, event: AnalyticsEvent, properties: Map<String, Value>) {
        if self.is_enabled() {
            if let Err(err) = self.try_track(event, properties) {
                tracing::debug!("Dropped {} event: {}", event, err);
            }
        }
    }

    /// Queue an event, reporting a closed queue
    pub fn try_track(
        &self,
        event: AnalyticsEvent,
        properties: Map<String, Value>,
    ) -> AnalyticsResult<()> {
        let queue = self.queue.lock();
        let tx = queue.as_ref().ok_or(AnalyticsError::QueueClosed)?;
        tx.send(Command::Track(event, properties))
            .map_err(|_| AnalyticsError::QueueClosed)
    }

    /// Stop the heartbeat, record `plugin_closed` and close the session
    ///
    /// Waits for every queued event to be handed to the sink. Later calls are
    /// no-ops.
    pub async fn shutdown(&self) {
        let Some(tx) = self.queue.lock().take() else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(Command::Shutdown(done_tx)).is_ok() {
            let _ = done_rx.await;
        }

        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                tracing::debug!("Analytics worker ended abnormally: {}", err);
            }
        }
    }
}

/// Stored anonymous id, created on first use
///
/// Storage failures yield an ephemeral id for this session only.
async fn anonymous_id(storage: &dyn PluginStorage) -> String {
    match storage.plugin_data(ANONYMOUS_ID_KEY).await {
        Ok(Some(id)) if !id.is_empty() => id,
        Ok(_) => {
            let id = uuid::Uuid::new_v4().to_string();
            if let Err(err) = storage.set_plugin_data(ANONYMOUS_ID_KEY, &id).await {
                tracing::debug!("Could not persist anonymous id: {}", err);
            }
            id
        }
        Err(err) => {
            tracing::debug!("Plugin storage unavailable, using ephemeral id: {}", err);
            uuid::Uuid::new_v4().to_string()
        }
    }
}

struct OpenSession {
    id: Option<String>,
}

struct Worker {
    sink: Arc<dyn EventSink>,
    anonymous_id: String,
    project_id: String,
    plugin_version: String,
    /// `None` until the sink accepted the session
    session: Option<OpenSession>,
}

impl Worker {
    async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Command>,
        options: SessionOptions,
        period: std::time::Duration,
    ) {
        self.open(options).await;

        let mut heartbeat = interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = heartbeat.tick() => self.heartbeat().await,
                command = rx.recv() => match command {
                    Some(Command::Track(event, properties)) => self.record(event, properties).await,
                    Some(Command::Shutdown(done)) => {
                        self.close().await;
                        let _ = done.send(());
                        break;
                    }
                    None => break,
                },
            }
        }
    }

    async fn open(&mut self, options: SessionOptions) {
        let session = NewSession {
            anonymous_id: self.anonymous_id.clone(),
            project_id: self.project_id.clone(),
            theme: options.theme,
            assets_loaded: options.assets_loaded,
            plugin_version: self.plugin_version.clone(),
            user_agent: format!("assetify/{}", self.plugin_version),
        };

        match self.sink.open_session(&session).await {
            Ok(id) => {
                tracing::debug!("Analytics session opened: {:?}", id);
                self.session = Some(OpenSession { id });
                let mut properties = Map::new();
                properties.insert("theme".to_string(), json!(options.theme.as_str()));
                properties.insert("assets_loaded".to_string(), json!(options.assets_loaded));
                properties.insert("project_id".to_string(), json!(self.project_id));
                self.record(AnalyticsEvent::PluginOpened, properties).await;
            }
            Err(err) => tracing::debug!("Analytics session failed to open: {}", err),
        }
    }

    fn session_id(&self) -> Option<&str> {
        self.session.as_ref().and_then(|session| session.id.as_deref())
    }

    async fn record(&self, event: AnalyticsEvent, properties: Map<String, Value>) {
        let Some(session) = &self.session else {
            return;
        };
        let record = EventRecord {
            session_id: session.id.clone(),
            anonymous_id: self.anonymous_id.clone(),
            project_id: self.project_id.clone(),
            event,
            properties,
        };
        if let Err(err) = self.sink.record_event(&record).await {
            tracing::debug!("Failed to record {}: {}", event, err);
        }
    }

    async fn heartbeat(&self) {
        if let Some(id) = self.session_id() {
            if let Err(err) = self.sink.heartbeat(id).await {
                tracing::debug!("Heartbeat failed: {}", err);
            }
        }
    }

    async fn close(&self) {
        self.record(AnalyticsEvent::PluginClosed, Map::new()).await;
        if let Some(id) = self.session_id() {
            if let Err(err) = self.sink.end_session(id, chrono::Utc::now()).await {
                tracing::debug!("Failed to end session: {}", err);
            }
        }
    }
}
