//! Event sinks
//!
//! [`RestSink`] talks to a PostgREST-style endpoint:
//! - `POST /rest/v1/sessions` opens a session and returns its row
//! - `POST /rest/v1/events` appends one event
//! - `POST /rest/v1/rpc/heartbeat` marks the session live
//! - `PATCH /rest/v1/sessions?id=eq.<id>` stamps `ended_at`
//!
//! [`MemorySink`] records the same calls in memory.

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::event::{AnalyticsEvent, EventRecord, NewSession};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Destination for analytics rows
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Open a session, returning its id when the sink assigns one
    async fn open_session(&self, session: &NewSession) -> AnalyticsResult<Option<String>>;

    /// Append one event
    async fn record_event(&self, event: &EventRecord) -> AnalyticsResult<()>;

    /// Mark the session live
    async fn heartbeat(&self, session_id: &str) -> AnalyticsResult<()>;

    /// Close the session
    async fn end_session(&self, session_id: &str, ended_at: DateTime<Utc>) -> AnalyticsResult<()>;
}

/// HTTP sink for a PostgREST-style endpoint
#[derive(Debug, Clone)]
pub struct RestSink {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RestSink {
    /// Request timeout
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a sink for `config`
    pub fn new(config: &AnalyticsConfig) -> AnalyticsResult<Self> {
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// URL under `/rest/v1`
    #[must_use]
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.endpoint, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.rest_url(path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(builder: RequestBuilder) -> AnalyticsResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnalyticsError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl EventSink for RestSink {
    async fn open_session(&self, session: &NewSession) -> AnalyticsResult<Option<String>> {
        let body = Self::send(
            self.request(Method::POST, "sessions")
                .header("Prefer", "return=representation")
                .json(session),
        )
        .await?;
        session_id_from(&body)
    }

    async fn record_event(&self, event: &EventRecord) -> AnalyticsResult<()> {
        Self::send(
            self.request(Method::POST, "events")
                .header("Prefer", "return=minimal")
                .json(event),
        )
        .await?;
        Ok(())
    }

    async fn heartbeat(&self, session_id: &str) -> AnalyticsResult<()> {
        Self::send(
            self.request(Method::POST, "rpc/heartbeat")
                .json(&json!({ "p_session_id": session_id })),
        )
        .await?;
        Ok(())
    }

    async fn end_session(&self, session_id: &str, ended_at: DateTime<Utc>) -> AnalyticsResult<()> {
        Self::send(
            self.request(Method::PATCH, &format!("sessions?id=eq.{session_id}"))
                .header("Prefer", "return=minimal")
                .json(&json!({ "ended_at": ended_at.to_rfc3339() })),
        )
        .await?;
        Ok(())
    }
}

/// Pull the session id out of an inserted row (object or one-row array)
pub(crate) fn session_id_from(body: &str) -> AnalyticsResult<Option<String>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| AnalyticsError::Decode(e.to_string()))?;
    let row = match &value {
        Value::Array(rows) => rows.first(),
        other => Some(other),
    };
    Ok(row.and_then(|row| row.get("id")).and_then(|id| match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }))
}

/// One call observed by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    /// Session opened
    OpenSession(NewSession),
    /// Event appended
    Event(EventRecord),
    /// Heartbeat for a session
    Heartbeat(String),
    /// Session closed
    EndSession(String),
}

/// In-memory sink
///
/// Calls are recorded even when the sink is set to fail.
#[derive(Debug, Default)]
pub struct MemorySink {
    calls: Mutex<Vec<SinkCall>>,
    failing: AtomicBool,
    sessions: AtomicU64,
}

impl MemorySink {
    /// Empty sink that accepts every call
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that rejects every call with a 503
    #[must_use]
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.set_failing(true);
        sink
    }

    /// Toggle failures
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every call so far
    #[must_use]
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    /// Names of the recorded events
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Event(record) => Some(record.event),
                _ => None,
            })
            .collect()
    }

    /// Number of heartbeats
    #[must_use]
    pub fn heartbeats(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, SinkCall::Heartbeat(_)))
            .count()
    }

    fn record(&self, call: SinkCall) -> AnalyticsResult<()> {
        self.calls.lock().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AnalyticsError::Status {
                status: 503,
                body: "sink unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn open_session(&self, session: &NewSession) -> AnalyticsResult<Option<String>> {
        self.record(SinkCall::OpenSession(session.clone()))?;
        let n = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(format!("session-{n}")))
    }

    async fn record_event(&self, event: &EventRecord) -> AnalyticsResult<()> {
        self.record(SinkCall::Event(event.clone()))
    }

    async fn heartbeat(&self, session_id: &str) -> AnalyticsResult<()> {
        self.record(SinkCall::Heartbeat(session_id.to_string()))
    }

    async fn end_session(&self, session_id: &str, _ended_at: DateTime<Utc>) -> AnalyticsResult<()> {
        self.record(SinkCall::EndSession(session_id.to_string()))
    }
}
