//! # Assetify Analytics
//!
//! Anonymous usage events for the asset panel, sent on a side channel that
//! never blocks or fails the plugin.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  track()   ┌──────────────┐        ┌────────────┐
//! │  Analytics │ ─────────► │    Worker    │ ─────► │ EventSink  │
//! │  (handle)  │  unbounded │ session      │        │ RestSink   │
//! │            │  queue     │ heartbeat    │        │ MemorySink │
//! └────────────┘            └──────────────┘        └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let sink = Arc::new(RestSink::new(&config)?);
//! let analytics = Analytics::init(&config, sink, &storage, SessionOptions::default()).await;
//! analytics.track(AnalyticsEvent::SearchUsed, Map::new());
//! analytics.shutdown().await;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod sink;

pub use client::{Analytics, SessionOptions, ANONYMOUS_ID_KEY};
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, AnalyticsResult};
pub use event::{AnalyticsEvent, EventRecord, NewSession, Theme};
pub use sink::{EventSink, MemorySink, RestSink, SinkCall};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    //! Common imports for analytics users

    pub use crate::client::{Analytics, SessionOptions};
    pub use crate::config::AnalyticsConfig;
    pub use crate::event::{AnalyticsEvent, Theme};
    pub use crate::sink::{EventSink, RestSink};
}
