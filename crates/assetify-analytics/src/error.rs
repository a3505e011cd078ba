//! Error types for the analytics side channel
//!
//! None of these reach plugin code through [`crate::Analytics::track`]; they
//! exist so sinks can report what went wrong to the worker, which logs them.

/// Errors from an event sink or the event queue
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// The worker has shut down
    #[error("analytics queue closed")]
    QueueClosed,
}

/// Result alias for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = AnalyticsError::Status {
            status: 401,
            body: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "endpoint returned 401: bad key");
        assert_eq!(AnalyticsError::QueueClosed.to_string(), "analytics queue closed");
    }
}
