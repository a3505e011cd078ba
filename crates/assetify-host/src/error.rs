//! Error types for host document access

/// Errors raised by a host document implementation
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Node does not exist in the document
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Collection does not exist in the document
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// Item does not exist in its collection
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The host refused a write
    #[error("write rejected: {0}")]
    Rejected(String),

    /// The host could not answer the query
    #[error("host unavailable: {0}")]
    Unavailable(String),

    /// Document snapshot could not be decoded or encoded
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl HostError {
    /// Create a rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create an unavailability error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Check if error reports a missing document object
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_) | Self::CollectionNotFound(_) | Self::ItemNotFound(_)
        )
    }
}

/// Result type alias for host operations
pub type HostResult<T> = Result<T, HostError>;
