//! Error types for the asset catalog
//!
//! Scanning paths absorb failures and degrade to partial data, so only two
//! error types leave this crate:
//! - [`CatalogError`] at a loader boundary (logged, never surfaced)
//! - [`MutationError`] from user-initiated writes (surfaced to the caller)

use assetify_host::HostError;

/// Errors inside a source loader
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Host query failed
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Errors from write paths back into the document
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// Owning collection no longer exists
    #[error("Collection not found")]
    CollectionNotFound,

    /// Item no longer exists in its collection
    #[error("Item not found")]
    ItemNotFound,

    /// Item has no value for the field
    #[error("Field not found")]
    FieldNotFound,

    /// Field value is not an object that can carry alt text
    #[error("field {0} does not hold an image")]
    UnsupportedFieldShape(String),

    /// Asset key does not address a collection field
    #[error("invalid asset key: {0}")]
    InvalidKey(String),

    /// Entry has no usage location to navigate to
    #[error("asset has no usage location")]
    NoUsageLocation,

    /// Host rejected or failed the operation
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl MutationError {
    /// Check if error reports a missing document object
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CollectionNotFound | Self::ItemNotFound | Self::FieldNotFound => true,
            Self::Host(host) => host.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for loader operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for mutation operations
pub type MutationResult<T> = Result<T, MutationError>;
