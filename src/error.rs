//! Failure types raised by capability providers.
//!
//! None of these escape the public [`crate::store::StateStore`] operations;
//! the store catches them at its boundary and downgrades to in-memory state.

/// Error returned by a [`crate::capability::StorageProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The host has no usable storage area (disabled, sandboxed, private mode).
    #[error("storage is unavailable")]
    Unavailable,
    /// The write would exceed the storage quota.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Any other failure reported by the host.
    #[error("storage host error: {0}")]
    Host(String),
}

/// Error returned by a [`crate::capability::Codec`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value could not be encoded, or the string is not valid JSON.
    #[error("json codec failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reason hydration fell back to an empty mapping.
#[derive(Debug, thiserror::Error)]
pub enum HydrateError {
    /// Reading the storage slot failed.
    #[error("failed to read storage slot: {0}")]
    Storage(#[from] StorageError),
    /// The slot content is not decodable.
    #[error("failed to decode storage slot: {0}")]
    Decode(#[from] CodecError),
    /// The slot decoded to something other than a key/value object.
    #[error("storage slot holds {0}, expected an object")]
    NotAnObject(&'static str),
}
