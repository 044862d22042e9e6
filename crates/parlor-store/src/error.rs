//! Error types for the persistence layer.

use parlor_protocol::RoomCode;

/// Errors a [`RoomStore`](crate::RoomStore) can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No room was ever stored under this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The backing store could not complete the request. Nothing was
    /// written; the caller may retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
