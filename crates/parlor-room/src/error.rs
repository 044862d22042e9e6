//! Error types for the hub layer.

use parlor_protocol::RoomCode;
use parlor_store::StoreError;

/// Errors that can occur while opening or talking to a room.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// No room with this code exists.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room exists but is past its validity window.
    #[error("room {0} has expired")]
    Expired(RoomCode),

    /// The store failed while loading the room.
    #[error("store error: {0}")]
    Store(#[source] StoreError),

    /// The room's actor has stopped or its channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}

impl From<StoreError> for HubError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(code) => HubError::NotFound(code),
            other => HubError::Store(other),
        }
    }
}
