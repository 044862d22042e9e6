//! Unified error type for the Parlor gateway.

use parlor_protocol::ProtocolError;
use parlor_room::HubError;
use parlor_store::StoreError;
use parlor_transport::TransportError;

use crate::IdentityRejected;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room could not be opened or its actor is gone.
    #[error(transparent)]
    Hub(#[from] HubError),

    /// The store failed outside of a room actor.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The identity resolver refused the connection.
    #[error(transparent)]
    Identity(#[from] IdentityRejected),
}
