//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error` impl;
/// the `#[error("...")]` text is what shows up in logs and in the
/// `error` message sent back to a client.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// unknown message `type`.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value parsed but violates protocol rules, e.g. an unknown
    /// side or color name.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
