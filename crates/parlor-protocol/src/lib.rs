//! Wire protocol for Parlor.
//!
//! This crate defines the "language" that clients and servers speak:
//!
//! - **Identity** ([`RoomCode`], [`PlayerKey`], [`Side`], [`Color`]):
//!   who is where.
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]): the JSON
//!   shapes that travel on the socket.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Room hub (RoomState)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, Color, PlayerKey, RoomCode, ServerMessage, Side, close_code,
};
