//! The session hub for Parlor.
//!
//! Each opened room runs as an isolated Tokio task (actor model) that
//! owns the room's committed state. Intents from every connection in the
//! room, and the bot and auto-pass steps scheduled after them, queue on
//! one channel and are applied strictly one at a time.
//!
//! # Key types
//!
//! - [`RoomManager`]: opens rooms from a store and hands out handles
//! - [`RoomHandle`]: attach, submit intents, detach
//! - [`Lifecycle`]: waiting, in progress, terminal
//! - [`HubConfig`]: bot and auto-pass delays, channel size

mod config;
mod error;
mod manager;
mod room;

pub use config::{HubConfig, Lifecycle};
pub use error::HubError;
pub use manager::RoomManager;
pub use room::{PlayerSender, RoomHandle, RoomInfo, RoomOutbound, SubscriberId};
