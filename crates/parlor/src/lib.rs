//! # Parlor
//!
//! A real-time server for small multiplayer board games: Tic-Tac-Toe,
//! Ludo for two to eight players (online, against the computer, or on one
//! shared screen), and Snakes & Ladders.
//!
//! Clients connect over WebSocket to `/ws/game/<CODE>/`, send
//! `join_game`, `make_move`, `roll_dice` and `reset_game` intents, and get
//! the whole room state back after every accepted change. The server is
//! authoritative: rules, dice and computer players all run here.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use parlor::prelude::*;
//!
//! # async fn run() -> Result<(), ParlorError> {
//! let store = Arc::new(MemoryStore::default());
//! let code = store.create_room(&RoomOptions::ludo(Mode::Computer, 4));
//! println!("play at ws://127.0.0.1:8000/ws/game/{code}/");
//!
//! let server = ParlorServer::builder()
//!     .bind("127.0.0.1:8000")
//!     .build(store, QueryIdentity)
//!     .await?;
//! server.run().await
//! # }
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod handler;
mod identity;
mod route;
mod server;

pub use error::ParlorError;
pub use identity::{Identity, IdentityRejected, IdentityResolver, QueryIdentity, UNKNOWN_PLAYER};
pub use route::Route;
pub use server::{ParlorServer, ParlorServerBuilder};

/// Everything needed to stand up a server.
pub mod prelude {
    pub use crate::{
        Identity, IdentityRejected, IdentityResolver, ParlorError, ParlorServer,
        ParlorServerBuilder, QueryIdentity, Route,
    };
    pub use parlor_protocol::{ClientMessage, RoomCode, ServerMessage, Side};
    pub use parlor_room::HubConfig;
    pub use parlor_rules::{GameType, Mode, RoomOptions, RoomState};
    pub use parlor_store::{MemoryStore, RoomStore, StoreConfig};
}
