//! Room persistence for Parlor.
//!
//! The session hub never owns storage: it loads a room's state once when
//! the room is first opened, saves after every accepted change, and asks
//! whether a room has expired before letting anyone in. [`RoomStore`] is
//! that contract; [`MemoryStore`] is the in-process implementation.
//!
//! ```text
//! Session Hub (above)  ← load / save / is_expired per room code
//!     ↕
//! Store (this crate)   ← owns room states and their creation times
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreConfig};
pub use store::RoomStore;
