//! The persistence contract the session hub depends on.

use std::future::Future;
use std::sync::Arc;

use parlor_protocol::RoomCode;
use parlor_rules::RoomState;

use crate::StoreError;

/// Loads and saves room states by room code.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one store is shared by every room actor
///   for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use parlor_protocol::RoomCode;
/// use parlor_rules::RoomState;
/// use parlor_store::{RoomStore, StoreError};
///
/// /// Never expires anything and forgets nothing.
/// #[derive(Default)]
/// struct Forever(Mutex<HashMap<RoomCode, RoomState>>);
///
/// impl RoomStore for Forever {
///     async fn load(&self, code: &RoomCode) -> Result<RoomState, StoreError> {
///         self.0
///             .lock()
///             .unwrap()
///             .get(code)
///             .cloned()
///             .ok_or_else(|| StoreError::NotFound(code.clone()))
///     }
///
///     async fn save(&self, code: &RoomCode, state: &RoomState) -> Result<(), StoreError> {
///         self.0.lock().unwrap().insert(code.clone(), state.clone());
///         Ok(())
///     }
///
///     async fn is_expired(&self, _code: &RoomCode) -> Result<bool, StoreError> {
///         Ok(false)
///     }
/// }
/// ```
pub trait RoomStore: Send + Sync + 'static {
    /// Returns the latest saved state of a room.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`]: no room with this code
    /// - [`StoreError::Unavailable`]: the backend failed
    fn load(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<RoomState, StoreError>> + Send;

    /// Replaces the stored state of a room. Either the whole state is
    /// written or nothing is.
    fn save(
        &self,
        code: &RoomCode,
        state: &RoomState,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// `true` once the room is past its validity window. Age-based; the
    /// hub only reads it.
    fn is_expired(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// A shared store is still a store.
impl<S: RoomStore> RoomStore for Arc<S> {
    fn load(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<RoomState, StoreError>> + Send {
        (**self).load(code)
    }

    fn save(
        &self,
        code: &RoomCode,
        state: &RoomState,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save(code, state)
    }

    fn is_expired(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).is_expired(code)
    }
}
