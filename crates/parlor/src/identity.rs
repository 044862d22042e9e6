//! Identity hook: who is behind a new connection.
//!
//! Parlor doesn't run accounts. A connection's identity is a stable
//! [`PlayerKey`] (used to find the seat again on reconnect) plus a display
//! name. Where those come from is up to the deployment: a session cookie
//! checked by a proxy, a signed token in the query string, or nothing at
//! all. The gateway asks an [`IdentityResolver`] once per connection,
//! before it is attached to its room.

use parlor_protocol::PlayerKey;
use parlor_transport::ConnectionId;

use crate::route::Route;

/// Display name used when the client supplies none.
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// Who a connection acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub key: PlayerKey,
    pub name: String,
}

/// The resolver refused the connection. The reason is sent to the client
/// in the close frame.
#[derive(Debug, Clone, thiserror::Error)]
#[error("identity rejected: {0}")]
pub struct IdentityRejected(pub String);

/// Resolves the identity of a newly accepted connection.
///
/// # Trait bounds
///
/// `Send + Sync + 'static`: one resolver is shared by every connection
/// task for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use parlor::{Identity, IdentityRejected, IdentityResolver, Route};
/// use parlor_protocol::PlayerKey;
/// use parlor_transport::ConnectionId;
///
/// /// Only lets in clients that present the shared table password.
/// struct TablePassword(String);
///
/// impl IdentityResolver for TablePassword {
///     async fn resolve(
///         &self,
///         route: &Route,
///         conn: ConnectionId,
///     ) -> Result<Identity, IdentityRejected> {
///         if route.param("password") != Some(self.0.as_str()) {
///             return Err(IdentityRejected("wrong password".into()));
///         }
///         Ok(Identity {
///             key: PlayerKey::new(format!("guest-{}", conn.into_inner())),
///             name: route.param("name").unwrap_or("Guest").to_owned(),
///         })
///     }
/// }
/// ```
pub trait IdentityResolver: Send + Sync + 'static {
    fn resolve(
        &self,
        route: &Route,
        conn: ConnectionId,
    ) -> impl std::future::Future<Output = Result<Identity, IdentityRejected>> + Send;
}

/// Reads `player` and `name` from the query string.
///
/// A connection without `player` gets a key unique to the connection, so
/// it can play but cannot reclaim its seat after reconnecting. A missing
/// `name` becomes [`UNKNOWN_PLAYER`]. Never rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryIdentity;

impl IdentityResolver for QueryIdentity {
    async fn resolve(
        &self,
        route: &Route,
        conn: ConnectionId,
    ) -> Result<Identity, IdentityRejected> {
        let key = match route.param("player") {
            Some(player) => PlayerKey::new(player),
            None => PlayerKey::new(format!("guest-{}", conn.into_inner())),
        };
        let name = route.param("name").unwrap_or(UNKNOWN_PLAYER).to_owned();
        Ok(Identity { key, name })
    }
}
