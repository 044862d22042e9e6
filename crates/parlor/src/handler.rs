//! Per-connection handler: routing, identity, and message pumping.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Parse the room code from the request target
//!   2. Resolve who the connection is
//!   3. Open the room (refusing expired and unknown rooms with a close code)
//!   4. Attach to the room and pump: inbound intents to the room, room
//!      output back to the socket

use std::sync::Arc;

use parlor_protocol::{ClientMessage, Codec, ServerMessage, close_code};
use parlor_room::{HubError, PlayerSender, RoomHandle, RoomManager, RoomOutbound, SubscriberId};
use parlor_store::RoomStore;
use parlor_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ParlorError;
use crate::identity::IdentityResolver;
use crate::route::Route;
use crate::server::ServerState;

/// Drop guard that detaches a connection from its room when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async send.
struct DetachGuard {
    room: RoomHandle,
    subscriber: SubscriberId,
}

impl Drop for DetachGuard {
    fn drop(&mut self) {
        let room = self.room.clone();
        let subscriber = self.subscriber;
        tokio::spawn(async move {
            let _ = room.detach(subscriber).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S, R, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<S, R, C>>,
) -> Result<(), ParlorError>
where
    S: RoomStore,
    R: IdentityResolver,
    C: Codec,
{
    let conn_id = conn.id();
    let conn = Arc::new(conn);

    // --- Step 1: Route ---
    let Some(route) = Route::parse(conn.request_target()) else {
        tracing::debug!(%conn_id, target = conn.request_target(), "not a game route");
        conn.close_with(close_code::BAD_ROUTE, "unknown route").await?;
        return Ok(());
    };
    let code = route.code.clone();

    // --- Step 2: Identity ---
    let identity = match state.identity.resolve(&route, conn_id).await {
        Ok(identity) => identity,
        Err(rejected) => {
            tracing::info!(%conn_id, room = %code, reason = %rejected.0, "identity rejected");
            conn.close_with(close_code::UNAUTHORIZED, &rejected.0).await?;
            return Err(rejected.into());
        }
    };

    // --- Step 3: Open the room ---
    let opened = RoomManager::open_shared(&state.rooms, &code).await;
    let room = match opened {
        Ok(room) => room,
        Err(e) => {
            let (close, reason) = match &e {
                HubError::Expired(_) => (close_code::ROOM_EXPIRED, "room expired"),
                HubError::NotFound(_) => (close_code::ROOM_NOT_FOUND, "room not found"),
                HubError::Store(_) | HubError::Unavailable(_) => {
                    (close_code::INTERNAL, "room unavailable")
                }
            };
            tracing::info!(%conn_id, room = %code, error = %e, "refusing connection");
            conn.close_with(close, reason).await?;
            return match e {
                HubError::Expired(_) | HubError::NotFound(_) => Ok(()),
                other => Err(other.into()),
            };
        }
    };

    // --- Step 4: Attach and pump ---
    let (tx, rx) = mpsc::unbounded_channel();
    let subscriber = room
        .attach(identity.key.clone(), identity.name.clone(), tx.clone())
        .await?;
    let _guard = DetachGuard {
        room: room.clone(),
        subscriber,
    };
    tracing::info!(%conn_id, room = %code, key = %identity.key, "connection attached");

    let writer = tokio::spawn(write_loop(Arc::clone(&conn), rx, Arc::clone(&state)));

    read_loop(&conn, &room, subscriber, &tx, &state.codec).await;

    writer.abort();
    tracing::info!(%conn_id, room = %code, "connection closed");
    // _guard drops here → detach fires.
    Ok(())
}

/// Forwards room output to the socket until the room or socket goes away.
async fn write_loop<S, R, C>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<Arc<RoomOutbound>>,
    state: Arc<ServerState<S, R, C>>,
) where
    S: RoomStore,
    R: IdentityResolver,
    C: Codec,
{
    while let Some(msg) = rx.recv().await {
        let bytes = match state.codec.encode(msg.as_ref()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(conn_id = %conn.id(), error = %e, "failed to encode outbound message");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, stopping writer");
            break;
        }
    }
}

/// Decodes client frames and submits them to the room until the client
/// leaves.
async fn read_loop(
    conn: &WebSocketConnection,
    room: &RoomHandle,
    subscriber: SubscriberId,
    tx: &PlayerSender,
    codec: &impl Codec,
) {
    let conn_id: ConnectionId = conn.id();
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode client message");
                let _ = tx.send(Arc::new(ServerMessage::Error {
                    message: format!("invalid message: {e}"),
                }));
                continue;
            }
        };

        if let Err(e) = room.submit(subscriber, msg).await {
            tracing::warn!(%conn_id, error = %e, "room went away");
            break;
        }
    }
}
