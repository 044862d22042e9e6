//! `ParlorServer` builder and accept loop.
//!
//! This is the entry point for running a Parlor server. It ties the
//! layers together: transport → protocol → hub → rules, with a store
//! underneath.

use std::net::SocketAddr;
use std::sync::Arc;

use parlor_protocol::{Codec, JsonCodec};
use parlor_room::{HubConfig, RoomManager};
use parlor_rules::Dice;
use parlor_store::RoomStore;
use parlor_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ParlorError;
use crate::handler::handle_connection;
use crate::identity::IdentityResolver;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S: RoomStore, R: IdentityResolver, C: Codec> {
    pub(crate) rooms: Mutex<RoomManager<S>>,
    pub(crate) identity: R,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use parlor::prelude::*;
///
/// # async fn run() -> Result<(), ParlorError> {
/// let store = Arc::new(MemoryStore::default());
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:8000")
///     .build(store, QueryIdentity)
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    hub_config: HubConfig,
    dice: Option<Arc<dyn Dice>>,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            hub_config: HubConfig::default(),
            dice: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets bot and auto-pass delays and the per-room channel size.
    pub fn hub_config(mut self, config: HubConfig) -> Self {
        self.hub_config = config;
        self
    }

    /// Replaces the random dice, e.g. with scripted rolls in tests.
    pub fn dice(mut self, dice: Arc<dyn Dice>) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Binds the listener. Rooms are loaded from and saved to `store`.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, which is what the
    /// browser client speaks.
    pub async fn build<S: RoomStore, R: IdentityResolver>(
        self,
        store: Arc<S>,
        identity: R,
    ) -> Result<ParlorServer<S, R, JsonCodec>, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let mut rooms = RoomManager::new(store, self.hub_config);
        if let Some(dice) = self.dice {
            rooms = rooms.with_dice(dice);
        }

        let state = Arc::new(ServerState {
            rooms: Mutex::new(rooms),
            identity,
            codec: JsonCodec,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer<S: RoomStore, R: IdentityResolver, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<S, R, C>>,
}

impl ParlorServer<parlor_store::MemoryStore, crate::QueryIdentity, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }
}

impl<S, R, C> ParlorServer<S, R, C>
where
    S: RoomStore,
    R: IdentityResolver,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ParlorError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the accept loop.
    ///
    /// Each accepted connection gets its own handler task. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
