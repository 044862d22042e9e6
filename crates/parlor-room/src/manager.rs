//! Room manager: opens rooms from the store and hands out their handles.

use std::collections::HashMap;
use std::sync::Arc;

use parlor_protocol::RoomCode;
use parlor_rules::{Dice, RandomDice, RoomState};
use parlor_store::RoomStore;
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{HubConfig, HubError, RoomHandle, RoomInfo};

/// Keeps one running actor per room that has been opened, keyed by code.
///
/// This is the entry point for the gateway: every connection asks the
/// manager for its room's handle, and every connection to the same room
/// gets a handle to the same actor.
pub struct RoomManager<S: RoomStore> {
    store: Arc<S>,
    dice: Arc<dyn Dice>,
    config: HubConfig,
    rooms: HashMap<RoomCode, RoomHandle>,
}

impl<S: RoomStore> RoomManager<S> {
    /// Creates an empty manager rolling real dice.
    pub fn new(store: Arc<S>, config: HubConfig) -> Self {
        Self {
            store,
            dice: Arc::new(RandomDice),
            config,
            rooms: HashMap::new(),
        }
    }

    /// Replaces the dice every room opened from now on rolls with.
    pub fn with_dice(mut self, dice: Arc<dyn Dice>) -> Self {
        self.dice = dice;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the handle for `code`, starting its actor on first use.
    ///
    /// # Errors
    ///
    /// - [`HubError::NotFound`]: no such room in the store
    /// - [`HubError::Expired`]: the room is past its validity window
    /// - [`HubError::Store`]: the store failed
    pub async fn open(&mut self, code: &RoomCode) -> Result<RoomHandle, HubError> {
        if self.store.is_expired(code).await? {
            return Err(HubError::Expired(code.clone()));
        }
        if let Some(handle) = self.get(code) {
            return Ok(handle);
        }
        let state = self.store.load(code).await?;
        Ok(self.register(code, state))
    }

    /// Like [`open`](Self::open), for a manager shared between tasks.
    ///
    /// The lock is held only for the registry lookup and insert, never
    /// across a store call, so a slow store delays only the rooms it is
    /// loading.
    pub async fn open_shared(rooms: &Mutex<Self>, code: &RoomCode) -> Result<RoomHandle, HubError> {
        let store = Arc::clone(rooms.lock().await.store());
        if store.is_expired(code).await? {
            return Err(HubError::Expired(code.clone()));
        }
        if let Some(handle) = rooms.lock().await.get(code) {
            return Ok(handle);
        }
        let state = store.load(code).await?;
        Ok(rooms.lock().await.register(code, state))
    }

    /// Returns the handle of an open room whose actor is still running.
    pub fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).filter(|h| !h.is_closed()).cloned()
    }

    /// Spawns the actor for `code` unless another caller got there first.
    fn register(&mut self, code: &RoomCode, state: RoomState) -> RoomHandle {
        if let Some(handle) = self.get(code) {
            return handle;
        }
        let handle = spawn_room(
            code.clone(),
            state,
            Arc::clone(&self.store),
            Arc::clone(&self.dice),
            self.config.clone(),
        );
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(room = %code, rooms = self.rooms.len(), "room opened");
        handle
    }

    /// Queries every open room. Rooms that fail to respond are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.get_info().await {
                infos.push(info);
            }
        }
        infos
    }

    /// Returns the number of open rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all open room codes.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }
}
