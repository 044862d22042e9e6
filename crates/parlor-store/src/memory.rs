//! In-memory room store with age-based expiry.
//!
//! Rooms live in a `HashMap` behind a `std::sync::Mutex`. The lock is only
//! ever held for a map lookup or insert, never across an `.await`, so a
//! blocking mutex is the right tool even inside async code.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use parlor_protocol::RoomCode;
use parlor_rules::{RoomOptions, RoomState};
use rand::Rng;
use tokio::time::Instant;

use crate::{RoomStore, StoreError};

/// Characters room codes are drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Settings for [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long after creation a room stays joinable.
    pub room_ttl: Duration,

    /// Length of generated room codes.
    pub code_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            room_ttl: Duration::from_secs(5 * 60),
            code_length: 6,
        }
    }
}

struct StoredRoom {
    state: RoomState,
    created_at: Instant,
}

/// Keeps every room in process memory.
///
/// Expired rooms are not removed: they can still be loaded and saved, the
/// gateway just stops admitting new connections to them.
pub struct MemoryStore {
    rooms: Mutex<HashMap<RoomCode, StoredRoom>>,
    config: StoreConfig,
}

impl MemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Creates a room with the default state for `options` under a fresh
    /// random code.
    pub fn create_room(&self, options: &RoomOptions) -> RoomCode {
        let mut rooms = self.rooms();
        let code = loop {
            let candidate = generate_code(self.config.code_length);
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        rooms.insert(
            code.clone(),
            StoredRoom {
                state: RoomState::new(options),
                created_at: Instant::now(),
            },
        );
        tracing::info!(room = %code, game = %options.game_type, "room created");
        code
    }

    /// Stores `state` under a caller-chosen code, replacing any room
    /// already there and restarting its validity window.
    pub fn insert(&self, code: RoomCode, state: RoomState) {
        self.rooms().insert(
            code,
            StoredRoom {
                state,
                created_at: Instant::now(),
            },
        );
    }

    /// Number of stored rooms, expired or not.
    pub fn len(&self) -> usize {
        self.rooms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms().is_empty()
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<RoomCode, StoredRoom>> {
        self.rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl RoomStore for MemoryStore {
    async fn load(&self, code: &RoomCode) -> Result<RoomState, StoreError> {
        self.rooms()
            .get(code)
            .map(|room| room.state.clone())
            .ok_or_else(|| StoreError::NotFound(code.clone()))
    }

    async fn save(&self, code: &RoomCode, state: &RoomState) -> Result<(), StoreError> {
        let mut rooms = self.rooms();
        let room = rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        room.state = state.clone();
        Ok(())
    }

    async fn is_expired(&self, code: &RoomCode) -> Result<bool, StoreError> {
        self.rooms()
            .get(code)
            .map(|room| room.created_at.elapsed() > self.config.room_ttl)
            .ok_or_else(|| StoreError::NotFound(code.clone()))
    }
}

/// A random code of `len` characters from [`CODE_ALPHABET`].
fn generate_code(len: usize) -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..len)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    RoomCode::new(code)
}

// =========================================================================
// Tests
// =========================================================================
