//! The Rules Engine: one [`Ruleset`] per game type.
//!
//! A room looks its ruleset up once, by game type, and routes every intent
//! through it. Rulesets are stateless; they transform the `RoomState`
//! handed to them and either succeed or return a [`Rejection`] having
//! changed nothing.

mod ludo;
mod snakes;
mod tic_tac_toe;

use std::collections::HashSet;

use parlor_protocol::{PlayerKey, Side};

pub use ludo::LudoRules;
pub use snakes::SnakesRules;
pub use tic_tac_toe::TicTacToeRules;

use crate::Rejection;
use crate::dice::Dice;
use crate::state::{GameType, PlayerSlot, RoomState, SeatKind};

/// Answers "is this identity connected right now?" during seat assignment.
pub trait Presence {
    fn is_present(&self, key: &PlayerKey) -> bool;
}

impl Presence for HashSet<PlayerKey> {
    fn is_present(&self, key: &PlayerKey) -> bool {
        self.contains(key)
    }
}

/// Game-specific rules behind a common interface.
pub trait Ruleset: Send + Sync + 'static {
    fn game_type(&self) -> GameType;

    /// Seats `key` (or reseats it on rejoin) and returns the side it holds.
    /// `name` replaces any stored display name.
    fn assign_seat(
        &self,
        state: &mut RoomState,
        key: &PlayerKey,
        name: &str,
        presence: &dyn Presence,
    ) -> Side;

    /// Validates and applies a move for `acting`. `index` is a cell for
    /// Tic-Tac-Toe, a piece for Ludo, and ignored by Snakes & Ladders.
    fn apply_move(&self, state: &mut RoomState, index: usize, acting: Side)
    -> Result<(), Rejection>;

    /// Rolls for `acting`. Games without dice reject.
    fn roll_dice(
        &self,
        _state: &mut RoomState,
        _acting: Side,
        _dice: &dyn Dice,
    ) -> Result<u8, Rejection> {
        Err(Rejection::NoDice)
    }

    /// Starts a new round, keeping seats and scores.
    fn reset_game(&self, state: &mut RoomState);

    /// `true` when the board itself shows a finished round.
    fn has_terminal_condition(&self, state: &RoomState) -> bool;
}

/// The ruleset for a game type.
pub fn ruleset(game_type: GameType) -> &'static dyn Ruleset {
    match game_type {
        GameType::TicTacToe => &TicTacToeRules,
        GameType::Ludo => &LudoRules,
        GameType::SnakesLadders => &SnakesRules,
    }
}

/// Checks that `key` may act for `side`: its own seat, or any local seat
/// when it is the room's controller. Bot seats are never client-driven.
pub fn authorize(state: &RoomState, key: &PlayerKey, side: Side) -> Result<(), Rejection> {
    if state.is_bot_seat(side) {
        return Err(Rejection::BotSeat);
    }
    let slot = state.players.get(key).ok_or(Rejection::NotSeated)?;
    if slot.side == side && side.is_playing() {
        return Ok(());
    }
    if slot.side == Side::Controller && state.slot_for(side).is_some_and(|s| s.is_local()) {
        return Ok(());
    }
    if slot.side.is_playing() || slot.side == Side::Controller {
        Err(Rejection::NotYourSeat)
    } else {
        Err(Rejection::NotSeated)
    }
}

/// Re-seats an identity that already has a playing or controller seat.
fn rejoin(state: &mut RoomState, key: &PlayerKey, name: &str) -> Option<Side> {
    let slot = state.players.get_mut(key)?;
    slot.name = name.to_string();
    (slot.side != Side::Spectator).then_some(slot.side)
}

/// Records `key` as a spectator.
fn spectate(state: &mut RoomState, key: &PlayerKey, name: &str) -> Side {
    state
        .players
        .insert(key.clone(), PlayerSlot::new(Side::Spectator, name, SeatKind::Human));
    Side::Spectator
}
