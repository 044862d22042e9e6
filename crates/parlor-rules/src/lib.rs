//! Game rules for Parlor.
//!
//! Everything in this crate is synchronous and free of I/O: a
//! [`RoomState`] goes in, a changed `RoomState` (or a [`Rejection`]) comes
//! out. The session hub owns when these run; this crate owns what they do.
//!
//! # Key types
//!
//! - [`RoomState`] / [`Game`]: one room's serializable state
//! - [`Ruleset`]: seat assignment, moves, rolls and resets per game type
//! - [`turn`]: whose turn is next and what happens without a human
//! - [`bot`]: move selection for computer-controlled Ludo seats
//! - [`Dice`]: where rolls come from

pub mod board;
pub mod bot;
mod dice;
mod error;
pub mod rules;
mod state;
pub mod turn;

pub use dice::{Dice, RandomDice, ScriptedDice};
pub use error::Rejection;
pub use rules::{Presence, Ruleset, authorize, ruleset};
pub use state::{
    DiceTurn, Game, GameType, LudoBoard, Mode, Outcome, Phase, Pieces, PlayerSlot, RoomOptions,
    RoomState, SeatKind, SnakesBoard, TicTacToeBoard,
};
pub use turn::FollowUp;
