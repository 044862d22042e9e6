//! Core protocol types for Parlor's wire format.
//!
//! This module defines every type that travels "on the wire" between a
//! browser client and the server, plus the identity vocabulary (room
//! codes, player keys, seats) that the rest of the workspace builds on.
//!
//! The JSON field names here are a contract with existing clients, so
//! most of the tests at the bottom check exact shapes rather than
//! round-trips.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The short code that identifies a room (e.g. `"K3ZQ8A"`).
///
/// A newtype around `String` so a room code can never be confused with a
/// player key. `#[serde(transparent)]` keeps the JSON a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl RoomCode {
    /// Creates a room code from anything string-like.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stable identity for a player across reconnects.
///
/// Usually the client's session key. Bot and local seats use synthetic
/// keys (`bot_green`, `local_red`) so they can live in the same player map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerKey(pub String);

impl PlayerKey {
    /// Creates a player key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Color: the canonical seat order for dice games
// ---------------------------------------------------------------------------

/// A seat color for Ludo and Snakes & Ladders.
///
/// The declaration order IS the canonical turn order. Standard boards use
/// the first four; extended Ludo uses all eight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Orange,
    Purple,
    Cyan,
    Pink,
}

impl Color {
    /// All colors in canonical order.
    pub const ALL: [Color; 8] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Orange,
        Color::Purple,
        Color::Cyan,
        Color::Pink,
    ];

    /// The four colors of a standard board.
    pub const STANDARD: [Color; 4] =
        [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// Position of this color in the canonical order (0..8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name, e.g. `"RED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
            Color::Blue => "BLUE",
            Color::Orange => "ORANGE",
            Color::Purple => "PURPLE",
            Color::Cyan => "CYAN",
            Color::Pink => "PINK",
        }
    }

    /// `true` for the four colors only found on extended boards.
    pub fn is_extended(self) -> bool {
        self.index() >= 4
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ProtocolError::InvalidMessage(format!("unknown color {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Side: the seat a connection occupies
// ---------------------------------------------------------------------------

/// The seat a player occupies in a room.
///
/// On the wire a side is a bare string: `"X"`, `"O"`, a color name such as
/// `"RED"`, `"SPECTATOR"`, or `"CONTROLLER"` (the non-playing driver of a
/// local pass-and-play Ludo room). Going through `String` with
/// `try_from`/`into` keeps that shape while the Rust side gets an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Side {
    X,
    O,
    Color(Color),
    Spectator,
    Controller,
}

impl Side {
    /// `true` for seats that take turns (not spectators or controllers).
    pub fn is_playing(self) -> bool {
        !matches!(self, Side::Spectator | Side::Controller)
    }

    /// Returns the color for colored seats.
    pub fn color(self) -> Option<Color> {
        match self {
            Side::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        Side::Color(color)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::X => f.write_str("X"),
            Side::O => f.write_str("O"),
            Side::Color(c) => f.write_str(c.as_str()),
            Side::Spectator => f.write_str("SPECTATOR"),
            Side::Controller => f.write_str("CONTROLLER"),
        }
    }
}

impl FromStr for Side {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(Side::X),
            "O" => Ok(Side::O),
            "SPECTATOR" => Ok(Side::Spectator),
            "CONTROLLER" => Ok(Side::Controller),
            other => other
                .parse::<Color>()
                .map(Side::Color)
                .map_err(|_| ProtocolError::InvalidMessage(format!("unknown side {other:?}"))),
        }
    }
}

impl TryFrom<String> for Side {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Side> for String {
    fn from(side: Side) -> Self {
        side.to_string()
    }
}

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces the flat
/// shape the browser client already speaks:
///   `{ "type": "make_move", "index": 4, "player": "X" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Take (or retake) a seat in the room. `name` overrides the display
    /// name supplied when the connection was opened.
    JoinGame {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Play a move. `index` is a board cell (Tic-Tac-Toe) or a piece
    /// index (Ludo); Snakes & Ladders ignores it.
    MakeMove {
        #[serde(default)]
        index: usize,
        player: Side,
    },

    /// Roll the die for the named seat.
    RollDice { player: Side },

    /// Clear the board and start a new round.
    ResetGame,
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// Messages the server sends to clients.
///
/// Generic over the state type so this crate doesn't need to know what a
/// room's state looks like; the hub instantiates it with its `RoomState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<S> {
    /// Private reply to `join_game`: the seat you got and the full state.
    GameStart { side: Side, game_state: S },

    /// Broadcast after every accepted mutation.
    GameUpdate { game_state: S },

    /// Private reply to a rejected intent. State is unchanged.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// Close codes
// ---------------------------------------------------------------------------

/// WebSocket close codes used when a connection is refused.
///
/// Clients tell "this room never existed" apart from "this room timed out"
/// by the code alone.
pub mod close_code {
    /// The room exists but its validity window has passed.
    pub const ROOM_EXPIRED: u16 = 4000;
    /// The requested path did not name a valid room.
    pub const BAD_ROUTE: u16 = 4001;
    /// The identity resolver turned the connection away.
    pub const UNAUTHORIZED: u16 = 4003;
    /// No room with that code exists.
    pub const ROOM_NOT_FOUND: u16 = 4004;
    /// The server failed while opening the room.
    pub const INTERNAL: u16 = 1011;
}

// =========================================================================
// Tests
// =========================================================================
