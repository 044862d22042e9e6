//! Room state: the serializable value that holds one room's whole game.
//!
//! Fields shared by every game live on [`RoomState`]; everything a single
//! game type needs lives in its own [`Game`] variant, so a Tic-Tac-Toe
//! room simply has no dice and a Ludo room has no 3x3 board.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use parlor_protocol::{Color, PlayerKey, Side};
use serde::{Deserialize, Serialize};

use crate::board::BASE;

// ---------------------------------------------------------------------------
// Room options
// ---------------------------------------------------------------------------

/// Which game a room plays. Fixed when the room is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    TicTacToe,
    Ludo,
    SnakesLadders,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TicTacToe => write!(f, "TIC_TAC_TOE"),
            Self::Ludo => write!(f, "LUDO"),
            Self::SnakesLadders => write!(f, "SNAKES_LADDERS"),
        }
    }
}

/// How the seats of a Ludo room are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Every seat is a separate connected human.
    #[default]
    Online,
    /// One human on RED, bots on every other seat.
    Computer,
    /// Pass-and-play: one connection drives every seat.
    Local,
}

/// Everything needed to build a fresh room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomOptions {
    pub game_type: GameType,
    pub mode: Mode,
    pub player_count: usize,
}

impl RoomOptions {
    /// Smallest and largest Ludo tables.
    pub const MIN_PLAYERS: usize = 2;
    pub const MAX_PLAYERS: usize = 8;

    pub fn tic_tac_toe() -> Self {
        Self { game_type: GameType::TicTacToe, mode: Mode::Online, player_count: 2 }
    }

    /// A Ludo table. `player_count` is clamped to 2..=8.
    pub fn ludo(mode: Mode, player_count: usize) -> Self {
        Self {
            game_type: GameType::Ludo,
            mode,
            player_count: player_count.clamp(Self::MIN_PLAYERS, Self::MAX_PLAYERS),
        }
    }

    pub fn snakes_ladders() -> Self {
        Self { game_type: GameType::SnakesLadders, mode: Mode::Online, player_count: 4 }
    }
}

impl FromStr for RoomOptions {
    type Err = String;

    /// Parses `tic-tac-toe`, `snakes-ladders`, or
    /// `ludo[:online|computer|local][:N]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match parts.next().unwrap_or_default() {
            "tic-tac-toe" | "ttt" => Ok(Self::tic_tac_toe()),
            "snakes-ladders" | "snakes" => Ok(Self::snakes_ladders()),
            "ludo" => {
                let mut mode = Mode::Online;
                let mut count = 4;
                for part in parts {
                    match part {
                        "online" => mode = Mode::Online,
                        "computer" => mode = Mode::Computer,
                        "local" => mode = Mode::Local,
                        n => {
                            count = n
                                .parse()
                                .map_err(|_| format!("bad ludo option {n:?}"))?;
                        }
                    }
                }
                Ok(Self::ludo(mode, count))
            }
            other => Err(format!("unknown game {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Who drives a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatKind {
    #[default]
    Human,
    Bot,
    Local,
}

/// One entry in the room's player map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub side: Side,
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub kind: SeatKind,
}

impl PlayerSlot {
    pub fn new(side: Side, name: impl Into<String>, kind: SeatKind) -> Self {
        Self { side, name: name.into(), score: 0, kind }
    }

    pub fn is_bot(&self) -> bool {
        self.kind == SeatKind::Bot
    }

    pub fn is_local(&self) -> bool {
        self.kind == SeatKind::Local
    }
}

/// How a finished round ended. Serialized as the winning side or `"Draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Outcome {
    Winner(Side),
    Draw,
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(side) => side.to_string(),
            Outcome::Draw => "Draw".to_string(),
        }
    }
}

impl TryFrom<String> for Outcome {
    type Error = parlor_protocol::ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "Draw" {
            Ok(Outcome::Draw)
        } else {
            value.parse().map(Outcome::Winner)
        }
    }
}

// ---------------------------------------------------------------------------
// Dice sub-state
// ---------------------------------------------------------------------------

/// Sub-state of a turn in a dice game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Waiting for the seat to roll.
    #[default]
    Roll,
    /// Waiting for the seat to pick a move for `dice_value`.
    Move,
    /// The roll has no legal move; the turn is passed after a delay.
    AutoPass,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roll => write!(f, "ROLL"),
            Self::Move => write!(f, "MOVE"),
            Self::AutoPass => write!(f, "AUTO_PASS"),
        }
    }
}

/// Roll bookkeeping shared by Ludo and Snakes & Ladders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiceTurn {
    pub phase: Phase,
    /// Last rolled value, 0 when unset.
    pub dice_value: u8,
    /// Sixes rolled in a row by the seat on turn. Never above 2.
    pub consecutive_sixes: u8,
}

impl DiceTurn {
    /// Back to "waiting for a roll" with nothing rolled.
    pub fn clear(&mut self) {
        *self = DiceTurn::default();
    }
}

// ---------------------------------------------------------------------------
// Per-game payloads
// ---------------------------------------------------------------------------

/// 3x3 board, row-major. Cells hold `X`, `O`, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeBoard {
    pub board: [Option<Side>; 9],
    /// Who opens the current round; flips on every reset.
    pub starting_turn: Side,
}

impl Default for TicTacToeBoard {
    fn default() -> Self {
        Self { board: [None; 9], starting_turn: Side::X }
    }
}

/// One color's four pieces.
///
/// Positions are local to the color: −1 base, 0–51 shared track, 52–56
/// home stretch, 57 home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pieces {
    pub positions: [i8; 4],
    pub finished: u8,
}

impl Default for Pieces {
    fn default() -> Self {
        Self { positions: [BASE; 4], finished: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LudoBoard {
    pub mode: Mode,
    pub player_count: usize,
    pub dice: DiceTurn,
    pub pieces: BTreeMap<Color, Pieces>,
}

static SEAT_ORDER: [Color; 8] = Color::ALL;

impl LudoBoard {
    /// The colors in play for this table size, in canonical order.
    pub fn color_set(&self) -> &'static [Color] {
        &SEAT_ORDER[..self.player_count.clamp(RoomOptions::MIN_PLAYERS, RoomOptions::MAX_PLAYERS)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnakesBoard {
    pub dice: DiceTurn,
    /// Square per seat, 0 (off the board) to 100.
    pub positions: BTreeMap<Color, u8>,
}

/// The game-specific part of a room, tagged by game type on the wire:
/// `{ "game_type": "LUDO", "mode": "ONLINE", ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Game {
    TicTacToe(TicTacToeBoard),
    Ludo(LudoBoard),
    SnakesLadders(SnakesBoard),
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// One room's full, authoritative game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    /// Everyone who has joined, keyed by their stable identity.
    pub players: BTreeMap<PlayerKey, PlayerSlot>,
    /// The seat whose move is awaited.
    pub turn: Side,
    pub winner: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub winner_name: Option<String>,
    pub game_over: bool,
    pub game: Game,
}

impl RoomState {
    /// The default payload for a freshly created room.
    pub fn new(options: &RoomOptions) -> Self {
        let (turn, game) = match options.game_type {
            GameType::TicTacToe => (Side::X, Game::TicTacToe(TicTacToeBoard::default())),
            GameType::Ludo => (
                Side::Color(Color::Red),
                Game::Ludo(LudoBoard {
                    mode: options.mode,
                    player_count: options
                        .player_count
                        .clamp(RoomOptions::MIN_PLAYERS, RoomOptions::MAX_PLAYERS),
                    dice: DiceTurn::default(),
                    pieces: BTreeMap::new(),
                }),
            ),
            GameType::SnakesLadders => {
                (Side::Color(Color::Red), Game::SnakesLadders(SnakesBoard::default()))
            }
        };
        Self {
            players: BTreeMap::new(),
            turn,
            winner: None,
            winner_name: None,
            game_over: false,
            game,
        }
    }

    pub fn game_type(&self) -> GameType {
        match self.game {
            Game::TicTacToe(_) => GameType::TicTacToe,
            Game::Ludo(_) => GameType::Ludo,
            Game::SnakesLadders(_) => GameType::SnakesLadders,
        }
    }

    /// Roll bookkeeping, for dice games only.
    pub fn dice(&self) -> Option<&DiceTurn> {
        match &self.game {
            Game::Ludo(b) => Some(&b.dice),
            Game::SnakesLadders(b) => Some(&b.dice),
            Game::TicTacToe(_) => None,
        }
    }

    pub fn dice_mut(&mut self) -> Option<&mut DiceTurn> {
        match &mut self.game {
            Game::Ludo(b) => Some(&mut b.dice),
            Game::SnakesLadders(b) => Some(&mut b.dice),
            Game::TicTacToe(_) => None,
        }
    }

    /// Current phase; Tic-Tac-Toe has none.
    pub fn phase(&self) -> Option<Phase> {
        self.dice().map(|d| d.phase)
    }

    /// The identity seated at `side`, if any. Spectators share a side and
    /// are never returned.
    pub fn key_for(&self, side: Side) -> Option<&PlayerKey> {
        if !side.is_playing() {
            return None;
        }
        self.players
            .iter()
            .find(|(_, slot)| slot.side == side)
            .map(|(key, _)| key)
    }

    pub fn slot_for(&self, side: Side) -> Option<&PlayerSlot> {
        self.key_for(side).and_then(|key| self.players.get(key))
    }

    pub fn slot_for_mut(&mut self, side: Side) -> Option<&mut PlayerSlot> {
        let key = self.key_for(side)?.clone();
        self.players.get_mut(&key)
    }

    /// `true` if `side` is held by a bot.
    pub fn is_bot_seat(&self, side: Side) -> bool {
        self.slot_for(side).is_some_and(PlayerSlot::is_bot)
    }

    /// Seated colors in canonical order, without duplicates.
    pub fn active_colors(&self) -> Vec<Color> {
        let mut colors: Vec<Color> =
            self.players.values().filter_map(|slot| slot.side.color()).collect();
        colors.sort();
        colors.dedup();
        colors
    }

    /// Marks `side` as the winner and credits its seat.
    pub(crate) fn declare_winner(&mut self, side: Side) {
        self.winner = Some(Outcome::Winner(side));
        self.game_over = true;
        let name = self.slot_for_mut(side).map(|slot| {
            slot.score += 1;
            slot.name.clone()
        });
        self.winner_name = Some(name.unwrap_or_else(|| side.to_string()));
    }

    /// Clears the round result.
    pub(crate) fn clear_outcome(&mut self) {
        self.winner = None;
        self.winner_name = None;
        self.game_over = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tic_tac_toe_defaults() {
        let state = RoomState::new(&RoomOptions::tic_tac_toe());
        assert_eq!(state.game_type(), GameType::TicTacToe);
        assert_eq!(state.turn, Side::X);
        assert!(state.dice().is_none());
        assert!(!state.game_over);
    }

    #[test]
    fn test_new_ludo_clamps_player_count() {
        let state = RoomState::new(&RoomOptions::ludo(Mode::Online, 12));
        match &state.game {
            Game::Ludo(board) => {
                assert_eq!(board.player_count, 8);
                assert_eq!(board.color_set().len(), 8);
            }
            other => panic!("expected ludo, got {other:?}"),
        }
    }

    #[test]
    fn test_room_options_parse() {
        assert_eq!("ttt".parse::<RoomOptions>().unwrap(), RoomOptions::tic_tac_toe());
        assert_eq!(
            "ludo:computer:3".parse::<RoomOptions>().unwrap(),
            RoomOptions::ludo(Mode::Computer, 3)
        );
        assert_eq!(
            "ludo".parse::<RoomOptions>().unwrap(),
            RoomOptions::ludo(Mode::Online, 4)
        );
        assert!("chess".parse::<RoomOptions>().is_err());
        assert!("ludo:lots".parse::<RoomOptions>().is_err());
    }

    #[test]
    fn test_game_is_tagged_by_game_type() {
        let state = RoomState::new(&RoomOptions::snakes_ladders());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["game"]["game_type"], "SNAKES_LADDERS");
        assert_eq!(json["game"]["dice"]["phase"], "ROLL");
        assert_eq!(json["turn"], "RED");
        assert!(json["winner"].is_null());
    }

    #[test]
    fn test_outcome_serializes_as_side_or_draw() {
        assert_eq!(
            serde_json::to_string(&Outcome::Winner(Side::X)).unwrap(),
            "\"X\""
        );
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"Draw\"");
        let back: Outcome = serde_json::from_str("\"Draw\"").unwrap();
        assert_eq!(back, Outcome::Draw);
    }

    #[test]
    fn test_room_state_survives_json_round_trip_with_pieces() {
        let mut state = RoomState::new(&RoomOptions::ludo(Mode::Online, 4));
        if let Game::Ludo(board) = &mut state.game {
            board.pieces.insert(Color::Green, Pieces { positions: [3, -1, 57, 52], finished: 1 });
        }
        state.players.insert(
            PlayerKey::new("abc"),
            PlayerSlot::new(Side::Color(Color::Green), "Ann", SeatKind::Human),
        );
        let json = serde_json::to_string(&state).unwrap();
        let back: RoomState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_declare_winner_credits_seat() {
        let mut state = RoomState::new(&RoomOptions::tic_tac_toe());
        state
            .players
            .insert(PlayerKey::new("p1"), PlayerSlot::new(Side::O, "Olga", SeatKind::Human));
        state.declare_winner(Side::O);
        assert_eq!(state.winner, Some(Outcome::Winner(Side::O)));
        assert_eq!(state.winner_name.as_deref(), Some("Olga"));
        assert_eq!(state.players[&PlayerKey::new("p1")].score, 1);
        assert!(state.game_over);
    }
}
