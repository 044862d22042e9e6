use parlor_protocol::{PlayerKey, Side};
use tracing::debug;

use super::{Presence, Ruleset, rejoin, spectate};
use crate::Rejection;
use crate::state::{Game, GameType, Outcome, PlayerSlot, RoomState, SeatKind, TicTacToeBoard};

/// Rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Classic 3x3 noughts and crosses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeRules;

impl TicTacToeRules {
    /// The mark holding a complete line, if any.
    pub fn line_winner(board: &[Option<Side>; 9]) -> Option<Side> {
        LINES.iter().find_map(|[a, b, c]| match (board[*a], board[*b], board[*c]) {
            (Some(x), Some(y), Some(z)) if x == y && y == z => Some(x),
            _ => None,
        })
    }

    fn board_mut(state: &mut RoomState) -> Option<&mut TicTacToeBoard> {
        match &mut state.game {
            Game::TicTacToe(board) => Some(board),
            _ => None,
        }
    }
}

impl Ruleset for TicTacToeRules {
    fn game_type(&self) -> GameType {
        GameType::TicTacToe
    }

    fn assign_seat(
        &self,
        state: &mut RoomState,
        key: &PlayerKey,
        name: &str,
        _presence: &dyn Presence,
    ) -> Side {
        if let Some(side) = rejoin(state, key, name) {
            return side;
        }
        match [Side::X, Side::O].into_iter().find(|s| state.key_for(*s).is_none()) {
            Some(side) => {
                state
                    .players
                    .insert(key.clone(), PlayerSlot::new(side, name, SeatKind::Human));
                side
            }
            None => spectate(state, key, name),
        }
    }

    fn apply_move(
        &self,
        state: &mut RoomState,
        index: usize,
        acting: Side,
    ) -> Result<(), Rejection> {
        if state.game_over {
            return Err(Rejection::GameOver);
        }
        if state.turn != acting || !matches!(acting, Side::X | Side::O) {
            return Err(Rejection::NotYourTurn);
        }
        let board = Self::board_mut(state).ok_or(Rejection::NotYourTurn)?;
        let cell = board.board.get_mut(index).ok_or(Rejection::CellOutOfRange(index))?;
        if cell.is_some() {
            return Err(Rejection::CellOccupied(index));
        }
        *cell = Some(acting);

        let won = Self::line_winner(&board.board).is_some();
        let full = board.board.iter().all(Option::is_some);
        if won {
            state.declare_winner(acting);
            debug!(side = %acting, "three in a row");
        } else if full {
            state.winner = Some(Outcome::Draw);
            state.game_over = true;
        } else {
            state.turn = if acting == Side::X { Side::O } else { Side::X };
        }
        Ok(())
    }

    fn reset_game(&self, state: &mut RoomState) {
        state.clear_outcome();
        if let Some(board) = Self::board_mut(state) {
            board.board = [None; 9];
            board.starting_turn = if board.starting_turn == Side::X { Side::O } else { Side::X };
            let first = board.starting_turn;
            state.turn = first;
        }
    }

    fn has_terminal_condition(&self, state: &RoomState) -> bool {
        match &state.game {
            Game::TicTacToe(b) => {
                Self::line_winner(&b.board).is_some() || b.board.iter().all(Option::is_some)
            }
            _ => false,
        }
    }
}
