//! Turn scheduling for the dice games.
//!
//! After every mutation the hub asks two questions: whose turn is it now,
//! and does anything have to happen without a human (a bot acting, a dead
//! roll being passed)? This module answers both from the state alone.

use parlor_protocol::{Color, Side};
use tracing::debug;

use crate::Rejection;
use crate::board::piece_target;
use crate::dice::Dice;
use crate::state::{Game, Phase, RoomState};

/// Sixes in a row that still earn a repeat roll. The next six advances.
pub const MAX_REPEAT_SIXES: u8 = 2;

/// Work the hub must schedule after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// A bot holds the turn and has not rolled.
    BotRoll(Side),
    /// A bot has rolled and must pick a piece.
    BotMove(Side),
    /// The roll had no legal move; pass the turn after a pause.
    AutoPass,
}

/// What, if anything, happens next without client input.
pub fn follow_up(state: &RoomState) -> Option<FollowUp> {
    if state.game_over {
        return None;
    }
    match state.phase()? {
        Phase::AutoPass => Some(FollowUp::AutoPass),
        _ if !state.is_bot_seat(state.turn) => None,
        Phase::Roll => Some(FollowUp::BotRoll(state.turn)),
        Phase::Move => Some(FollowUp::BotMove(state.turn)),
    }
}

/// Seated colors in canonical order; spectators and controllers excluded.
pub fn active_sides(state: &RoomState) -> Vec<Side> {
    state.active_colors().into_iter().map(Side::Color).collect()
}

/// Points `turn` at a seated color if it does not already, falling back to
/// the first active seat and then to RED.
pub fn repair_turn(state: &mut RoomState) {
    match state.game {
        Game::TicTacToe(_) => {
            if !matches!(state.turn, Side::X | Side::O) {
                state.turn = Side::X;
            }
        }
        Game::Ludo(_) | Game::SnakesLadders(_) => {
            let active = active_sides(state);
            if !active.contains(&state.turn) {
                state.turn = active.first().copied().unwrap_or(Side::Color(Color::Red));
            }
        }
    }
}

/// Moves `turn` to the cyclic successor of the current seat.
fn next_seat(state: &mut RoomState) {
    let active = active_sides(state);
    state.turn = match active.iter().position(|side| *side == state.turn) {
        Some(i) => active[(i + 1) % active.len()],
        None => active.first().copied().unwrap_or(Side::Color(Color::Red)),
    };
}

/// Ludo turn advance. A six grants a repeat roll while the seat has had
/// fewer than [`MAX_REPEAT_SIXES`] repeats and nobody has won.
pub fn advance_turn(state: &mut RoomState) {
    let no_winner = state.winner.is_none();
    let Some(dice) = state.dice_mut() else {
        return;
    };
    if dice.dice_value == 6 && no_winner && dice.consecutive_sixes < MAX_REPEAT_SIXES {
        dice.consecutive_sixes += 1;
        dice.phase = Phase::Roll;
        dice.dice_value = 0;
        debug!(turn = %state.turn, "six rolled, same seat rolls again");
        return;
    }
    dice.clear();
    next_seat(state);
}

/// Snakes & Ladders turn advance: every six repeats, without a cap.
pub fn advance_turn_simple(state: &mut RoomState) {
    let no_winner = state.winner.is_none();
    let Some(dice) = state.dice_mut() else {
        return;
    };
    let repeat = dice.dice_value == 6 && no_winner;
    dice.clear();
    if !repeat {
        next_seat(state);
    }
}

/// Passes a turn whose roll had no legal move. Never a repeat.
pub fn pass_turn(state: &mut RoomState) {
    if let Some(dice) = state.dice_mut() {
        dice.dice_value = 0;
    }
    match state.game {
        Game::Ludo(_) => advance_turn(state),
        Game::SnakesLadders(_) => advance_turn_simple(state),
        Game::TicTacToe(_) => {}
    }
}

/// Checks that `acting` may roll now and rolls for it, leaving the phase
/// at MOVE. Returns the value rolled; a rejected roll consumes nothing.
pub fn roll_dice(state: &mut RoomState, acting: Side, dice: &dyn Dice) -> Result<u8, Rejection> {
    if state.dice().is_none() {
        return Err(Rejection::NoDice);
    }
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    if state.turn != acting {
        return Err(Rejection::NotYourTurn);
    }
    let turn = state.dice_mut().ok_or(Rejection::NoDice)?;
    match turn.phase {
        Phase::Roll => {}
        Phase::Move => return Err(Rejection::AlreadyRolled),
        Phase::AutoPass => return Err(Rejection::TurnPassing),
    }
    let value = dice.roll();
    turn.dice_value = value;
    turn.phase = Phase::Move;
    Ok(value)
}

/// Checks that `acting` holds the turn and has rolled.
pub(crate) fn require_move_phase(state: &RoomState, acting: Side) -> Result<u8, Rejection> {
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    if state.turn != acting {
        return Err(Rejection::NotYourTurn);
    }
    let turn = state.dice().ok_or(Rejection::NoDice)?;
    match turn.phase {
        Phase::Move => Ok(turn.dice_value),
        Phase::Roll => Err(Rejection::MustRoll),
        Phase::AutoPass => Err(Rejection::TurnPassing),
    }
}

/// `true` iff one of `color`'s Ludo pieces can move `dice_value` squares.
pub fn has_valid_moves(state: &RoomState, color: Color, dice_value: u8) -> bool {
    let Game::Ludo(board) = &state.game else {
        return false;
    };
    board.pieces.get(&color).is_some_and(|pieces| {
        pieces
            .positions
            .iter()
            .any(|pos| piece_target(*pos, dice_value).is_some())
    })
}
