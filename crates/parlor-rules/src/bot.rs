//! Computer-controlled Ludo seats.
//!
//! A bot turn is two steps, each run by the hub after a delay: roll, then
//! move. Both steps first check that the seat still holds the turn in the
//! expected phase, because a human may have acted during the delay.

use parlor_protocol::{Color, Side};
use tracing::debug;

use crate::Rejection;
use crate::board::{HOME, HOME_STRETCH, Track, piece_target};
use crate::dice::Dice;
use crate::rules::ruleset;
use crate::state::{Game, LudoBoard, Phase, RoomState};

/// Points for each kind of outcome a move can have.
pub const LEGAL_MOVE: u32 = 10;
pub const REACHES_HOME: u32 = 500;
pub const CAPTURES: u32 = 200;
pub const LANDS_SAFE: u32 = 50;

/// Score of moving one of `color`'s pieces to `to`.
fn score(board: &LudoBoard, track: Track, color: Color, to: i8) -> u32 {
    let mut score = LEGAL_MOVE;
    if to == HOME {
        score += REACHES_HOME;
    }
    if to < HOME_STRETCH {
        if let Some(cell) = track.global(color, to) {
            if track.is_safe(cell) {
                score += LANDS_SAFE;
            } else if board.pieces.iter().any(|(other, pieces)| {
                *other != color
                    && pieces.positions.iter().any(|p| track.global(*other, *p) == Some(cell))
            }) {
                score += CAPTURES;
            }
        }
    }
    score
}

/// Picks the best piece for `color` to move with the current dice value,
/// or `None` when no piece can move. Ties go to the lowest piece index.
pub fn choose_move(board: &LudoBoard, color: Color) -> Option<usize> {
    let track = Track::for_board(board);
    let dice = board.dice.dice_value;
    let pieces = board.pieces.get(&color)?;

    let mut best: Option<(usize, u32)> = None;
    for (index, from) in pieces.positions.iter().enumerate() {
        let Some(to) = piece_target(*from, dice) else {
            continue;
        };
        let s = score(board, track, color, to);
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((index, s));
        }
    }
    best.map(|(index, _)| index)
}

/// Checks that `side` is a bot seat holding the turn in `phase`.
fn still_bots_turn(state: &RoomState, side: Side, phase: Phase) -> Result<(), Rejection> {
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    if state.turn != side || !state.is_bot_seat(side) {
        return Err(Rejection::NotYourTurn);
    }
    if state.phase() != Some(phase) {
        return Err(match phase {
            Phase::Roll => Rejection::AlreadyRolled,
            _ => Rejection::MustRoll,
        });
    }
    Ok(())
}

/// First bot step: roll for `side`.
pub fn bot_roll(state: &mut RoomState, side: Side, dice: &dyn Dice) -> Result<u8, Rejection> {
    still_bots_turn(state, side, Phase::Roll)?;
    let value = ruleset(state.game_type()).roll_dice(state, side, dice)?;
    debug!(%side, value, "bot rolled");
    Ok(value)
}

/// Second bot step: move the best piece for `side` and return its index.
///
/// A roll with no legal move already left the turn in auto-pass, so a move
/// phase without a movable piece is refused rather than passed here.
pub fn bot_move(state: &mut RoomState, side: Side) -> Result<usize, Rejection> {
    still_bots_turn(state, side, Phase::Move)?;
    let piece = match (&state.game, side.color()) {
        (Game::Ludo(board), Some(color)) => choose_move(board, color),
        _ => return Err(Rejection::NotYourTurn),
    }
    .ok_or(Rejection::TurnPassing)?;
    ruleset(state.game_type()).apply_move(state, piece, side)?;
    debug!(%side, piece, "bot moved");
    Ok(piece)
}
