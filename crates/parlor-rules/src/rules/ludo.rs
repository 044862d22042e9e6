use parlor_protocol::{Color, PlayerKey, Side};
use tracing::{debug, info};

use super::{Presence, Ruleset, rejoin, spectate};
use crate::Rejection;
use crate::board::{BASE, HOME, HOME_STRETCH, Track, piece_target};
use crate::dice::Dice;
use crate::state::{Game, GameType, LudoBoard, Mode, Phase, Pieces, PlayerSlot, RoomState, SeatKind};
use crate::turn;

/// Ludo for 2 to 8 colors, in online, computer and local modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LudoRules;

/// Lower-case color name used in synthetic seat keys (`bot_green`).
fn seat_key(prefix: &str, color: Color) -> PlayerKey {
    PlayerKey::new(format!("{prefix}_{}", color.as_str().to_ascii_lowercase()))
}

fn board_mut(state: &mut RoomState) -> Option<&mut LudoBoard> {
    match &mut state.game {
        Game::Ludo(board) => Some(board),
        _ => None,
    }
}

/// Gives `color` a fresh set of pieces unless it already has some.
fn ensure_pieces(state: &mut RoomState, color: Color) {
    if let Some(board) = board_mut(state) {
        board.pieces.entry(color).or_default();
    }
}

/// Sends every opposing piece on `mover`'s landing cell back to base.
/// Returns how many were captured.
pub(crate) fn capture(board: &mut LudoBoard, mover: Color, local: i8) -> usize {
    let track = Track::for_board(board);
    let Some(cell) = track.global(mover, local) else {
        return 0;
    };
    if track.is_safe(cell) {
        return 0;
    }
    let mut captured = 0;
    for (color, pieces) in board.pieces.iter_mut() {
        if *color == mover {
            continue;
        }
        for pos in pieces.positions.iter_mut() {
            if track.global(*color, *pos) == Some(cell) {
                *pos = BASE;
                captured += 1;
            }
        }
    }
    captured
}

impl LudoRules {
    fn seat_online(state: &mut RoomState, key: &PlayerKey, name: &str, colors: &[Color]) -> Side {
        let free = colors
            .iter()
            .copied()
            .find(|c| state.key_for(Side::Color(*c)).is_none());
        match free {
            Some(color) => {
                let side = Side::Color(color);
                state
                    .players
                    .insert(key.clone(), PlayerSlot::new(side, name, SeatKind::Human));
                ensure_pieces(state, color);
                side
            }
            None => spectate(state, key, name),
        }
    }

    fn seat_computer(
        state: &mut RoomState,
        key: &PlayerKey,
        name: &str,
        colors: &[Color],
        presence: &dyn Presence,
    ) -> Side {
        let red = Side::Color(Color::Red);
        if let Some(holder) = state.key_for(red).cloned() {
            if state.players[&holder].is_bot() || presence.is_present(&holder) {
                return spectate(state, key, name);
            }
            debug!(stale = %holder, "evicting disconnected red player");
            state.players.remove(&holder);
        }
        state
            .players
            .insert(key.clone(), PlayerSlot::new(red, name, SeatKind::Human));
        ensure_pieces(state, Color::Red);

        for color in colors.iter().copied().filter(|c| *c != Color::Red) {
            let side = Side::Color(color);
            if state.key_for(side).is_none() {
                state.players.insert(
                    seat_key("bot", color),
                    PlayerSlot::new(side, format!("Computer ({color})"), SeatKind::Bot),
                );
            }
            ensure_pieces(state, color);
        }
        red
    }

    fn seat_local(state: &mut RoomState, key: &PlayerKey, name: &str, colors: &[Color]) -> Side {
        if state.players.values().any(PlayerSlot::is_local) {
            return spectate(state, key, name);
        }
        for (n, color) in colors.iter().copied().enumerate() {
            state.players.insert(
                seat_key("local", color),
                PlayerSlot::new(Side::Color(color), format!("Player {}", n + 1), SeatKind::Local),
            );
            ensure_pieces(state, color);
        }
        state
            .players
            .insert(key.clone(), PlayerSlot::new(Side::Controller, name, SeatKind::Human));
        Side::Controller
    }
}

impl Ruleset for LudoRules {
    fn game_type(&self) -> GameType {
        GameType::Ludo
    }

    fn assign_seat(
        &self,
        state: &mut RoomState,
        key: &PlayerKey,
        name: &str,
        presence: &dyn Presence,
    ) -> Side {
        let Game::Ludo(board) = &state.game else {
            return Side::Spectator;
        };
        let (mode, colors) = (board.mode, board.color_set());

        let side = match rejoin(state, key, name) {
            Some(side) => side,
            None => match mode {
                Mode::Online => Self::seat_online(state, key, name, colors),
                Mode::Computer => Self::seat_computer(state, key, name, colors, presence),
                Mode::Local => Self::seat_local(state, key, name, colors),
            },
        };
        turn::repair_turn(state);
        side
    }

    fn apply_move(
        &self,
        state: &mut RoomState,
        index: usize,
        acting: Side,
    ) -> Result<(), Rejection> {
        let dice = turn::require_move_phase(state, acting)?;
        let color = acting.color().ok_or(Rejection::NotYourTurn)?;
        let board = board_mut(state).ok_or(Rejection::NoDice)?;
        let pieces = board.pieces.get(&color).ok_or(Rejection::NotSeated)?;
        let from = *pieces.positions.get(index).ok_or(Rejection::NoSuchPiece(index))?;

        let target = match from {
            BASE if dice != 6 => return Err(Rejection::NeedSix),
            f if f >= HOME => return Err(Rejection::PieceHome),
            f => piece_target(f, dice).ok_or(Rejection::Overshoot)?,
        };

        let won = {
            let pieces = board.pieces.entry(color).or_default();
            pieces.positions[index] = target;
            if target == HOME {
                pieces.finished += 1;
            }
            pieces.finished >= 4
        };
        if target < HOME_STRETCH {
            let captured = capture(board, color, target);
            if captured > 0 {
                debug!(%color, cell = target, captured, "capture");
            }
        }

        if won {
            state.declare_winner(acting);
            info!(%color, "all pieces home");
        }
        turn::advance_turn(state);
        Ok(())
    }

    fn roll_dice(
        &self,
        state: &mut RoomState,
        acting: Side,
        dice: &dyn Dice,
    ) -> Result<u8, Rejection> {
        let value = turn::roll_dice(state, acting, dice)?;
        let playable = acting
            .color()
            .is_some_and(|color| turn::has_valid_moves(state, color, value));
        if !playable {
            if let Some(d) = state.dice_mut() {
                d.phase = Phase::AutoPass;
            }
        }
        Ok(value)
    }

    fn reset_game(&self, state: &mut RoomState) {
        state.clear_outcome();
        if let Some(board) = board_mut(state) {
            board.dice.clear();
            for pieces in board.pieces.values_mut() {
                *pieces = Pieces::default();
            }
        }
        state.turn = turn::active_sides(state)
            .first()
            .copied()
            .unwrap_or(Side::Color(Color::Red));
    }

    fn has_terminal_condition(&self, state: &RoomState) -> bool {
        match &state.game {
            Game::Ludo(board) => board
                .pieces
                .values()
                .any(|p| p.positions.iter().all(|pos| *pos == HOME)),
            _ => false,
        }
    }
}
