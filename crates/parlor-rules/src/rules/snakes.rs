use parlor_protocol::{Color, PlayerKey, Side};
use tracing::{debug, info};

use super::{Presence, Ruleset, rejoin, spectate};
use crate::Rejection;
use crate::board::{FINAL_SQUARE, remap};
use crate::dice::Dice;
use crate::state::{Game, GameType, PlayerSlot, RoomState, SeatKind, SnakesBoard};
use crate::turn;

/// Snakes & Ladders for up to four players on a 100-square board.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakesRules;

fn board_mut(state: &mut RoomState) -> Option<&mut SnakesBoard> {
    match &mut state.game {
        Game::SnakesLadders(board) => Some(board),
        _ => None,
    }
}

impl Ruleset for SnakesRules {
    fn game_type(&self) -> GameType {
        GameType::SnakesLadders
    }

    fn assign_seat(
        &self,
        state: &mut RoomState,
        key: &PlayerKey,
        name: &str,
        _presence: &dyn Presence,
    ) -> Side {
        let side = match rejoin(state, key, name) {
            Some(side) => side,
            None => {
                let free = Color::STANDARD
                    .into_iter()
                    .find(|c| state.key_for(Side::Color(*c)).is_none());
                match free {
                    Some(color) => {
                        state.players.insert(
                            key.clone(),
                            PlayerSlot::new(Side::Color(color), name, SeatKind::Human),
                        );
                        if let Some(board) = board_mut(state) {
                            board.positions.entry(color).or_insert(0);
                        }
                        Side::Color(color)
                    }
                    None => spectate(state, key, name),
                }
            }
        };
        turn::repair_turn(state);
        side
    }

    /// Moves the acting seat by the rolled value. An overshoot of square
    /// 100 forfeits the move but still ends the turn.
    fn apply_move(
        &self,
        state: &mut RoomState,
        _index: usize,
        acting: Side,
    ) -> Result<(), Rejection> {
        let dice = turn::require_move_phase(state, acting)?;
        let color = acting.color().ok_or(Rejection::NotYourTurn)?;
        let board = board_mut(state).ok_or(Rejection::NoDice)?;
        let pos = board.positions.get_mut(&color).ok_or(Rejection::NotSeated)?;

        let landing = *pos + dice;
        if landing > FINAL_SQUARE {
            debug!(%color, from = *pos, dice, "overshoot, move forfeited");
            board.dice.dice_value = 0;
            turn::advance_turn_simple(state);
            return Ok(());
        }
        let square = remap(landing);
        if square != landing {
            debug!(%color, from = landing, to = square, "jump");
        }
        *pos = square;

        if square == FINAL_SQUARE {
            state.declare_winner(acting);
            info!(%color, "reached square 100");
        }
        turn::advance_turn_simple(state);
        Ok(())
    }

    /// Every roll is followed by a move; there is no dead roll.
    fn roll_dice(
        &self,
        state: &mut RoomState,
        acting: Side,
        dice: &dyn Dice,
    ) -> Result<u8, Rejection> {
        turn::roll_dice(state, acting, dice)
    }

    fn reset_game(&self, state: &mut RoomState) {
        state.clear_outcome();
        if let Some(board) = board_mut(state) {
            board.dice.clear();
            for pos in board.positions.values_mut() {
                *pos = 0;
            }
        }
        state.turn = turn::active_sides(state)
            .first()
            .copied()
            .unwrap_or(Side::Color(Color::Red));
    }

    fn has_terminal_condition(&self, state: &RoomState) -> bool {
        match &state.game {
            Game::SnakesLadders(board) => board.positions.values().any(|p| *p == FINAL_SQUARE),
            _ => false,
        }
    }
}
