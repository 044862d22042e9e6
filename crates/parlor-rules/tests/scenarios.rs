//! End-to-end game scenarios driven through the public rules API.

use std::collections::HashSet;

use parlor_protocol::{Color, PlayerKey, Side};
use parlor_rules::board::{BASE, HOME};
use parlor_rules::{
    Game, Mode, Outcome, Phase, Pieces, Rejection, RoomOptions, RoomState, ScriptedDice, bot,
    ruleset, turn,
};

const RED: Side = Side::Color(Color::Red);
const GREEN: Side = Side::Color(Color::Green);

fn nobody() -> HashSet<PlayerKey> {
    HashSet::new()
}

fn join(state: &mut RoomState, key: &str, name: &str) -> Side {
    ruleset(state.game_type()).assign_seat(state, &PlayerKey::new(key), name, &nobody())
}

fn ludo_positions(state: &RoomState, color: Color) -> [i8; 4] {
    match &state.game {
        Game::Ludo(board) => board.pieces[&color].positions,
        other => panic!("not a ludo room: {other:?}"),
    }
}

// =========================================================================
// Scenario A: Tic-Tac-Toe top row
// =========================================================================

#[test]
fn test_tic_tac_toe_top_row_wins_for_x() {
    let mut state = RoomState::new(&RoomOptions::tic_tac_toe());
    assert_eq!(join(&mut state, "p1", "Ada"), Side::X);
    assert_eq!(join(&mut state, "p2", "Bo"), Side::O);
    let rules = ruleset(state.game_type());

    for (cell, side) in [(0, Side::X), (4, Side::O), (1, Side::X), (5, Side::O), (2, Side::X)] {
        rules.apply_move(&mut state, cell, side).unwrap();
    }

    assert_eq!(state.winner, Some(Outcome::Winner(Side::X)));
    assert!(state.game_over);
    assert_eq!(state.players[&PlayerKey::new("p1")].score, 1);
    assert_eq!(state.players[&PlayerKey::new("p2")].score, 0);
    assert_eq!(state.winner_name.as_deref(), Some("Ada"));

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["winner"], "X");
    assert_eq!(json["game_over"], true);
}

#[test]
fn test_tic_tac_toe_rejected_moves_never_change_state() {
    let mut state = RoomState::new(&RoomOptions::tic_tac_toe());
    join(&mut state, "p1", "Ada");
    join(&mut state, "p2", "Bo");
    let rules = ruleset(state.game_type());

    let attempts = [(0, Side::O), (9, Side::X), (0, Side::Spectator)];
    for (cell, side) in attempts {
        let before = state.clone();
        assert!(rules.apply_move(&mut state, cell, side).is_err());
        assert_eq!(state, before);
    }
    rules.apply_move(&mut state, 0, Side::X).unwrap();
    let before = state.clone();
    assert_eq!(
        rules.apply_move(&mut state, 0, Side::O),
        Err(Rejection::CellOccupied(0))
    );
    assert_eq!(state, before);
}

#[test]
fn test_tic_tac_toe_reset_after_win_alternates_and_keeps_score() {
    let mut state = RoomState::new(&RoomOptions::tic_tac_toe());
    join(&mut state, "p1", "Ada");
    join(&mut state, "p2", "Bo");
    let rules = ruleset(state.game_type());
    for (cell, side) in [(0, Side::X), (4, Side::O), (1, Side::X), (5, Side::O), (2, Side::X)] {
        rules.apply_move(&mut state, cell, side).unwrap();
    }
    rules.reset_game(&mut state);
    assert!(!state.game_over);
    assert_eq!(state.winner, None);
    assert_eq!(state.turn, Side::O);
    assert_eq!(state.players[&PlayerKey::new("p1")].score, 1);
    rules.apply_move(&mut state, 4, Side::O).unwrap();
}

// =========================================================================
// Scenario B: leaving base needs a six
// =========================================================================

#[test]
fn test_ludo_base_piece_needs_six_to_leave() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Online, 4));
    assert_eq!(join(&mut state, "red", "Rae"), RED);
    let rules = ruleset(state.game_type());
    let dice = ScriptedDice::new([4, 6]);

    assert_eq!(rules.roll_dice(&mut state, RED, &dice), Ok(4));
    assert_eq!(state.phase(), Some(Phase::AutoPass));
    assert_eq!(rules.apply_move(&mut state, 0, RED), Err(Rejection::TurnPassing));

    // Alone at the table, the pass comes straight back to red.
    turn::pass_turn(&mut state);
    assert_eq!(state.turn, RED);
    assert_eq!(state.phase(), Some(Phase::Roll));

    assert_eq!(rules.roll_dice(&mut state, RED, &dice), Ok(6));
    assert_eq!(state.phase(), Some(Phase::Move));
    rules.apply_move(&mut state, 0, RED).unwrap();
    assert_eq!(ludo_positions(&state, Color::Red), [0, BASE, BASE, BASE]);
    assert_eq!(state.phase(), Some(Phase::Roll));
    assert_eq!(state.turn, RED);
}

#[test]
fn test_ludo_third_six_passes_the_turn() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Online, 2));
    join(&mut state, "red", "Rae");
    join(&mut state, "green", "Gil");
    let rules = ruleset(state.game_type());
    let dice = ScriptedDice::new([6, 6, 6]);

    for piece in 0..3 {
        rules.roll_dice(&mut state, RED, &dice).unwrap();
        rules.apply_move(&mut state, piece, RED).unwrap();
        let sixes = state.dice().unwrap().consecutive_sixes;
        assert!(sixes <= 2);
    }
    assert_eq!(state.turn, GREEN);
    assert_eq!(ludo_positions(&state, Color::Red), [0, 0, 0, BASE]);
}

#[test]
fn test_ludo_positions_only_grow_until_captured() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Online, 2));
    join(&mut state, "red", "Rae");
    join(&mut state, "green", "Gil");
    let rules = ruleset(state.game_type());
    let dice = ScriptedDice::new([6, 5, 3, 4, 2, 6, 1, 5, 6, 3, 2, 4]).with_fallback(3);

    let mut last = ludo_positions(&state, Color::Red);
    for _ in 0..40 {
        let side = state.turn;
        rules.roll_dice(&mut state, side, &dice).unwrap();
        match state.phase() {
            Some(Phase::AutoPass) => turn::pass_turn(&mut state),
            _ => {
                let Game::Ludo(board) = &state.game else { unreachable!() };
                let piece = bot::choose_move(board, side.color().unwrap()).unwrap();
                rules.apply_move(&mut state, piece, side).unwrap();
            }
        }
        let now = ludo_positions(&state, Color::Red);
        for (before, after) in last.iter().zip(now.iter()) {
            assert!(*after >= *before || *after == BASE, "{before} -> {after}");
            assert!(*after <= HOME);
        }
        last = now;
        if state.game_over {
            break;
        }
    }
}

// =========================================================================
// Scenario C: ladder from 4
// =========================================================================

#[test]
fn test_snakes_ladder_from_four_lands_on_fourteen() {
    let mut state = RoomState::new(&RoomOptions::snakes_ladders());
    join(&mut state, "red", "Rae");
    join(&mut state, "green", "Gil");
    if let Game::SnakesLadders(board) = &mut state.game {
        board.positions.insert(Color::Red, 1);
    }
    let rules = ruleset(state.game_type());
    let dice = ScriptedDice::new([3]);
    rules.roll_dice(&mut state, RED, &dice).unwrap();
    rules.apply_move(&mut state, 0, RED).unwrap();

    let Game::SnakesLadders(board) = &state.game else { unreachable!() };
    assert_eq!(board.positions[&Color::Red], 14);
    assert_eq!(state.turn, GREEN);
}

// =========================================================================
// Scenario D: capture on a shared cell
// =========================================================================

#[test]
fn test_ludo_second_arrival_captures_first() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Online, 2));
    join(&mut state, "red", "Rae");
    join(&mut state, "green", "Gil");
    if let Game::Ludo(board) = &mut state.game {
        board.pieces.insert(Color::Red, Pieces { positions: [21, BASE, BASE, BASE], finished: 0 });
        board.pieces.insert(Color::Green, Pieces { positions: [9, BASE, BASE, BASE], finished: 0 });
    }
    let rules = ruleset(state.game_type());
    // Red 21 -> 23 (global 23), then green 9 -> 10 (global 23).
    let dice = ScriptedDice::new([2, 1]);

    rules.roll_dice(&mut state, RED, &dice).unwrap();
    rules.apply_move(&mut state, 0, RED).unwrap();
    assert_eq!(state.turn, GREEN);

    rules.roll_dice(&mut state, GREEN, &dice).unwrap();
    rules.apply_move(&mut state, 0, GREEN).unwrap();

    assert_eq!(ludo_positions(&state, Color::Red), [BASE; 4]);
    assert_eq!(ludo_positions(&state, Color::Green), [10, BASE, BASE, BASE]);
    assert_eq!(state.turn, RED);
}

#[test]
fn test_ludo_eight_player_capture_uses_long_track() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Online, 8));
    for (k, _) in Color::ALL.iter().enumerate() {
        join(&mut state, &format!("p{k}"), "p");
    }
    if let Game::Ludo(board) = &mut state.game {
        // Orange local 10 is global 62 on the 104-cell track, where red's
        // local 10 is global 10: no capture.
        board.pieces.insert(Color::Red, Pieces { positions: [10, BASE, BASE, BASE], finished: 0 });
        board.pieces.insert(Color::Orange, Pieces { positions: [7, BASE, BASE, BASE], finished: 0 });
    }
    let orange = Side::Color(Color::Orange);
    state.turn = orange;
    let rules = ruleset(state.game_type());
    let dice = ScriptedDice::new([3]);
    rules.roll_dice(&mut state, orange, &dice).unwrap();
    rules.apply_move(&mut state, 0, orange).unwrap();

    assert_eq!(ludo_positions(&state, Color::Red), [10, BASE, BASE, BASE]);
    assert_eq!(ludo_positions(&state, Color::Orange), [10, BASE, BASE, BASE]);
    assert_eq!(state.turn, Side::Color(Color::Purple));
}

// =========================================================================
// Bots
// =========================================================================

#[test]
fn test_bot_turn_rolls_then_moves() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Computer, 2));
    assert_eq!(join(&mut state, "me", "Me"), RED);
    state.turn = GREEN;
    let dice = ScriptedDice::new([6]);

    assert_eq!(turn::follow_up(&state), Some(turn::FollowUp::BotRoll(GREEN)));
    assert_eq!(bot::bot_roll(&mut state, GREEN, &dice), Ok(6));
    assert_eq!(turn::follow_up(&state), Some(turn::FollowUp::BotMove(GREEN)));
    assert_eq!(bot::bot_move(&mut state, GREEN), Ok(0));
    assert_eq!(ludo_positions(&state, Color::Green), [0, BASE, BASE, BASE]);

    // The six keeps the turn with the bot.
    assert_eq!(turn::follow_up(&state), Some(turn::FollowUp::BotRoll(GREEN)));
}

#[test]
fn test_bot_step_is_noop_when_turn_moved_on() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Computer, 2));
    join(&mut state, "me", "Me");
    let dice = ScriptedDice::new([6]);
    let before = state.clone();

    assert_eq!(bot::bot_roll(&mut state, GREEN, &dice), Err(Rejection::NotYourTurn));
    assert_eq!(bot::bot_move(&mut state, GREEN), Err(Rejection::NotYourTurn));
    assert_eq!(state, before);
    assert_eq!(dice.remaining(), 1);
}

#[test]
fn test_bot_move_without_legal_piece_is_refused() {
    let mut state = RoomState::new(&RoomOptions::ludo(Mode::Computer, 2));
    join(&mut state, "me", "Me");
    state.turn = GREEN;
    if let Some(dice) = state.dice_mut() {
        dice.phase = Phase::Move;
        dice.dice_value = 4;
    }
    let before = state.clone();

    assert_eq!(bot::bot_move(&mut state, GREEN), Err(Rejection::TurnPassing));
    assert_eq!(state, before);
}
