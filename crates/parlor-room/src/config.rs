//! Hub configuration and the room lifecycle.

use std::time::Duration;

use parlor_rules::RoomState;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HubConfig
// ---------------------------------------------------------------------------

/// Timing and capacity settings shared by every room actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Pause before a bot rolls.
    pub bot_think_delay: Duration,

    /// Pause between a bot's roll and its move.
    pub bot_move_delay: Duration,

    /// How long a roll with no legal move stays on screen before the turn
    /// is passed.
    pub auto_pass_delay: Duration,

    /// Capacity of each room's command channel. Senders wait when full.
    pub channel_size: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            bot_think_delay: Duration::from_secs(1),
            bot_move_delay: Duration::from_secs(1),
            auto_pass_delay: Duration::from_secs(2),
            channel_size: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Where a room is in its life, derived from its state.
///
/// ```text
/// WaitingForPlayers → InProgress ⇄ Terminal
/// ```
///
/// - **WaitingForPlayers**: fewer than two playing seats are filled.
/// - **InProgress**: moves are being played.
/// - **Terminal**: someone won or the board is drawn. A reset goes back
///   to InProgress; new connections may still join and watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    WaitingForPlayers,
    InProgress,
    Terminal,
}

impl Lifecycle {
    pub fn of(state: &RoomState) -> Self {
        if state.game_over {
            return Self::Terminal;
        }
        let seated = state.players.values().filter(|p| p.side.is_playing()).count();
        if seated < 2 {
            Self::WaitingForPlayers
        } else {
            Self::InProgress
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Terminal => write!(f, "Terminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use parlor_protocol::PlayerKey;
    use parlor_rules::{Mode, RoomOptions, ruleset};

    use super::*;

    fn join(state: &mut RoomState, key: &str) {
        let nobody: HashSet<PlayerKey> = HashSet::new();
        ruleset(state.game_type()).assign_seat(state, &PlayerKey::new(key), key, &nobody);
    }

    #[test]
    fn test_lifecycle_waits_for_second_player() {
        let mut state = RoomState::new(&RoomOptions::tic_tac_toe());
        assert_eq!(Lifecycle::of(&state), Lifecycle::WaitingForPlayers);
        join(&mut state, "a");
        assert_eq!(Lifecycle::of(&state), Lifecycle::WaitingForPlayers);
        join(&mut state, "b");
        assert_eq!(Lifecycle::of(&state), Lifecycle::InProgress);
    }

    #[test]
    fn test_lifecycle_computer_room_starts_with_one_human() {
        let mut state = RoomState::new(&RoomOptions::ludo(Mode::Computer, 2));
        join(&mut state, "me");
        assert_eq!(Lifecycle::of(&state), Lifecycle::InProgress);
    }

    #[test]
    fn test_lifecycle_terminal_when_game_over() {
        let mut state = RoomState::new(&RoomOptions::tic_tac_toe());
        state.game_over = true;
        assert_eq!(Lifecycle::of(&state), Lifecycle::Terminal);
    }

    #[test]
    fn test_hub_config_default() {
        let config = HubConfig::default();
        assert_eq!(config.bot_think_delay, Duration::from_secs(1));
        assert_eq!(config.auto_pass_delay, Duration::from_secs(2));
        assert_eq!(config.channel_size, 64);
    }
}
