//! Board geometry: the Ludo track and the Snakes & Ladders table.
//!
//! Ludo positions are stored per color in local coordinates, so two pieces
//! only meet when their *global* cells agree. A standard board has a
//! 52-cell shared track split into four 13-cell segments; an extended
//! board doubles it to 104 cells and eight segments. Each color enters the
//! track at the start of its own segment.

use parlor_protocol::Color;

use crate::state::LudoBoard;

/// Local position of a piece still in base.
pub const BASE: i8 = -1;
/// First local position past the shared track (start of the home stretch).
pub const HOME_STRETCH: i8 = 52;
/// Local position of a finished piece.
pub const HOME: i8 = 57;
/// Cells per color segment.
pub const SEGMENT: usize = 13;
/// Offsets within every segment that protect a piece from capture.
const SAFE_OFFSETS: [usize; 2] = [0, 8];

/// The shared track of one Ludo table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    cells: usize,
}

impl Track {
    pub const STANDARD: Track = Track { cells: 4 * SEGMENT };
    pub const EXTENDED: Track = Track { cells: 8 * SEGMENT };

    /// Geometry for a board: extended when the table seats more than four
    /// colors or any extended color holds pieces.
    pub fn for_board(board: &LudoBoard) -> Self {
        if board.player_count > 4 || board.pieces.keys().any(|c| c.is_extended()) {
            Self::EXTENDED
        } else {
            Self::STANDARD
        }
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Global cell of a piece at `local`, or `None` when the piece is not
    /// on the shared track (in base, home stretch, or home).
    pub fn global(&self, color: Color, local: i8) -> Option<usize> {
        if !(0..HOME_STRETCH).contains(&local) {
            return None;
        }
        Some((local as usize + color.index() * SEGMENT) % self.cells)
    }

    pub fn is_safe(&self, global: usize) -> bool {
        SAFE_OFFSETS.contains(&(global % SEGMENT))
    }
}

/// Where a piece at `from` ends up with `dice`, if the move is legal.
///
/// Base pieces leave only on a six and land on 0; finished pieces never
/// move; nothing may pass [`HOME`].
pub fn piece_target(from: i8, dice: u8) -> Option<i8> {
    if from == BASE {
        return (dice == 6).then_some(0);
    }
    if from >= HOME {
        return None;
    }
    let target = from + dice as i8;
    (target <= HOME).then_some(target)
}

// ---------------------------------------------------------------------------
// Snakes & Ladders
// ---------------------------------------------------------------------------

/// Last square of the Snakes & Ladders board.
pub const FINAL_SQUARE: u8 = 100;

pub const LADDERS: [(u8, u8); 8] = [
    (4, 14),
    (9, 31),
    (20, 38),
    (28, 84),
    (40, 59),
    (51, 67),
    (63, 81),
    (71, 91),
];

pub const SNAKES: [(u8, u8); 8] = [
    (17, 7),
    (54, 34),
    (62, 19),
    (64, 60),
    (87, 24),
    (93, 73),
    (95, 75),
    (99, 78),
];

/// Applies a ladder or snake to a landing square. Applied once per landing;
/// no destination is itself the foot of a ladder or head of a snake.
pub fn remap(square: u8) -> u8 {
    LADDERS
        .iter()
        .chain(SNAKES.iter())
        .find(|(from, _)| *from == square)
        .map_or(square, |(_, to)| *to)
}
