//! Rejection reasons for illegal intents.

/// Why a move, roll or reset was refused.
///
/// The `Display` text goes to the requesting client verbatim, so it is
/// written for players rather than operators. A rejection never leaves a
/// partial change behind: the state is exactly what it was before.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,

    #[error("not your turn")]
    NotYourTurn,

    #[error("you do not have a seat in this game")]
    NotSeated,

    #[error("that seat is played by the computer")]
    BotSeat,

    #[error("you cannot play for that seat")]
    NotYourSeat,

    #[error("cell {0} is not on the board")]
    CellOutOfRange(usize),

    #[error("cell {0} is already taken")]
    CellOccupied(usize),

    /// Roll requested while a move is awaited.
    #[error("you have already rolled")]
    AlreadyRolled,

    /// Move requested before a roll.
    #[error("roll the dice first")]
    MustRoll,

    /// The roll had no legal move and the turn is about to pass.
    #[error("no legal move, passing the turn")]
    TurnPassing,

    #[error("this game has no dice")]
    NoDice,

    #[error("piece {0} does not exist")]
    NoSuchPiece(usize),

    #[error("a piece can only leave base on a six")]
    NeedSix,

    #[error("that piece is already home")]
    PieceHome,

    #[error("that move overshoots home")]
    Overshoot,
}
