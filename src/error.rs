//! Error types for the engine
//!
//! Ordinary illegal input is always a recoverable `MoveError`. Broken internal
//! invariants (a king that must exist but doesn't) panic instead.

use thiserror::Error;

use crate::board::Square;
use crate::moves::Command;
use crate::utils::{Player, MAX_PLIES, MIN_PLIES};

/// Why `Game::apply_move` rejected a move. The game is unchanged when one of these comes back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveError {
    #[error("square {square} is off the board")]
    OffBoard { square: Square },

    #[error("the move is missing its {which} square")]
    MissingSquare { which: &'static str },

    #[error("{player} has no piece on {square}")]
    NoPiece { player: Player, square: Square },

    #[error("square {square} is already occupied")]
    Occupied { square: Square },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("{mv} is not a legal move")]
    Illegal { mv: String },

    #[error("{mv} would leave the king in check")]
    LeavesKingInCheck { mv: String },

    #[error("it is not {player}'s turn")]
    OutOfTurn { player: Player },

    #[error("'{argument}' is not a promotion piece (expected Q, R, B or N)")]
    BadPromotion { argument: String },

    #[error("{command} is not a command this game understands")]
    UnsupportedCommand { command: Command },

    #[error("{player} has no cards to show")]
    NoCards { player: Player },

    #[error("game already over")]
    GameOver,
}

/// Text that could not be turned into a `GameMove`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("empty move")]
    Empty,

    #[error("'{text}' is not a square (expected something like e4)")]
    BadSquare { text: String },

    #[error("unrecognised move '{text}'")]
    Unrecognised { text: String },

    #[error("'{text}' is not a card (expected something like QH or 10S)")]
    BadCard { text: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("plies must be between {MIN_PLIES} and {MAX_PLIES}, got {plies}")]
    PliesOutOfRange { plies: u32 },

    #[error("unknown chess variant '{name}'")]
    UnknownVariant { name: String },
}

/// Failures of the turn loop driving a whole match
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("{player} played an illegal move {mv}: {source}")]
    IllegalMove {
        player: Player,
        mv: String,
        #[source]
        source: MoveError,
    },

    #[error("match did not finish within {turns} turns")]
    TurnLimit { turns: usize },

    #[error("failed to read a move: {0}")]
    Input(#[from] std::io::Error),
}
