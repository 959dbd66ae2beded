//! Two-player games where both sides see everything

pub mod chess;
pub mod connect4;
pub mod othello;
pub mod tictactoe;
