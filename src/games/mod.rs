//! # Game Implementations
//!
//! Every game implements the [`Game`](crate::game::Game) trait so the same search,
//! players and match loop drive all of them:
//! - **Perfect information**: Chess (standard and minichess variants), Tic-Tac-Toe, Connect Four, Reversi
//! - **Cards**: War, on top of a shared deck model

pub mod cards;
pub mod war;

// Perfect Information Games
pub mod perfect_info;
