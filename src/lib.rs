//! Two-player turn-based games and a minimax player for all of them.
//!
//! Games implement [`game::Game`]; [`minimax::Minimax`] searches any of them by
//! cloning the game for every candidate move. [`self_play::play_match`] runs a
//! whole game between two [`players::Controller`]s.

pub mod board;
pub mod error;
pub mod game;
pub mod games;
pub mod minimax;
pub mod moves;
pub mod players;
pub mod self_play;
pub mod utils;
