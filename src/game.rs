use std::fmt::Debug;

use crate::error::MoveError;
use crate::moves::GameMove;
use crate::utils::{Player, Score};

/// Everything the search and the turn loop need from a game.
///
/// `Clone` must be a full deep copy: the search tries every hypothetical move on a
/// private clone and throws it away afterwards, there is no undo.
pub trait Game: Clone + Debug {
    fn name(&self) -> &str;

    /// Every legal move for `player` in this position. Empty means no legal move
    /// (a pass, or the end of the game), never an error.
    fn generate_moves(&self, player: Player) -> Vec<GameMove>;

    /// Play `mv` for `player`. On success the move counter goes up and the move is
    /// archived in the history; on failure the game is left exactly as it was.
    fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError>;

    /// Static evaluation from `player`'s point of view. `Score::MAX` exactly when
    /// `player` has won, `Score::MIN` exactly when they lost, otherwise a heuristic
    /// well inside that range.
    fn evaluate(&self, player: Player) -> Score;

    /// Whether the game is over with `player` to move
    fn game_ended(&self, player: Player) -> bool;

    /// Only meaningful once the game has ended. `None` is a draw.
    fn winner(&self) -> Option<Player>;

    /// Free-text reason for the result ("checkmate", "three in a row", ...)
    fn won_by(&self) -> Option<String>;

    /// Tie-break between equally scored moves, lower is preferred
    fn preferred_move(&self, _mv: &GameMove) -> i32 { 0 }

    /// Number of successfully applied moves
    fn move_count(&self) -> usize;

    /// Every applied move, oldest first
    fn history(&self) -> &[GameMove];
}
