use std::fmt::{Display, Formatter};

// ---------- Tune-ables ---------- //
pub const MIN_PLIES: u32 = 1;  // Shallowest search the AI will accept
pub const MAX_PLIES: u32 = 9;  // Deepest search; beyond this even tic-tac-toe gets slow with chess-style clones
pub const DEFAULT_PLIES: u32 = 4;
pub const MAX_MATCH_TURNS: usize = 2_000;  // Safety cap on the turn loop
pub const MAX_WAR_TURNS: usize = 500;   // Rounds of War before the bigger stack is declared the winner

// ---------- Basic types (renamed for pretty) ---------- //
pub type Score = i32;
/// Returned by `evaluate` only when the player has definitively won
pub const WIN_SCORE: Score = Score::MAX;
/// Returned by `evaluate` only when the player has definitively lost
pub const LOSS_SCORE: Score = Score::MIN;
/// Heuristic scores must stay strictly inside this bound so they never look like a proven result
pub const HEURISTIC_BOUND: Score = 1_000_000;

/// We only look at two player games
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Player { P1, P2 }

impl Player {
    #[inline] pub fn other(self) -> Player {
        match self { Player::P1 => Player::P2, Player::P2 => Player::P1 }
    }
    #[inline] pub fn index(self) -> usize {
        match self { Player::P1 => 0, Player::P2 => 1 }
    }
    /// Player number as the original two-seat games count them (1 or 2)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// How a finished game was decided. `winner == None` is a draw.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Outcome {
    pub winner: Option<Player>,
    pub won_by: String,
}

impl Outcome {
    pub fn win(winner: Player, won_by: impl Into<String>) -> Self {
        Self { winner: Some(winner), won_by: won_by.into() }
    }
    pub fn draw(won_by: impl Into<String>) -> Self {
        Self { winner: None, won_by: won_by.into() }
    }

    /// Score of a settled game from `player`'s point of view
    pub fn score_for(&self, player: Player) -> Score {
        match self.winner {
            Some(p) if p == player => WIN_SCORE,
            Some(_) => LOSS_SCORE,
            None => 0,
        }
    }
}

/// Keep a heuristic safely away from the proven win/loss values
#[inline]
pub fn clamp_heuristic(score: Score) -> Score {
    score.clamp(-(HEURISTIC_BOUND - 1), HEURISTIC_BOUND - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_player_flips() {
        assert_eq!(Player::P1.other(), Player::P2);
        assert_eq!(Player::P2.other(), Player::P1);
        assert_eq!(Player::P2.number(), 2);
    }

    #[test]
    fn outcome_scores_are_extreme() {
        let o = Outcome::win(Player::P1, "resignation");
        assert_eq!(o.score_for(Player::P1), Score::MAX);
        assert_eq!(o.score_for(Player::P2), Score::MIN);
        assert_eq!(Outcome::draw("stalemate").score_for(Player::P1), 0);
    }

    #[test]
    fn heuristic_clamp_stays_inside_bound() {
        assert!(clamp_heuristic(Score::MAX) < WIN_SCORE);
        assert!(clamp_heuristic(Score::MIN) > LOSS_SCORE);
        assert_eq!(clamp_heuristic(42), 42);
    }
}
