//! # Minimax
//!
//! Depth-limited minimax with fail-hard alpha-beta pruning, generic over any
//! [`Game`]. Every candidate is tried on its own clone of the game; nothing is
//! ever undone.
//!
//! Scores are always from the searching (maximising) player's point of view:
//! `max_value` evaluates for the player to move, `min_value` evaluates for the
//! player about to be minimised against. Heuristic scores are not weighted by
//! depth.

use log::{debug, trace, warn};

use crate::game::Game;
use crate::moves::GameMove;
use crate::utils::{Player, Score};

/// Counters for one call to [`Minimax::choose_move`]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Positions whose moves were expanded
    pub nodes: u64,
    /// Game clones taken to try a move
    pub clones: u64,
    /// Alpha or beta cutoffs
    pub cutoffs: u64,
    /// Static evaluations at leaves
    pub evaluations: u64,
}

#[derive(Debug, Clone)]
pub struct Minimax {
    plies: u32,
    stats: SearchStats,
}

impl Minimax {
    pub fn new(plies: u32) -> Self {
        Self { plies, stats: SearchStats::default() }
    }

    pub fn plies(&self) -> u32 { self.plies }

    /// Statistics of the most recent search
    pub fn stats(&self) -> SearchStats { self.stats }

    /// Best move for `player`, or `None` when there is no legal move (a pass)
    /// or none of the generated ones could be applied.
    /// The game is only read; the caller applies the result to the real game.
    pub fn choose_move<G: Game>(&mut self, player: Player, game: &G) -> Option<GameMove> {
        self.stats = SearchStats::default();
        let moves = game.generate_moves(player);
        if moves.len() <= 1 {
            // Nothing to search: pass, or the only move there is
            return moves.into_iter().next();
        }
        self.stats.nodes += 1;
        let depth = self.plies.saturating_sub(1);

        let mut best: Option<(GameMove, Score)> = None;
        for mv in moves {
            let Some(next) = self.try_move(game, player, &mv) else { continue };
            let best_score = best.as_ref().map_or(Score::MIN, |(_, s)| *s);
            // One below the best so an equal child comes back exact, not clamped to alpha
            let alpha = best_score.saturating_sub(1);
            let score = self.min_value(player.other(), &next, depth, alpha, Score::MAX);
            trace!("{} scores {}", mv, score);
            let better = match &best {
                None => true,
                Some((best_move, best_score)) => score > *best_score
                    || (score == *best_score && game.preferred_move(&mv) < game.preferred_move(best_move)),
            };
            if better {
                best = Some((mv, score));
            }
        }
        match &best {
            Some((mv, score)) => debug!("{} chose {} (score {}, {:?})", player, mv, score, self.stats),
            None => warn!("{} has moves but none of them applied", player),
        }
        best.map(|(mv, _)| mv)
    }

    /// `player` is the side being minimised against, i.e. the opponent of the searcher
    fn min_value<G: Game>(&mut self, player: Player, game: &G, depth: u32, alpha: Score, mut beta: Score) -> Score {
        if depth == 0 || game.game_ended(player) {
            self.stats.evaluations += 1;
            return game.evaluate(player.other());
        }
        let moves = game.generate_moves(player);
        if moves.is_empty() {
            // Not over but nothing to play: the turn passes
            return self.max_value(player.other(), game, depth - 1, alpha, beta);
        }
        self.stats.nodes += 1;
        for mv in moves {
            let Some(next) = self.try_move(game, player, &mv) else { continue };
            let score = self.max_value(player.other(), &next, depth - 1, alpha, beta);
            if score <= alpha {
                self.stats.cutoffs += 1;
                return alpha;
            }
            beta = beta.min(score);
        }
        beta
    }

    fn max_value<G: Game>(&mut self, player: Player, game: &G, depth: u32, mut alpha: Score, beta: Score) -> Score {
        if depth == 0 || game.game_ended(player) {
            self.stats.evaluations += 1;
            return game.evaluate(player);
        }
        let moves = game.generate_moves(player);
        if moves.is_empty() {
            return self.min_value(player.other(), game, depth - 1, alpha, beta);
        }
        self.stats.nodes += 1;
        for mv in moves {
            let Some(next) = self.try_move(game, player, &mv) else { continue };
            let score = self.min_value(player.other(), &next, depth - 1, alpha, beta);
            if score >= beta {
                self.stats.cutoffs += 1;
                return beta;
            }
            alpha = alpha.max(score);
        }
        alpha
    }

    /// Clone-and-apply. A generated move that the game refuses is a game bug; skip it.
    fn try_move<G: Game>(&mut self, game: &G, player: Player, mv: &GameMove) -> Option<G> {
        self.stats.clones += 1;
        let mut next = game.clone();
        match next.apply_move(player, mv) {
            Ok(()) => Some(next),
            Err(e) => {
                warn!("{} generated {} for {} but it failed to apply: {}", game.name(), mv, player, e);
                None
            }
        }
    }
}

/// One-shot search: best move for `player` looking `depth` plies ahead
pub fn choose_move<G: Game>(player: Player, game: &G, depth: u32) -> Option<GameMove> {
    Minimax::new(depth).choose_move(player, game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::error::MoveError;
    use crate::games::perfect_info::connect4::ConnectFour;
    use crate::games::perfect_info::tictactoe::TicTacToe;

    /// Plain minimax with no pruning, same evaluation conventions as the engine
    fn exhaustive<G: Game>(game: &G, to_move: Player, searcher: Player, depth: u32) -> Score {
        if depth == 0 || game.game_ended(to_move) {
            return game.evaluate(searcher);
        }
        let moves = game.generate_moves(to_move);
        if moves.is_empty() {
            return exhaustive(game, to_move.other(), searcher, depth - 1);
        }
        let scores = moves.iter().map(|mv| {
            let mut next = game.clone();
            next.apply_move(to_move, mv).unwrap();
            exhaustive(&next, to_move.other(), searcher, depth - 1)
        });
        if to_move == searcher { scores.max().unwrap() } else { scores.min().unwrap() }
    }

    fn root_scores<G: Game>(game: &G, player: Player, depth: u32) -> Vec<(GameMove, Score)> {
        game.generate_moves(player).into_iter().map(|mv| {
            let mut next = game.clone();
            next.apply_move(player, &mv).unwrap();
            let s = exhaustive(&next, player.other(), player, depth - 1);
            (mv, s)
        }).collect()
    }

    fn assert_choice_is_optimal<G: Game>(game: &G, player: Player, depth: u32) {
        let chosen = choose_move(player, game, depth).expect("a move");
        let scores = root_scores(game, player, depth);
        let best = scores.iter().map(|(_, s)| *s).max().unwrap();
        let chosen_score = scores.iter().find(|(m, _)| *m == chosen).map(|(_, s)| *s).unwrap();
        assert_eq!(chosen_score, best, "pruned search picked {} worth {} but best is {}", chosen, chosen_score, best);
    }

    /// Mini game for instrumenting the engine: players alternately take 1 or 2 from a
    /// pile, whoever takes the last one wins.
    #[derive(Debug, Clone)]
    struct Nim { pile: u32, history: Vec<GameMove>, last: Option<Player>, locked: bool }

    impl Game for Nim {
        fn name(&self) -> &str { "nim" }
        fn generate_moves(&self, _player: Player) -> Vec<GameMove> {
            (1..=self.pile.min(2)).map(|n| GameMove::place(Square::new(n as usize, 0))).collect()
        }
        fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
            if self.locked { return Err(MoveError::OutOfTurn { player }); }
            let take = mv.to().map(|s| s.x as u32).unwrap_or(0);
            if take == 0 || take > self.pile.min(2) { return Err(MoveError::Illegal { mv: mv.to_string() }); }
            self.pile -= take;
            self.last = Some(player);
            self.history.push(mv.clone());
            Ok(())
        }
        fn evaluate(&self, player: Player) -> Score {
            match (self.pile, self.last) {
                (0, Some(p)) if p == player => Score::MAX,
                (0, Some(_)) => Score::MIN,
                _ => 0,
            }
        }
        fn game_ended(&self, _player: Player) -> bool { self.pile == 0 }
        fn winner(&self) -> Option<Player> { if self.pile == 0 { self.last } else { None } }
        fn won_by(&self) -> Option<String> { None }
        fn move_count(&self) -> usize { self.history.len() }
        fn history(&self) -> &[GameMove] { &self.history }
    }

    fn nim(pile: u32) -> Nim { Nim { pile, history: vec![], last: None, locked: false } }

    #[test]
    fn no_moves_gives_no_move() {
        let mut engine = Minimax::new(5);
        assert_eq!(engine.choose_move(Player::P1, &nim(0)), None);
        assert_eq!(engine.stats().clones, 0);
    }

    #[test]
    fn moves_that_never_apply_give_no_move() {
        let game = Nim { locked: true, ..nim(5) };
        let mut engine = Minimax::new(3);
        assert_eq!(engine.choose_move(Player::P1, &game), None);
        assert_eq!(engine.stats().clones, 2);
    }

    #[test]
    fn forced_move_skips_search() {
        let mut engine = Minimax::new(9);
        let mv = engine.choose_move(Player::P1, &nim(1)).unwrap();
        assert_eq!(mv.to(), Some(Square::new(1, 0)));
        assert_eq!(engine.stats(), SearchStats::default());
    }

    #[test]
    fn nim_finds_the_winning_take() {
        // From 4, taking 1 leaves the opponent on a multiple of 3
        let mv = choose_move(Player::P1, &nim(4), 6).unwrap();
        assert_eq!(mv.to(), Some(Square::new(1, 0)));
        let mv = choose_move(Player::P2, &nim(5), 6).unwrap();
        assert_eq!(mv.to(), Some(Square::new(2, 0)));
    }

    #[test]
    fn search_leaves_the_game_untouched() {
        let mut game = TicTacToe::new();
        game.apply_move(Player::P1, &GameMove::place(Square::new(0, 0))).unwrap();
        let before = game.clone();
        let _ = choose_move(Player::P2, &game, 4);
        assert_eq!(game, before);
    }

    #[test]
    fn pruning_agrees_with_exhaustive_search_on_tictactoe() {
        let mut game = TicTacToe::new();
        game.apply_move(Player::P1, &GameMove::place(Square::new(1, 1))).unwrap();
        game.apply_move(Player::P2, &GameMove::place(Square::new(0, 0))).unwrap();
        for depth in 1..=5 {
            assert_choice_is_optimal(&game, Player::P1, depth);
        }
    }

    #[test]
    fn pruning_agrees_with_exhaustive_search_on_connect_four() {
        let mut game = ConnectFour::new();
        for (i, col) in [3usize, 3, 2, 4].iter().enumerate() {
            let p = if i % 2 == 0 { Player::P1 } else { Player::P2 };
            game.apply_move(p, &GameMove::place(Square::new(*col, 0))).unwrap();
        }
        for depth in 1..=4 {
            assert_choice_is_optimal(&game, Player::P1, depth);
        }
    }

    #[test]
    fn takes_an_immediate_win() {
        // X X .
        // O O .
        // . . .
        let mut game = TicTacToe::new();
        for (p, x, y) in [(Player::P1, 0, 2), (Player::P2, 0, 1), (Player::P1, 1, 2), (Player::P2, 1, 1)] {
            game.apply_move(p, &GameMove::place(Square::new(x, y))).unwrap();
        }
        let mv = choose_move(Player::P1, &game, 3).unwrap();
        assert_eq!(mv.to(), Some(Square::new(2, 2)));
    }
}
