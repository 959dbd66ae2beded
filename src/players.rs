//! Who decides a move: the minimax AI, a random mover, or a person at the terminal

use std::fmt::Display;
use std::io::{BufRead, ErrorKind, Write};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::error::{ConfigError, MatchError};
use crate::game::Game;
use crate::games::perfect_info::chess::{ChessGame, PieceKind, PromotionChooser};
use crate::minimax::{Minimax, SearchStats};
use crate::moves::GameMove;
use crate::utils::*;

/// Picks moves for one side of a match. `Ok(None)` means pass.
pub trait Controller<G: Game> {
    fn choose(&mut self, player: Player, game: &G) -> Result<Option<GameMove>, MatchError>;
}

/// Validated search depth
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SearchConfig {
    plies: u32,
}

impl SearchConfig {
    pub fn new(plies: u32) -> Result<Self, ConfigError> {
        if !(MIN_PLIES..=MAX_PLIES).contains(&plies) {
            return Err(ConfigError::PliesOutOfRange { plies });
        }
        Ok(Self { plies })
    }

    pub fn plies(&self) -> u32 { self.plies }
}

impl Default for SearchConfig {
    fn default() -> Self { Self { plies: DEFAULT_PLIES } }
}

pub struct AiPlayer {
    search: Minimax,
}

impl AiPlayer {
    pub fn new(config: SearchConfig) -> Self {
        Self { search: Minimax::new(config.plies()) }
    }

    /// Statistics of the last search
    pub fn stats(&self) -> SearchStats { self.search.stats() }
}

impl<G: Game> Controller<G> for AiPlayer {
    fn choose(&mut self, player: Player, game: &G) -> Result<Option<GameMove>, MatchError> {
        Ok(self.search.choose_move(player, game))
    }
}

pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    /// Seeded for reproducible games, otherwise seeded from the OS
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl<G: Game> Controller<G> for RandomPlayer {
    fn choose(&mut self, player: Player, game: &G) -> Result<Option<GameMove>, MatchError> {
        let moves = game.generate_moves(player);
        let mv = moves.choose(&mut self.rng).cloned();
        debug!("{} picked {:?} at random from {} moves", player, mv.as_ref().map(|m| m.to_string()), moves.len());
        Ok(mv)
    }
}

/// Reads moves as text, one per line. `?` lists the legal moves.
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next trimmed line, or `None` at end of input
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 { return Ok(None); }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until the text parses and the game accepts it on a scratch copy.
    /// `finish` gets a chance to complete the move (e.g. a promotion piece) first.
    fn read_move<G, F>(&mut self, player: Player, game: &G, mut finish: F) -> Result<Option<GameMove>, MatchError>
    where
        G: Game + Display,
        F: FnMut(&mut Self, &G, GameMove) -> GameMove,
    {
        let moves = game.generate_moves(player);
        if moves.is_empty() {
            writeln!(self.output, "{} has no move and passes", player)?;
            return Ok(None);
        }
        write!(self.output, "{}", game)?;
        loop {
            write!(self.output, "{} to move ('?' lists moves): ", player)?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "input closed").into());
            };
            if line == "?" {
                let listed: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                writeln!(self.output, "{}", listed.join(" "))?;
                continue;
            }
            let mv = match line.parse::<GameMove>() {
                Ok(mv) => finish(self, game, mv),
                Err(e) => {
                    writeln!(self.output, "Invalid move: {}", e)?;
                    continue;
                }
            };
            let mut trial = game.clone();
            match trial.apply_move(player, &mv) {
                Ok(()) => return Ok(Some(mv)),
                Err(e) => writeln!(self.output, "Invalid move: {}", e)?,
            }
        }
    }
}

impl<G: Game + Display, R: BufRead, W: Write> Controller<G> for HumanPlayer<R, W> {
    fn choose(&mut self, player: Player, game: &G) -> Result<Option<GameMove>, MatchError> {
        self.read_move(player, game, |_, _, mv| mv)
    }
}

/// Asks which piece to promote to; falls back to a queen if input runs out
impl<R: BufRead, W: Write> PromotionChooser for HumanPlayer<R, W> {
    fn choose_promotion(&mut self, player: Player) -> PieceKind {
        loop {
            if write!(self.output, "{} promotes to (Q, R, B, N): ", player).and_then(|_| self.output.flush()).is_err() {
                return PieceKind::Queen;
            }
            match self.read_line() {
                Ok(Some(line)) => match PieceKind::promotion(&line) {
                    Some(kind) => return kind,
                    None => {
                        let _ = writeln!(self.output, "Invalid choice");
                    }
                },
                Ok(None) | Err(_) => {
                    warn!("no promotion choice from {}, promoting to a queen", player);
                    return PieceKind::Queen;
                }
            }
        }
    }
}

/// A human chess player: asks for the promotion piece when a move leaves it out
pub struct ChessHuman<R, W>(pub HumanPlayer<R, W>);

impl<R: BufRead, W: Write> Controller<ChessGame> for ChessHuman<R, W> {
    fn choose(&mut self, player: Player, game: &ChessGame) -> Result<Option<GameMove>, MatchError> {
        self.0.read_move(player, game, |human, game, mv| game.resolve_promotion(mv, human))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::games::cards::Card;
    use crate::games::perfect_info::chess::variant::STANDARD;
    use crate::games::perfect_info::tictactoe::TicTacToe;
    use crate::games::war::War;
    use std::io::Cursor;

    fn human(input: &str) -> HumanPlayer<Cursor<Vec<u8>>, Vec<u8>> {
        HumanPlayer::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript<R>(h: &HumanPlayer<R, Vec<u8>>) -> String {
        String::from_utf8_lossy(&h.output).to_string()
    }

    #[test]
    fn plies_are_validated() {
        assert_eq!(SearchConfig::new(0), Err(ConfigError::PliesOutOfRange { plies: 0 }));
        assert_eq!(SearchConfig::new(10), Err(ConfigError::PliesOutOfRange { plies: 10 }));
        assert_eq!(SearchConfig::new(4).unwrap().plies(), 4);
        assert_eq!(SearchConfig::default().plies(), DEFAULT_PLIES);
    }

    #[test]
    fn ai_takes_the_win() {
        let mut g = TicTacToe::new();
        for (p, sq) in [(Player::P1, (0, 0)), (Player::P2, (0, 1)), (Player::P1, (1, 0)), (Player::P2, (1, 1))] {
            g.apply_move(p, &GameMove::place(Square::new(sq.0, sq.1))).unwrap();
        }
        let mut ai = AiPlayer::new(SearchConfig::new(3).unwrap());
        let mv = ai.choose(Player::P1, &g).unwrap().unwrap();
        assert_eq!(mv.to(), Some(Square::new(2, 0)));
        assert!(ai.stats().clones > 0);
    }

    #[test]
    fn seeded_random_players_agree() {
        let g = TicTacToe::new();
        let mut a = RandomPlayer::new(Some(3));
        let mut b = RandomPlayer::new(Some(3));
        for _ in 0..5 {
            assert_eq!(a.choose(Player::P1, &g).unwrap(), b.choose(Player::P1, &g).unwrap());
        }
    }

    #[test]
    fn human_is_asked_again_after_bad_input() {
        let g = TicTacToe::new();
        let mut h = human("zz9\n?\nb2\n");
        let mv = h.choose(Player::P1, &g).unwrap().unwrap();
        assert_eq!(mv.to(), Some(Square::new(1, 1)));
        let out = transcript(&h);
        assert_eq!(out.matches("Invalid move").count(), 1);
        assert!(out.contains("a1 "));
    }

    #[test]
    fn human_cannot_play_an_occupied_square() {
        let mut g = TicTacToe::new();
        g.apply_move(Player::P1, &GameMove::place(Square::new(1, 1))).unwrap();
        let mut h = human("b2\na1\n");
        let mv = h.choose(Player::P2, &g).unwrap().unwrap();
        assert_eq!(mv.to(), Some(Square::new(0, 0)));
        assert!(transcript(&h).contains("Invalid move"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let g = TicTacToe::new();
        let mut h = human("");
        assert!(matches!(h.choose(Player::P1, &g), Err(MatchError::Input(_))));
    }

    #[test]
    fn human_passes_without_moves() {
        let card = |s: &str| s.parse::<Card>().unwrap();
        let g = War::from_hands(vec![card("AH")], vec![card("2C")]);
        let mut h = human("");
        assert_eq!(h.choose(Player::P2, &g).unwrap(), None);
        assert!(transcript(&h).contains("passes"));
    }

    #[test]
    fn chess_human_is_asked_for_the_promotion_piece() {
        let rows = ["K.......", "........", "........", "........", "........", "........", "P.......", ".......k"];
        let g = ChessGame::from_rows(STANDARD, &rows, Player::P1);
        let mut h = ChessHuman(human("a7a8\nx\nn\n"));
        let mv = h.choose(Player::P1, &g).unwrap().unwrap();
        assert_eq!(mv.argument(), Some("N"));
        assert!(transcript(&h.0).contains("Invalid choice"));
    }

    #[test]
    fn promotion_falls_back_to_queen_at_end_of_input() {
        let mut h = human("");
        assert_eq!(h.choose_promotion(Player::P1), PieceKind::Queen);
    }
}
