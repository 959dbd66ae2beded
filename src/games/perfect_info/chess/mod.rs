//! # Chess
//!
//! One parameterised engine for standard chess and the minichess variants.
//!
//! - Board: a `Grid<Option<Piece>>`, player one (white) on row 0 moving up.
//! - Moves: `GameMove::board(from, to)`; promotions carry the new piece letter as the
//!   argument (`Q`, `R`, `B`, `N`), and a promotion with no argument becomes a queen.
//! - Legality: pseudo-legal moves per piece (see `movegen`), then each candidate is tried on
//!   a clone of the whole game and dropped if it leaves the mover's king attacked. The trial
//!   application is flagged as a probe. It is validated like any other move except for the
//!   king safety test, so the check doesn't recurse.
//! - Only the side to move has moves; the other side's list is empty.
//! - Castling is a two-square king move. Applying it also brings the rook across in the same
//!   call, so the opponent can never see a half-castled position.
//! - Not implemented: en passant, repetition, the fifty-move rule.
//! - The game is over when the side to move has no legal move (checkmate or stalemate, both just
//!   "ended") or somebody resigned. `winner()` tells them apart.

mod movegen;
pub mod piece;
pub mod variant;

use std::fmt::{Display, Formatter};

use log::trace;

use crate::board::{Grid, Square};
use crate::error::MoveError;
use crate::game::Game;
use crate::moves::{Command, GameMove};
use crate::utils::*;
pub use piece::{Piece, PieceKind, PROMOTION_CHOICES};
pub use variant::ChessVariant;

/// Pawn advance bonus per rank, in centipawns
const PAWN_ADVANCE: Score = 10;

/// Resolves which piece a pawn becomes, e.g. by asking a human
pub trait PromotionChooser {
    fn choose_promotion(&mut self, player: Player) -> PieceKind;
}

/// Always picks the same piece
pub struct FixedPromotion(pub PieceKind);

impl PromotionChooser for FixedPromotion {
    fn choose_promotion(&mut self, _player: Player) -> PieceKind { self.0 }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChessGame {
    variant: ChessVariant,
    board: Grid<Option<Piece>>,
    to_move: Player,
    castling_allowed: [bool; 2],
    history: Vec<GameMove>,
    /// Results that can't be read off the board: resignation, move limit
    outcome: Option<Outcome>,
}

impl Default for ChessGame {
    fn default() -> Self { Self::new(variant::STANDARD) }
}

impl ChessGame {
    pub fn new(variant: ChessVariant) -> Self {
        Self::from_rows(variant, variant.layout, Player::P1)
    }

    pub fn standard() -> Self { Self::default() }

    /// Set up an arbitrary position. `rows` start at player one's home rank and
    /// override the variant's dimensions. Pawns off their starting rank count as
    /// having moved; everything else starts unmoved.
    pub fn from_rows(variant: ChessVariant, rows: &[&str], to_move: Player) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let variant = ChessVariant { width, height, ..variant };
        let mut board = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if let Some(mut piece) = Piece::from_token(c) {
                    if piece.kind == PieceKind::Pawn {
                        piece.moved = y != Self::pawn_home_rank(height, piece.owner);
                    }
                    board.set(Square::new(x, y), Some(piece));
                }
            }
        }
        Self {
            variant,
            board,
            to_move,
            castling_allowed: [variant.castling; 2],
            history: vec![],
            outcome: None,
        }
    }

    fn pawn_home_rank(height: usize, owner: Player) -> usize {
        match owner { Player::P1 => 1, Player::P2 => height.saturating_sub(2) }
    }

    pub fn variant(&self) -> &ChessVariant { &self.variant }

    pub fn to_move(&self) -> Player { self.to_move }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get(sq).copied().flatten()
    }

    pub fn castling_allowed(&self, player: Player) -> bool {
        self.castling_allowed[player.index()]
    }

    /// Rank a pawn of `player` promotes on
    fn last_rank(&self, player: Player) -> usize {
        match player { Player::P1 => self.board.height() - 1, Player::P2 => 0 }
    }

    /// Whether `mv` takes a pawn to its last rank
    pub fn is_promotion(&self, mv: &GameMove) -> bool {
        match (mv.from().and_then(|f| self.piece_at(f)), mv.to()) {
            (Some(p), Some(to)) => p.kind == PieceKind::Pawn && to.y == self.last_rank(p.owner),
            _ => false,
        }
    }

    /// Fill in the promotion piece for a move that needs one and doesn't say
    pub fn resolve_promotion(&self, mv: GameMove, chooser: &mut dyn PromotionChooser) -> GameMove {
        if !self.is_promotion(&mv) || mv.argument().is_some() { return mv; }
        let kind = chooser.choose_promotion(self.to_move);
        mv.with_argument(kind.letter().to_string())
    }

    /// Result decided by the position or stored earlier
    fn result(&self) -> Option<Outcome> {
        if let Some(outcome) = &self.outcome { return Some(outcome.clone()); }
        if self.has_any_legal_move(self.to_move) { return None; }
        Some(if self.in_check(self.to_move) {
            Outcome::win(self.to_move.other(), "checkmate")
        } else {
            Outcome::draw("stalemate")
        })
    }

    /// Material plus a little credit for advanced pawns, from `player`'s side
    fn material(&self, player: Player) -> Score {
        let mut score = 0;
        for (sq, cell) in self.board.iter() {
            let Some(piece) = cell else { continue };
            let mut value = piece.value();
            if piece.kind == PieceKind::Pawn {
                let advanced = match piece.owner {
                    Player::P1 => sq.y.saturating_sub(1),
                    Player::P2 => (self.board.height() - 2).saturating_sub(sq.y),
                };
                value += advanced as Score * PAWN_ADVANCE;
            }
            if piece.owner == player { score += value } else { score -= value }
        }
        clamp_heuristic(score)
    }

    /// Validate a board move. Returns the promotion piece to use.
    /// Probes skip only the king safety test.
    fn check_move(&self, player: Player, from: Square, to: Square, mv: &GameMove) -> Result<PieceKind, MoveError> {
        if player != self.to_move { return Err(MoveError::OutOfTurn { player }); }
        match self.piece_at(from) {
            Some(p) if p.owner == player => {}
            _ => return Err(MoveError::NoPiece { player, square: from }),
        }
        if matches!(self.piece_at(to), Some(p) if p.owner == player) {
            return Err(MoveError::Occupied { square: to });
        }
        let promotion = self.promotion_piece(mv)?;
        if !self.pseudo_moves_from(from).iter().any(|m| m.to() == Some(to)) {
            return Err(MoveError::Illegal { mv: mv.to_string() });
        }
        if !mv.is_probe() && !self.leaves_king_safe(player, mv) {
            return Err(MoveError::LeavesKingInCheck { mv: mv.to_string() });
        }
        Ok(promotion)
    }

    fn promotion_piece(&self, mv: &GameMove) -> Result<PieceKind, MoveError> {
        match mv.argument() {
            Some(arg) if self.is_promotion(mv) => {
                PieceKind::promotion(arg).ok_or_else(|| MoveError::BadPromotion { argument: arg.to_string() })
            }
            _ => Ok(PieceKind::Queen),
        }
    }

    /// Move the piece, relocating the rook too when the king castles. No legality checks.
    fn perform(&mut self, player: Player, from: Square, to: Square, promotion: PieceKind) {
        let Some(mut piece) = self.board.set(from, None) else { return };
        piece.moved = true;
        if piece.kind == PieceKind::King {
            self.castling_allowed[player.index()] = false;
            let dx = to.x as i32 - from.x as i32;
            if dx.abs() == 2 {
                self.castle_rook(from, dx.signum());
            }
        }
        if piece.kind == PieceKind::Pawn && to.y == self.last_rank(piece.owner) {
            piece.kind = promotion;
        }
        self.board.set(to, Some(piece));
    }

    /// The rook is the first piece beyond the king's start; it lands on the square the king crossed
    fn castle_rook(&mut self, king_from: Square, dir: i32) {
        let mut cur = king_from;
        while let Some(next) = self.board.step(cur, dir, 0) {
            cur = next;
            if self.piece_at(cur).is_none() { continue; }
            let Some(landing) = king_from.offset(dir, 0) else { return };
            if let Some(mut rook) = self.board.set(cur, None) {
                rook.moved = true;
                trace!("castling rook {} -> {}", cur, landing);
                self.board.set(landing, Some(rook));
            }
            return;
        }
    }

    fn settle_move_limit(&mut self) {
        let Some(limit) = self.variant.move_limit else { return };
        if self.history.len() >= limit && self.has_any_legal_move(self.to_move) {
            self.outcome = Some(Outcome::draw("move limit"));
        }
    }
}

impl Game for ChessGame {
    fn name(&self) -> &str { self.variant.name }

    fn generate_moves(&self, player: Player) -> Vec<GameMove> {
        if self.outcome.is_some() || player != self.to_move { return vec![]; }
        self.board.iter()
            .filter(|(_, cell)| matches!(cell, Some(p) if p.owner == player))
            .flat_map(|(sq, _)| self.legal_moves_from(sq))
            .collect()
    }

    fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
        if self.outcome.is_some() { return Err(MoveError::GameOver); }
        match mv.command_kind() {
            Command::Move => {}
            Command::Resign => {
                self.outcome = Some(Outcome::win(player.other(), "resignation"));
                self.history.push(mv.clone().as_succeeded());
                return Ok(());
            }
            command => return Err(MoveError::UnsupportedCommand { command }),
        }
        let from = mv.from().ok_or(MoveError::MissingSquare { which: "origin" })?;
        let to = mv.to().ok_or(MoveError::MissingSquare { which: "destination" })?;
        for sq in [from, to] {
            if !self.board.contains(sq) { return Err(MoveError::OffBoard { square: sq }); }
        }

        let promotion = self.check_move(player, from, to, mv)?;

        let archived = if self.is_promotion(mv) && mv.argument().is_none() {
            mv.clone().with_argument(promotion.letter().to_string())
        } else {
            mv.clone()
        };
        self.perform(player, from, to, promotion);
        self.to_move = player.other();
        self.history.push(archived.as_succeeded());
        if !mv.is_probe() {
            trace!("{} played {}", player, mv);
            self.settle_move_limit();
        }
        Ok(())
    }

    fn evaluate(&self, player: Player) -> Score {
        match self.result() {
            Some(outcome) => outcome.score_for(player),
            None => self.material(player),
        }
    }

    fn game_ended(&self, player: Player) -> bool {
        self.outcome.is_some() || !self.has_any_legal_move(player)
    }

    fn winner(&self) -> Option<Player> { self.result().and_then(|o| o.winner) }

    fn won_by(&self) -> Option<String> { self.result().map(|o| o.won_by) }

    /// Chebyshev distance of the destination from the centre, in half squares
    fn preferred_move(&self, mv: &GameMove) -> i32 {
        let Some(to) = mv.to() else { return i32::MAX };
        let dx = (2 * to.x as i32 - (self.board.width() as i32 - 1)).abs();
        let dy = (2 * to.y as i32 - (self.board.height() as i32 - 1)).abs();
        dx.max(dy)
    }

    fn move_count(&self) -> usize { self.history.len() }

    fn history(&self) -> &[GameMove] { &self.history }
}

impl Display for ChessGame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.board.height()).rev() {
            write!(f, "{:>2} ", y + 1)?;
            for x in 0..self.board.width() {
                let c = self.piece_at(Square::new(x, y)).map(|p| p.token()).unwrap_or('.');
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..self.board.width() {
            write!(f, "{} ", (b'a' + x as u8) as char)?;
        }
        writeln!(f)
    }
}
