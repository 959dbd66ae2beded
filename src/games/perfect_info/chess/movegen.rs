//! Per-piece move generation and attack detection

use crate::board::Square;
use crate::moves::{Command, GameMove};
use crate::utils::Player;

use super::piece::{PieceKind, PROMOTION_CHOICES};
use super::ChessGame;

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_DIRS: [(i32, i32); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i32, i32); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];

/// Minimum distance between king and rook for castling
const CASTLING_MIN_ROOK_DISTANCE: usize = 3;

fn forward(player: Player) -> i32 {
    match player { Player::P1 => 1, Player::P2 => -1 }
}

impl ChessGame {
    /// Moves the piece on `from` could make ignoring the safety of its own king
    pub(super) fn pseudo_moves_from(&self, from: Square) -> Vec<GameMove> {
        let Some(piece) = self.piece_at(from) else { return vec![] };
        let template = GameMove::command(Command::Move).with_from(from);
        let mut moves = Vec::new();
        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(from, piece.owner, piece.moved, &template, &mut moves),
            PieceKind::Knight => self.jump_moves(from, piece.owner, &KNIGHT_JUMPS, &template, &mut moves),
            PieceKind::Bishop => self.slide_moves(from, piece.owner, &BISHOP_DIRS, &template, &mut moves),
            PieceKind::Rook => self.slide_moves(from, piece.owner, &ROOK_DIRS, &template, &mut moves),
            PieceKind::Queen => self.slide_moves(from, piece.owner, &KING_DIRS, &template, &mut moves),
            PieceKind::King => {
                self.jump_moves(from, piece.owner, &KING_DIRS, &template, &mut moves);
                if !piece.moved {
                    self.castling_moves(from, piece.owner, &template, &mut moves);
                }
            }
        }
        moves
    }

    fn pawn_moves(&self, from: Square, owner: Player, moved: bool, template: &GameMove, moves: &mut Vec<GameMove>) {
        let dy = forward(owner);
        let push = |to: Square, moves: &mut Vec<GameMove>| {
            if to.y == self.last_rank(owner) {
                for kind in PROMOTION_CHOICES {
                    moves.push(template.clone().with_to(to).with_argument(kind.letter().to_string()));
                }
            } else {
                moves.push(template.clone().with_to(to));
            }
        };

        if let Some(one) = self.board.step(from, 0, dy) {
            if self.piece_at(one).is_none() {
                push(one, moves);
                if self.variant.double_pawn_move && !moved {
                    if let Some(two) = self.board.step(one, 0, dy) {
                        if self.piece_at(two).is_none() { push(two, moves); }
                    }
                }
            }
        }
        for dx in [-1, 1] {
            let Some(to) = self.board.step(from, dx, dy) else { continue };
            if matches!(self.piece_at(to), Some(p) if p.owner != owner) {
                push(to, moves);
            }
        }
    }

    fn jump_moves(&self, from: Square, owner: Player, jumps: &[(i32, i32)], template: &GameMove, moves: &mut Vec<GameMove>) {
        for &(dx, dy) in jumps {
            let Some(to) = self.board.step(from, dx, dy) else { continue };
            if !matches!(self.piece_at(to), Some(p) if p.owner == owner) {
                moves.push(template.clone().with_to(to));
            }
        }
    }

    /// Rays in `dirs` until blocked; a capture ends the ray
    fn slide_moves(&self, from: Square, owner: Player, dirs: &[(i32, i32)], template: &GameMove, moves: &mut Vec<GameMove>) {
        for &(dx, dy) in dirs {
            let mut cur = from;
            while let Some(next) = self.board.step(cur, dx, dy) {
                match self.piece_at(next) {
                    Some(p) if p.owner == owner => break,
                    Some(_) => {
                        moves.push(template.clone().with_to(next));
                        break;
                    }
                    None => moves.push(template.clone().with_to(next)),
                }
                cur = next;
            }
        }
    }

    /// King two squares towards an unmoved rook, which must be the first piece along the rank.
    ///
    /// Beyond the empty path between king and rook, this deliberately adds the usual chess
    /// restriction: no castling out of check or across an attacked square. The landing square
    /// is left to the ordinary king safety test.
    fn castling_moves(&self, from: Square, owner: Player, template: &GameMove, moves: &mut Vec<GameMove>) {
        if !self.variant.castling || !self.castling_allowed(owner) { return; }
        if self.square_attacked(from, owner.other()) { return; }
        for dir in [-1, 1] {
            let mut cur = from;
            let mut distance = 0;
            let rook = loop {
                let Some(next) = self.board.step(cur, dir, 0) else { break None };
                distance += 1;
                if let Some(p) = self.piece_at(next) { break Some(p) }
                cur = next;
            };
            let Some(rook) = rook else { continue };
            if rook.kind != PieceKind::Rook || rook.owner != owner || rook.moved || distance < CASTLING_MIN_ROOK_DISTANCE {
                continue;
            }
            let (Some(crossed), Some(landing)) = (from.offset(dir, 0), from.offset(2 * dir, 0)) else { continue };
            if self.square_attacked(crossed, owner.other()) { continue; }
            moves.push(template.clone().with_to(landing));
        }
    }

    /// Whether any piece of `by` attacks `target`. Pawns only attack diagonally,
    /// so this also works for empty squares.
    pub fn square_attacked(&self, target: Square, by: Player) -> bool {
        for (dx, dy) in KNIGHT_JUMPS {
            if self.holds(self.board.step(target, dx, dy), by, &[PieceKind::Knight]) { return true; }
        }
        for (dx, dy) in KING_DIRS {
            if self.holds(self.board.step(target, dx, dy), by, &[PieceKind::King]) { return true; }
        }
        // A pawn of `by` attacks from one rank behind the target, from its own point of view
        let back = -forward(by);
        for dx in [-1, 1] {
            if self.holds(self.board.step(target, dx, back), by, &[PieceKind::Pawn]) { return true; }
        }
        for (dirs, sliders) in [
            (ROOK_DIRS, [PieceKind::Rook, PieceKind::Queen]),
            (BISHOP_DIRS, [PieceKind::Bishop, PieceKind::Queen]),
        ] {
            for (dx, dy) in dirs {
                let mut cur = target;
                while let Some(next) = self.board.step(cur, dx, dy) {
                    if self.piece_at(next).is_some() {
                        if self.holds(Some(next), by, &sliders) { return true; }
                        break;
                    }
                    cur = next;
                }
            }
        }
        false
    }

    fn holds(&self, sq: Option<Square>, owner: Player, kinds: &[PieceKind]) -> bool {
        matches!(sq.and_then(|s| self.piece_at(s)), Some(p) if p.owner == owner && kinds.contains(&p.kind))
    }

    pub fn find_king(&self, player: Player) -> Option<Square> {
        self.board.iter()
            .find(|(_, cell)| matches!(cell, Some(p) if p.owner == player && p.kind == PieceKind::King))
            .map(|(sq, _)| sq)
    }

    /// Panics if `player` has no king, which no legal sequence of moves can cause
    pub fn in_check(&self, player: Player) -> bool {
        let Some(king) = self.find_king(player) else {
            panic!("{} has no king on the board:\n{}", player, self)
        };
        self.square_attacked(king, player.other())
    }

    /// Try `mv` on a clone and see whether `player`'s king survives it
    pub(super) fn leaves_king_safe(&self, player: Player, mv: &GameMove) -> bool {
        let mut trial = self.clone();
        let probe = mv.clone().as_probe();
        if crate::game::Game::apply_move(&mut trial, player, &probe).is_err() { return false; }
        !trial.in_check(player)
    }

    /// Empty unless the piece belongs to the side to move
    pub fn legal_moves_from(&self, from: Square) -> Vec<GameMove> {
        let Some(piece) = self.piece_at(from) else { return vec![] };
        self.pseudo_moves_from(from)
            .into_iter()
            .filter(|mv| self.leaves_king_safe(piece.owner, mv))
            .collect()
    }

    /// Stops at the first legal move found. Always false for the side not on move.
    pub fn has_any_legal_move(&self, player: Player) -> bool {
        if self.outcome.is_some() || player != self.to_move { return false; }
        self.board.iter()
            .filter(|(_, cell)| matches!(cell, Some(p) if p.owner == player))
            .any(|(sq, _)| self.pseudo_moves_from(sq).iter().any(|mv| self.leaves_king_safe(player, mv)))
    }
}
