//! Reversi (Othello) — perfect-information, deterministic, alternating-move game
//!
//! Rules reference (concise):
//! - Played on 8x8 grid. Initial 4 discs in center: P1 (Black) at d5,e4; P2 (White) at d4,e5.
//! - On a turn, the player places one of their discs on an empty square such that in at least
//!   one direction (8-neighborhood) it flanks one or more opponent discs with a disc of their
//!   own at the far end. All such flanked opponent discs flip to the current player's color.
//! - If a player has no legal placement they pass. If neither player has one, the game ends
//!   and the side with more discs wins.
//!
//! Implementation notes:
//! - `generate_moves()` returns every legal placement and is empty when the player must pass.
//!   An empty list here does not end the game; `game_ended()` only turns true once both sides
//!   are stuck.
//! - `apply_move()` also accepts an explicit `nomove` from a player who has to pass.

use std::fmt::{Display, Formatter};

use crate::board::{Grid, Square};
use crate::error::MoveError;
use crate::game::Game;
use crate::moves::{Command, GameMove};
use crate::utils::*;

const SIZE: usize = 8;
const DIRS: [(i32, i32); 8] = [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1)];
const CORNER_BONUS: Score = 25;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Reversi {
	board: Grid<Option<Player>>,
	history: Vec<GameMove>,
	outcome: Option<Outcome>,
}

impl Default for Reversi {
	fn default() -> Self { Self::new() }
}

impl Reversi {
	pub fn new() -> Self {
		let mut board = Grid::new(SIZE, SIZE);
		board.set(Square::new(3, 3), Some(Player::P2));
		board.set(Square::new(4, 4), Some(Player::P2));
		board.set(Square::new(3, 4), Some(Player::P1));
		board.set(Square::new(4, 3), Some(Player::P1));
		Self { board, history: vec![], outcome: None }
	}

	pub fn cell(&self, sq: Square) -> Option<Player> {
		self.board.get(sq).copied().flatten()
	}

	pub fn discs(&self, player: Player) -> usize {
		self.board.iter().filter(|(_, c)| **c == Some(player)).count()
	}

	/// Opponent discs that placing at `sq` would flip; empty means the placement is illegal
	fn flips_for(&self, sq: Square, p: Player) -> Vec<Square> {
		if self.cell(sq).is_some() { return vec![]; }
		let mut flips = Vec::new();
		for (dx, dy) in DIRS {
			let mut ray = Vec::new();
			let mut cur = sq;
			while let Some(next) = self.board.step(cur, dx, dy) {
				match self.cell(next) {
					Some(c) if c == p.other() => ray.push(next),
					Some(_) => {
						flips.extend(ray);
						break;
					}
					None => break,
				}
				cur = next;
			}
		}
		flips
	}

	fn any_legal_move(&self, p: Player) -> bool {
		self.board.squares().any(|sq| !self.flips_for(sq, p).is_empty())
	}

	fn settle_if_stuck(&mut self) {
		if self.any_legal_move(Player::P1) || self.any_legal_move(Player::P2) { return; }
		let (b, w) = (self.discs(Player::P1), self.discs(Player::P2));
		self.outcome = Some(if b > w {
			Outcome::win(Player::P1, format!("{} discs to {}", b, w))
		} else if w > b {
			Outcome::win(Player::P2, format!("{} discs to {}", w, b))
		} else {
			Outcome::draw("equal discs")
		});
	}

	fn is_corner(sq: Square) -> bool {
		(sq.x == 0 || sq.x == SIZE - 1) && (sq.y == 0 || sq.y == SIZE - 1)
	}
}

impl Game for Reversi {
	fn name(&self) -> &str { "reversi" }

	fn generate_moves(&self, player: Player) -> Vec<GameMove> {
		if self.outcome.is_some() { return vec![]; }
		self.board.squares()
			.filter(|&sq| !self.flips_for(sq, player).is_empty())
			.map(GameMove::place)
			.collect()
	}

	fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
		if self.outcome.is_some() { return Err(MoveError::GameOver); }
		match mv.command_kind() {
			Command::Resign => {
				self.outcome = Some(Outcome::win(player.other(), "resignation"));
			}
			Command::NoMove => {
				// Passing is only allowed when there is nothing to place
				if self.any_legal_move(player) { return Err(MoveError::Illegal { mv: mv.to_string() }); }
			}
			Command::Move => {
				let to = mv.to().ok_or(MoveError::MissingSquare { which: "destination" })?;
				if !self.board.contains(to) { return Err(MoveError::OffBoard { square: to }); }
				if self.cell(to).is_some() { return Err(MoveError::Occupied { square: to }); }
				let flips = self.flips_for(to, player);
				if flips.is_empty() { return Err(MoveError::Illegal { mv: mv.to_string() }); }
				self.board.set(to, Some(player));
				for sq in flips { self.board.set(sq, Some(player)); }
				self.settle_if_stuck();
			}
			command => return Err(MoveError::UnsupportedCommand { command }),
		}
		self.history.push(mv.clone().as_succeeded());
		Ok(())
	}

	fn evaluate(&self, player: Player) -> Score {
		if let Some(outcome) = &self.outcome { return outcome.score_for(player); }
		let mut score = (self.discs(player) as Score - self.discs(player.other()) as Score) * 10;
		for (sq, c) in self.board.iter() {
			if !Self::is_corner(sq) { continue; }
			match c {
				Some(p) if *p == player => score += CORNER_BONUS,
				Some(_) => score -= CORNER_BONUS,
				None => {}
			}
		}
		score
	}

	fn game_ended(&self, _player: Player) -> bool { self.outcome.is_some() }

	fn winner(&self) -> Option<Player> { self.outcome.as_ref().and_then(|o| o.winner) }

	fn won_by(&self) -> Option<String> { self.outcome.as_ref().map(|o| o.won_by.clone()) }

	/// Corners first
	fn preferred_move(&self, mv: &GameMove) -> i32 {
		match mv.to() {
			Some(sq) if Self::is_corner(sq) => 0,
			Some(_) => 1,
			None => 2,
		}
	}

	fn move_count(&self) -> usize { self.history.len() }

	fn history(&self) -> &[GameMove] { &self.history }
}

impl Display for Reversi {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for y in (0..SIZE).rev() {
			write!(f, "{} ", y + 1)?;
			for x in 0..SIZE {
				let c = match self.cell(Square::new(x, y)) { Some(Player::P1) => 'B', Some(Player::P2) => 'W', None => '.' };
				write!(f, "{} ", c)?;
			}
			writeln!(f)?;
		}
		writeln!(f, "  a b c d e f g h")
	}
}
