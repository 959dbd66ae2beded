use std::fmt::{Display, Formatter};

use crate::board::{Grid, Square};
use crate::error::MoveError;
use crate::game::Game;
use crate::moves::{Command, GameMove};
use crate::utils::*;

const SIZE: usize = 3;
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TicTacToe {
    board: Grid<Option<Player>>,
    history: Vec<GameMove>,
    outcome: Option<Outcome>,
}

impl Default for TicTacToe {
    fn default() -> Self { Self::new() }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self { board: Grid::new(SIZE, SIZE), history: vec![], outcome: None }
    }

    pub fn cell(&self, sq: Square) -> Option<Player> {
        self.board.get(sq).copied().flatten()
    }

    /// P1 (X) moves whenever both sides have the same number of marks
    fn to_move(&self) -> Player {
        let (x, o) = self.board.iter().fold((0, 0), |(x, o), (_, c)| match c {
            Some(Player::P1) => (x + 1, o),
            Some(Player::P2) => (x, o + 1),
            None => (x, o),
        });
        if x == o { Player::P1 } else { Player::P2 }
    }

    /// Longest run of `player`'s marks through `sq`
    fn run_through(&self, sq: Square, player: Player) -> usize {
        DIRECTIONS.iter().map(|&(dx, dy)| {
            let mut run = 1;
            for sign in [1, -1] {
                let mut cur = sq;
                while let Some(next) = self.board.step(cur, dx * sign, dy * sign) {
                    if self.cell(next) != Some(player) { break; }
                    run += 1;
                    cur = next;
                }
            }
            run
        }).max().unwrap_or(1)
    }

    /// Every row, column and diagonal
    fn lines() -> Vec<[Square; SIZE]> {
        let mut lines = vec![];
        for i in 0..SIZE {
            lines.push([Square::new(0, i), Square::new(1, i), Square::new(2, i)]);
            lines.push([Square::new(i, 0), Square::new(i, 1), Square::new(i, 2)]);
        }
        lines.push([Square::new(0, 0), Square::new(1, 1), Square::new(2, 2)]);
        lines.push([Square::new(0, 2), Square::new(1, 1), Square::new(2, 0)]);
        lines
    }

    /// Lines still open to one side, weighted by how full they are
    fn heuristic(&self, player: Player) -> Score {
        Self::lines().iter().map(|line| {
            let mine = line.iter().filter(|s| self.cell(**s) == Some(player)).count() as Score;
            let theirs = line.iter().filter(|s| self.cell(**s) == Some(player.other())).count() as Score;
            match (mine, theirs) {
                (m, 0) => m * m,
                (0, t) => -(t * t),
                _ => 0,
            }
        }).sum::<Score>() * 10
    }
}

impl Game for TicTacToe {
    fn name(&self) -> &str { "tic-tac-toe" }

    fn generate_moves(&self, _player: Player) -> Vec<GameMove> {
        if self.outcome.is_some() { return vec![]; }
        self.board.iter().filter(|(_, c)| c.is_none()).map(|(sq, _)| GameMove::place(sq)).collect()
    }

    fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
        if self.outcome.is_some() { return Err(MoveError::GameOver); }
        if mv.is(Command::Resign) {
            self.outcome = Some(Outcome::win(player.other(), "resignation"));
            self.history.push(mv.clone().as_succeeded());
            return Ok(());
        }
        if !mv.is_board_move() { return Err(MoveError::UnsupportedCommand { command: mv.command_kind() }); }
        let to = mv.to().ok_or(MoveError::MissingSquare { which: "destination" })?;
        if !self.board.contains(to) { return Err(MoveError::OffBoard { square: to }); }
        if self.cell(to).is_some() { return Err(MoveError::Occupied { square: to }); }
        if self.to_move() != player { return Err(MoveError::OutOfTurn { player }); }

        self.board.set(to, Some(player));
        self.history.push(mv.clone().as_succeeded());
        if self.run_through(to, player) >= SIZE {
            self.outcome = Some(Outcome::win(player, "three in a row"));
        } else if self.board.iter().all(|(_, c)| c.is_some()) {
            self.outcome = Some(Outcome::draw("board full"));
        }
        Ok(())
    }

    fn evaluate(&self, player: Player) -> Score {
        match &self.outcome {
            Some(outcome) => outcome.score_for(player),
            None => self.heuristic(player),
        }
    }

    fn game_ended(&self, _player: Player) -> bool { self.outcome.is_some() }

    fn winner(&self) -> Option<Player> { self.outcome.as_ref().and_then(|o| o.winner) }

    fn won_by(&self) -> Option<String> { self.outcome.as_ref().map(|o| o.won_by.clone()) }

    /// Manhattan distance from the centre square
    fn preferred_move(&self, mv: &GameMove) -> i32 {
        mv.to().map(|s| (s.x as i32 - 1).abs() + (s.y as i32 - 1).abs()).unwrap_or(i32::MAX)
    }

    fn move_count(&self) -> usize { self.history.len() }

    fn history(&self) -> &[GameMove] { &self.history }
}

impl Display for TicTacToe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in (0..SIZE).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..SIZE {
                let c = match self.cell(Square::new(x, y)) { Some(Player::P1) => 'X', Some(Player::P2) => 'O', None => '.' };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c")
    }
}
