use std::fmt::{Display, Formatter};

use crate::board::Square;
use crate::error::MoveError;
use crate::game::Game;
use crate::moves::{Command, GameMove};
use crate::utils::{Outcome, Player, Score};
/*
Each column uses 7 bits: six playable rows plus an always-empty sentinel on top
so shifted lines can't wrap from one column into the next.
+----------------------+
| 6 13 20 27 34 41 48  |  <- sentinel row
| 5 12 19 26 33 40 47  |
| 4 11 18 25 32 39 46  |
| 3 10 17 24 31 38 45  |
| 2  9 16 23 30 37 44  |
| 1  8 15 22 29 36 43  |
| 0  7 14 21 28 35 42  |
+----------------------+
*/

pub const WIDTH: usize = 7;
pub const HEIGHT: usize = 6;
const COLUMN_BITS: usize = HEIGHT + 1;

/// Number of four-in-a-row lines through each cell, indexed [row][col]
const HEURISTIC_MAP: [[Score; WIDTH]; HEIGHT] = [
    [3, 4, 5, 7, 5, 4, 3],
    [4, 6, 8, 10, 8, 6, 4],
    [5, 8, 11, 13, 11, 8, 5],
    [5, 8, 11, 13, 11, 8, 5],
    [4, 6, 8, 10, 8, 6, 4],
    [3, 4, 5, 7, 5, 4, 3],
];

#[inline]
const fn bit(col: usize, row: usize) -> u64 {
    1 << (col * COLUMN_BITS + row)
}

/// Vertical, horizontal and both diagonals
const fn won(bb: u64) -> bool {
    let shifts = [1, COLUMN_BITS, COLUMN_BITS - 1, COLUMN_BITS + 1];
    let mut i = 0;
    while i < shifts.len() {
        let pairs = bb & (bb >> shifts[i]);
        if pairs & (pairs >> (2 * shifts[i])) != 0 { return true; }
        i += 1;
    }
    false
}

#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct ConnectFour {
    bitboards: [u64; 2],
    height: [u8; WIDTH],
    history: Vec<GameMove>,
    outcome: Option<Outcome>,
}

impl Default for ConnectFour {
    fn default() -> Self { Self::new() }
}

impl ConnectFour {
    pub fn new() -> Self {
        Self { bitboards: [0; 2], height: [0; WIDTH], history: vec![], outcome: None }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Player> {
        let b = bit(col, row);
        if self.bitboards[0] & b != 0 {
            Some(Player::P1)
        } else if self.bitboards[1] & b != 0 {
            Some(Player::P2)
        } else {
            None
        }
    }

    fn to_move(&self) -> Player {
        let placed = self.bitboards[0].count_ones() + self.bitboards[1].count_ones();
        if placed % 2 == 0 { Player::P1 } else { Player::P2 }
    }

    fn full(&self) -> bool {
        self.height.iter().all(|&h| h as usize == HEIGHT)
    }

    fn heuristic(&self, player: Player) -> Score {
        let mut score = 0;
        for (row, weights) in HEURISTIC_MAP.iter().enumerate() {
            for (col, weight) in weights.iter().enumerate() {
                match self.cell(col, row) {
                    Some(p) if p == player => score += weight,
                    Some(_) => score -= weight,
                    None => {}
                }
            }
        }
        score
    }
}

impl Game for ConnectFour {
    fn name(&self) -> &str { "connect four" }

    fn generate_moves(&self, _player: Player) -> Vec<GameMove> {
        if self.outcome.is_some() { return vec![]; }
        (0..WIDTH)
            .filter(|&col| (self.height[col] as usize) < HEIGHT)
            .map(|col| GameMove::place(Square::new(col, self.height[col] as usize)))
            .collect()
    }

    /// Only the column (`to.x`) matters; the row is wherever the disc lands
    fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
        if self.outcome.is_some() { return Err(MoveError::GameOver); }
        if mv.is(Command::Resign) {
            self.outcome = Some(Outcome::win(player.other(), "resignation"));
            self.history.push(mv.clone().as_succeeded());
            return Ok(());
        }
        if !mv.is_board_move() { return Err(MoveError::UnsupportedCommand { command: mv.command_kind() }); }
        let to = mv.to().ok_or(MoveError::MissingSquare { which: "column" })?;
        let col = to.x;
        if col >= WIDTH { return Err(MoveError::OffBoard { square: to }); }
        let row = self.height[col] as usize;
        if row >= HEIGHT { return Err(MoveError::ColumnFull { column: col }); }
        if self.to_move() != player { return Err(MoveError::OutOfTurn { player }); }

        self.bitboards[player.index()] |= bit(col, row);
        self.height[col] += 1;
        self.history.push(mv.clone().with_to(Square::new(col, row)).as_succeeded());
        if won(self.bitboards[player.index()]) {
            self.outcome = Some(Outcome::win(player, "four in a row"));
        } else if self.full() {
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

    /// Distance from the centre column
    fn preferred_move(&self, mv: &GameMove) -> i32 {
        mv.to().map(|s| (s.x as i32 - (WIDTH / 2) as i32).abs()).unwrap_or(i32::MAX)
    }

    fn move_count(&self) -> usize { self.history.len() }

    fn history(&self) -> &[GameMove] { &self.history }
}

impl Display for ConnectFour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in (0..HEIGHT).rev() {
            for col in 0..WIDTH {
                let c = match self.cell(col, row) { Some(Player::P1) => 'X', Some(Player::P2) => 'O', None => '.' };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "a b c d e f g")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_in(game: &mut ConnectFour, player: Player, col: usize) {
        game.apply_move(player, &GameMove::place(Square::new(col, 0))).unwrap();
    }

    #[test]
    fn seven_opening_moves() {
        let g = ConnectFour::new();
        let moves = g.generate_moves(Player::P1);
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| m.to().unwrap().y == 0));
    }

    #[test]
    fn discs_stack_and_row_is_ignored() {
        let mut g = ConnectFour::new();
        drop_in(&mut g, Player::P1, 3);
        // The row in the move is ignored: the disc lands on top of the first one
        g.apply_move(Player::P2, &GameMove::place(Square::new(3, 5))).unwrap();
        assert_eq!(g.cell(3, 0), Some(Player::P1));
        assert_eq!(g.cell(3, 1), Some(Player::P2));
        assert_eq!(g.history()[1].to(), Some(Square::new(3, 1)));
    }

    #[test]
    fn full_column_is_rejected() {
        let mut g = ConnectFour::new();
        let mut p = Player::P1;
        for _ in 0..HEIGHT {
            drop_in(&mut g, p, 0);
            p = p.other();
        }
        let before = g.clone();
        assert_eq!(g.apply_move(p, &GameMove::place(Square::new(0, 0))), Err(MoveError::ColumnFull { column: 0 }));
        assert_eq!(g, before);
        assert_eq!(g.generate_moves(p).len(), 6);
    }

    #[test]
    fn horizontal_win() {
        let mut g = ConnectFour::new();
        for col in 0..3 {
            drop_in(&mut g, Player::P1, col);
            drop_in(&mut g, Player::P2, col);
        }
        drop_in(&mut g, Player::P1, 3);
        assert_eq!(g.winner(), Some(Player::P1));
        assert_eq!(g.evaluate(Player::P1), Score::MAX);
        assert_eq!(g.evaluate(Player::P2), Score::MIN);
    }

    #[test]
    fn diagonal_win() {
        let mut g = ConnectFour::new();
        // P1 builds a / diagonal from (0,0) to (3,3)
        for (p, col) in [
            (Player::P1, 0), (Player::P2, 1), (Player::P1, 1), (Player::P2, 2),
            (Player::P1, 2), (Player::P2, 3), (Player::P1, 2), (Player::P2, 3),
            (Player::P1, 3), (Player::P2, 6), (Player::P1, 3),
        ] {
            drop_in(&mut g, p, col);
        }
        assert_eq!(g.winner(), Some(Player::P1));
        assert_eq!(g.won_by().as_deref(), Some("four in a row"));
    }

    #[test]
    fn no_wrap_between_columns() {
        // Rows 3..5 of column 0 plus row 0 of column 1 are adjacent bits without the sentinel
        let bb = bit(0, 3) | bit(0, 4) | bit(0, 5) | bit(1, 0);
        assert!(!won(bb));
        assert!(won(bit(0, 2) | bit(0, 3) | bit(0, 4) | bit(0, 5)));
    }

    #[test]
    fn centre_is_worth_more() {
        let mut centre = ConnectFour::new();
        drop_in(&mut centre, Player::P1, 3);
        let mut edge = ConnectFour::new();
        drop_in(&mut edge, Player::P1, 0);
        assert!(centre.evaluate(Player::P1) > edge.evaluate(Player::P1));
        assert!(centre.evaluate(Player::P2) < 0);
    }
}
