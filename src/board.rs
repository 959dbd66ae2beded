//! Board geometry shared by every grid game
//!
//! `x` is the file/column and `y` the rank/row, both zero based. Row 0 is
//! player one's home row, so "up" for player one is `+y`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ParseMoveError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub x: usize,
    pub y: usize,
}

impl Square {
    pub const fn new(x: usize, y: usize) -> Self { Self { x, y } }

    /// The square `(dx, dy)` away, if it doesn't fall off the low edge.
    /// The high edge is the grid's business (see `Grid::step`).
    pub fn offset(self, dx: i32, dy: i32) -> Option<Square> {
        let x = self.x as i64 + dx as i64;
        let y = self.y as i64 + dy as i64;
        if x < 0 || y < 0 { return None; }
        Some(Square::new(x as usize, y as usize))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + (self.x as u8 % 26)) as char;
        write!(f, "{}{}", file, self.y + 1)
    }
}

impl FromStr for Square {
    type Err = ParseMoveError;

    /// Algebraic notation: a file letter then a 1-based rank, e.g. `e4`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseMoveError::BadSquare { text: s.to_string() };
        let mut chars = s.chars();
        let file = chars.next().ok_or_else(bad)?.to_ascii_lowercase();
        if !file.is_ascii_lowercase() { return Err(bad()); }
        let rank: usize = chars.as_str().parse().map_err(|_| bad())?;
        if rank == 0 { return Err(bad()); }
        Ok(Square::new((file as u8 - b'a') as usize, rank - 1))
    }
}

/// Rectangular board of cells. At most one occupant per cell by construction.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self { width, height, cells: vec![value; width * height] }
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    #[inline] pub fn width(&self) -> usize { self.width }
    #[inline] pub fn height(&self) -> usize { self.height }

    #[inline]
    pub fn contains(&self, sq: Square) -> bool {
        sq.x < self.width && sq.y < self.height
    }

    #[inline]
    fn idx(&self, sq: Square) -> usize { sq.y * self.width + sq.x }

    pub fn get(&self, sq: Square) -> Option<&T> {
        if self.contains(sq) { Some(&self.cells[self.idx(sq)]) } else { None }
    }

    /// Overwrite a cell, handing back what was there. Off-board writes are a caller bug.
    pub fn set(&mut self, sq: Square, value: T) -> T {
        debug_assert!(self.contains(sq), "{:?} outside {}x{} grid", sq, self.width, self.height);
        let i = self.idx(sq);
        std::mem::replace(&mut self.cells[i], value)
    }

    /// Step from `sq` by `(dx, dy)`, staying on the board
    pub fn step(&self, sq: Square, dx: i32, dy: i32) -> Option<Square> {
        sq.offset(dx, dy).filter(|s| self.contains(*s))
    }

    /// Every square, row by row from row 0
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Square::new(x, y)))
    }

    /// Every square paired with its contents
    pub fn iter(&self) -> impl Iterator<Item = (Square, &T)> + '_ {
        self.squares().map(move |sq| (sq, &self.cells[self.idx(sq)]))
    }
}
