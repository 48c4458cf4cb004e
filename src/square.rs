/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut, Neg},
};

use crate::MoveError;

/// Represents the color of a player, piece, or cell within a chess board.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this color's opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// assert_eq!(-Color::White, Color::Black);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The direction, in rows, that this color's pawns advance.
    ///
    /// White starts on row 0 and moves "up" the board, so it is `+1`. Black is `-1`.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// The row holding this color's king and rooks at the start of a game.
    #[inline(always)]
    pub const fn home_row(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// The row holding this color's pawns at the start of a game.
    #[inline(always)]
    pub const fn pawn_row(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// The row on which this color's pawns must promote.
    #[inline(always)]
    pub const fn promotion_row(&self) -> u8 {
        self.opponent().home_row()
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

/// Represents a single square on an 8x8 chess board.
///
/// Internally encoded as `row * 8 + column`, so the inner value is always `[0, 63]`.
/// Row 0 is White's home row; column 0 is the queen-side edge.
///
/// A [`Square`] can only be obtained through validating constructors,
/// so anything that accepts one never needs to check bounds again.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a new [`Square`] from a row and column, each of which must be within `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{MoveError, Square};
    /// let square = Square::new(3, 4).unwrap();
    /// assert_eq!(square.row(), 3);
    /// assert_eq!(square.column(), 4);
    ///
    /// assert_eq!(
    ///     Square::new(8, 0),
    ///     Err(MoveError::InvalidSquare { row: 8, column: 0 })
    /// );
    /// ```
    #[inline(always)]
    pub const fn new(row: i8, column: i8) -> Result<Self, MoveError> {
        if row < 0 || row > 7 || column < 0 || column > 7 {
            return Err(MoveError::InvalidSquare { row, column });
        }

        Ok(Self::new_unchecked(row as u8, column as u8))
    }

    /// Creates a new [`Square`] without checking bounds.
    ///
    /// # Panics
    /// If either coordinate is greater than `7` and debug assertions are enabled.
    #[inline(always)]
    pub const fn new_unchecked(row: u8, column: u8) -> Self {
        debug_assert!(row < 8 && column < 8, "Invalid row or column for Square");
        Self(row * 8 + column)
    }

    /// Creates a new [`Square`] from an index in `[0, 63]`.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        debug_assert!(index < 64, "Invalid index for Square");
        Self(index)
    }

    /// Iterates over all squares in row-major order, starting at `(0, 0)`.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Self)
    }

    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / 8
    }

    #[inline(always)]
    pub const fn column(&self) -> u8 {
        self.0 % 8
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square `drow` rows and `dcol` columns away, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Square;
    /// let corner = Square::new(0, 0).unwrap();
    /// assert_eq!(corner.offset(1, 2), Some(Square::new(1, 2).unwrap()));
    /// assert_eq!(corner.offset(-1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, drow: i8, dcol: i8) -> Option<Self> {
        let row = self.row() as i8 + drow;
        let column = self.column() as i8 + dcol;
        match Self::new(row, column) {
            Ok(square) => Some(square),
            Err(_) => None,
        }
    }

    /// Signed `(row, column)` displacement from `self` to `other`.
    #[inline(always)]
    pub const fn delta(&self, other: Self) -> (i8, i8) {
        (
            other.row() as i8 - self.row() as i8,
            other.column() as i8 - self.column() as i8,
        )
    }

    /// The shade of this cell on a physical board.
    ///
    /// `(0, 0)` is dark, and shades alternate along every row and column.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, Square};
    /// assert_eq!(Square::new(0, 0).unwrap().color(), Color::Black);
    /// assert_eq!(Square::new(0, 1).unwrap().color(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn color(&self) -> Color {
        if (self.row() + self.column()) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.column())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, {})", self.row(), self.column())
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl<T> Index<Square> for [[T; 8]; 8] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.row() as usize][index.column() as usize]
    }
}

impl<T> IndexMut<Square> for [[T; 8]; 8] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.row() as usize][index.column() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_bounds() {
        for row in -2..10 {
            for column in -2..10 {
                let square = Square::new(row, column);
                if (0..8).contains(&row) && (0..8).contains(&column) {
                    let square = square.unwrap();
                    assert_eq!(square.row() as i8, row);
                    assert_eq!(square.column() as i8, column);
                } else {
                    assert_eq!(square, Err(MoveError::InvalidSquare { row, column }));
                }
            }
        }
    }

    #[test]
    fn test_iter_is_row_major() {
        let squares = Square::iter().collect::<Vec<_>>();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::new_unchecked(0, 0));
        assert_eq!(squares[8], Square::new_unchecked(1, 0));
        assert_eq!(squares[63], Square::new_unchecked(7, 7));
    }

    #[test]
    fn test_opponent_is_involutive() {
        for color in Color::all() {
            assert_ne!(color, color.opponent());
            assert_eq!(color, color.opponent().opponent());
        }
    }

    #[test]
    fn test_rows() {
        assert_eq!(Color::White.promotion_row(), 7);
        assert_eq!(Color::Black.promotion_row(), 0);
        assert_eq!(Color::White.pawn_row(), 1);
        assert_eq!(Color::Black.pawn_row(), 6);
    }

    #[test]
    fn test_delta() {
        let from = Square::new_unchecked(1, 4);
        let to = Square::new_unchecked(3, 3);
        assert_eq!(from.delta(to), (2, -1));
        assert_eq!(to.delta(from), (-2, 1));
    }
}
