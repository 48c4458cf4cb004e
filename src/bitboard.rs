/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

use crate::Square;

/// A set of squares, stored as a 64-bit mask where bit `n` is the square with index `n`.
///
/// Used to collect the squares a piece attacks without allocating.
/// Iterating a [`Bitboard`] yields its squares in ascending index order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    /// A [`Bitboard`] containing no squares.
    pub const EMPTY_BOARD: Self = Self(0);

    /// A [`Bitboard`] containing only `square`.
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Returns `true` if `square` is in this set.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Bitboard, Square};
    /// let e4 = Square::new(3, 4).unwrap();
    /// let board = Bitboard::from_square(e4);
    /// assert!(board.contains(e4));
    /// assert!(!board.contains(Square::new(3, 5).unwrap()));
    /// ```
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1 << square.index()) != 0
    }

    /// Adds `square` to this set.
    #[inline(always)]
    pub fn insert(&mut self, square: Square) {
        self.0 |= 1 << square.index();
    }

    /// Number of squares in this set.
    #[inline(always)]
    pub const fn population(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Removes and returns the lowest-index square in this set, if any.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }

        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(Square::from_index_unchecked(index))
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut board = Self::EMPTY_BOARD;
        for square in iter {
            board.insert(square);
        }
        board
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

/// Iterates over the squares of a [`Bitboard`], lowest index first.
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bitboard.population() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl fmt::Display for Bitboard {
    /// Row 7 is printed first, so White's side of the board is at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            let cells = (0..8)
                .map(|col| {
                    if self.contains(Square::new_unchecked(row, col)) {
                        "X"
                    } else {
                        "."
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{row}  {cells}")?;
        }
        write!(f, "\n   0 1 2 3 4 5 6 7")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_ascending() {
        let squares = [
            Square::new_unchecked(7, 7),
            Square::new_unchecked(0, 3),
            Square::new_unchecked(4, 1),
        ];
        let board = squares.into_iter().collect::<Bitboard>();
        assert_eq!(board.population(), 3);

        let collected = board.into_iter().collect::<Vec<_>>();
        assert_eq!(
            collected,
            vec![
                Square::new_unchecked(0, 3),
                Square::new_unchecked(4, 1),
                Square::new_unchecked(7, 7),
            ]
        );
    }

    #[test]
    fn test_empty() {
        let mut board = Bitboard::EMPTY_BOARD;
        assert!(board.is_empty());
        assert_eq!(board.pop_lsb(), None);

        board |= Bitboard::from_square(Square::new_unchecked(2, 2));
        assert!(!board.is_empty());
    }
}
