/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use arrayvec::ArrayVec;

use crate::{MoveError, Piece, PieceKind, Square};

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = ArrayVec<Move, MAX_NUM_MOVES>;

/// A request to move a piece.
///
/// A [`Move`] is a plain value and says nothing about legality; that is decided against a board.
/// The constructors guarantee its shape: a castle move always names both rook squares,
/// and any other move names neither.
///
/// Castling may be requested from either side. When `from` is the king, the rook squares are the rook's
/// origin and destination. When `from` is the rook, the "rook" squares are the king's.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    castle: Option<(Square, Square)>,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new [`Move`] that is neither a castle nor a promotion.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, Square};
    /// let from = Square::new(1, 4).unwrap();
    /// let to = Square::new(3, 4).unwrap();
    /// let mv = Move::new(from, to);
    /// assert_eq!(mv.from(), from);
    /// assert_eq!(mv.to(), to);
    /// assert!(!mv.is_castle());
    /// assert_eq!(mv.promotion(), None);
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            castle: None,
            promotion: None,
        }
    }

    /// Creates a new [`Move`] carrying a promotion choice.
    ///
    /// Whether the choice is allowed is decided by the legality check.
    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            from,
            to,
            castle: None,
            promotion: Some(kind),
        }
    }

    /// Creates a castle move where the piece on `from` moves to `to`
    /// and the piece on `rook_from` moves to `rook_to`.
    #[inline(always)]
    pub const fn castle(from: Square, to: Square, rook_from: Square, rook_to: Square) -> Self {
        Self {
            from,
            to,
            castle: Some((rook_from, rook_to)),
            promotion: None,
        }
    }

    /// Creates the king-anchored castle move between a king on `king_from` and a rook on `rook_from`.
    ///
    /// The king moves two columns towards the rook, and the rook lands on the square the king crossed.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, Square};
    /// let king = Square::new(0, 4).unwrap();
    /// let rook = Square::new(0, 7).unwrap();
    /// let mv = Move::castling(king, rook).unwrap();
    /// assert_eq!(mv.to(), Square::new(0, 6).unwrap());
    /// assert_eq!(mv.rook_to(), Some(Square::new(0, 5).unwrap()));
    /// ```
    pub fn castling(king_from: Square, rook_from: Square) -> Result<Self, MoveError> {
        if king_from.row() != rook_from.row() || king_from == rook_from {
            return Err(MoveError::MalformedCastleMove);
        }

        let dir = if rook_from.column() > king_from.column() {
            1
        } else {
            -1
        };

        let king_to = king_from
            .offset(0, 2 * dir)
            .ok_or(MoveError::MalformedCastleMove)?;
        let rook_to = king_from
            .offset(0, dir)
            .ok_or(MoveError::MalformedCastleMove)?;

        Ok(Self::castle(king_from, king_to, rook_from, rook_to))
    }

    /// Creates a [`Move`] from loose parts, as a front end might receive them.
    ///
    /// Fails with [`MoveError::MalformedCastleMove`] if `is_castle` disagrees with the presence of the rook squares.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, MoveError, Square};
    /// let a = Square::new(0, 4).unwrap();
    /// let b = Square::new(0, 6).unwrap();
    /// assert_eq!(
    ///     Move::from_parts(a, b, true, None, None, None),
    ///     Err(MoveError::MalformedCastleMove)
    /// );
    /// ```
    pub fn from_parts(
        from: Square,
        to: Square,
        is_castle: bool,
        rook_from: Option<Square>,
        rook_to: Option<Square>,
        promotion: Option<PieceKind>,
    ) -> Result<Self, MoveError> {
        let castle = match (is_castle, rook_from, rook_to) {
            (true, Some(rook_from), Some(rook_to)) => Some((rook_from, rook_to)),
            (false, None, None) => None,
            _ => return Err(MoveError::MalformedCastleMove),
        };

        Ok(Self {
            from,
            to,
            castle,
            promotion,
        })
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    #[inline(always)]
    pub const fn rook_from(&self) -> Option<Square> {
        match self.castle {
            Some((from, _)) => Some(from),
            None => None,
        }
    }

    #[inline(always)]
    pub const fn rook_to(&self) -> Option<Square> {
        match self.castle {
            Some((_, to)) => Some(to),
            None => None,
        }
    }

    #[inline(always)]
    pub(crate) const fn castle_squares(&self) -> Option<(Square, Square)> {
        self.castle
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// If this is a castle move anchored on the rook, returns the same castle anchored on the king.
    ///
    /// `from_is_rook` is decided by the caller, since a [`Move`] does not know what stands on its squares.
    #[inline(always)]
    pub(crate) const fn king_anchored(self, from_is_rook: bool) -> Self {
        match self.castle {
            Some((other_from, other_to)) if from_is_rook => Self {
                from: other_from,
                to: other_to,
                castle: Some((self.from, self.to)),
                promotion: self.promotion,
            },
            _ => self,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;

        if let Some((rook_from, rook_to)) = self.castle {
            write!(f, " castling with {rook_from} -> {rook_to}")?;
        }

        if let Some(kind) = self.promotion {
            write!(f, " ={kind}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

/// A move that has been committed to a board's history.
///
/// Everything is captured by value at the moment of the move, so a record stays accurate
/// no matter what happens to the board afterwards. This is also enough to reverse the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub(crate) mv: Move,

    /// The moving piece, as it was before moving.
    pub(crate) piece: Piece,

    /// The captured piece and where it stood (not `mv.to()` for en passant).
    pub(crate) captured: Option<(Square, Piece)>,

    /// The castling rook, as it was before moving.
    pub(crate) rook: Option<Piece>,

    /// Whether the opponent's king was in check after this move.
    pub(crate) gave_check: bool,

    /// Whether this move was the first time the opponent's king was ever checked.
    pub(crate) flagged_check: bool,
}

impl MoveRecord {
    /// The move as it was applied. Castles are always recorded king-first.
    #[inline(always)]
    pub const fn mv(&self) -> Move {
        self.mv
    }

    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.mv.from()
    }

    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.mv.to()
    }

    /// The piece that moved, as it was before the move.
    #[inline(always)]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        match self.captured {
            Some((_, piece)) => Some(piece),
            None => None,
        }
    }

    /// The square the captured piece was removed from.
    #[inline(always)]
    pub const fn captured_square(&self) -> Option<Square> {
        match self.captured {
            Some((square, _)) => Some(square),
            None => None,
        }
    }

    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.captured_square()
            .is_some_and(|square| square != self.to())
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.mv.is_castle()
    }

    /// Returns `true` if this was a pawn advancing two rows.
    #[inline(always)]
    pub const fn is_double_step(&self) -> bool {
        self.piece.is_pawn() && self.from().delta(self.to()).0.abs() == 2
    }

    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.mv.promotion()
    }

    /// Whether the opponent's king was in check after this move.
    #[inline(always)]
    pub const fn gave_check(&self) -> bool {
        self.gave_check
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.piece.color(), self.piece.kind())?;

        if self.is_castle() {
            write!(f, " castles {}", self.mv)?;
        } else {
            write!(f, " {}", self.mv)?;
        }

        if let Some(captured) = self.captured() {
            write!(f, " takes {}", captured.kind())?;
            if self.is_en_passant() {
                write!(f, " en passant")?;
            }
        }

        if self.gave_check {
            write!(f, " +")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, column: u8) -> Square {
        Square::new_unchecked(row, column)
    }

    #[test]
    fn test_from_parts() {
        let (a, b) = (sq(0, 4), sq(0, 6));
        assert_eq!(
            Move::from_parts(a, b, false, None, None, None),
            Ok(Move::new(a, b))
        );
        assert_eq!(
            Move::from_parts(a, b, true, Some(sq(0, 7)), Some(sq(0, 5)), None),
            Ok(Move::castle(a, b, sq(0, 7), sq(0, 5)))
        );
        assert_eq!(
            Move::from_parts(a, b, true, Some(sq(0, 7)), None, None),
            Err(MoveError::MalformedCastleMove)
        );
        assert_eq!(
            Move::from_parts(a, b, false, Some(sq(0, 7)), Some(sq(0, 5)), None),
            Err(MoveError::MalformedCastleMove)
        );
    }

    #[test]
    fn test_castling_destinations() {
        let queenside = Move::castling(sq(7, 4), sq(7, 0)).unwrap();
        assert_eq!(queenside.to(), sq(7, 2));
        assert_eq!(queenside.rook_from(), Some(sq(7, 0)));
        assert_eq!(queenside.rook_to(), Some(sq(7, 3)));

        assert_eq!(
            Move::castling(sq(0, 4), sq(1, 7)),
            Err(MoveError::MalformedCastleMove)
        );
        assert_eq!(
            Move::castling(sq(0, 1), sq(0, 0)),
            Err(MoveError::MalformedCastleMove)
        );
    }

    #[test]
    fn test_king_anchored() {
        let from_rook = Move::castle(sq(0, 7), sq(0, 5), sq(0, 4), sq(0, 6));
        let from_king = Move::castle(sq(0, 4), sq(0, 6), sq(0, 7), sq(0, 5));
        assert_eq!(from_rook.king_anchored(true), from_king);
        assert_eq!(from_king.king_anchored(false), from_king);
    }
}
