/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref};

use crate::{
    movegen, Color, IllegalReason, Move, MoveError, MoveRecord, Piece, PieceKind, Square,
};

/// Kinds of the pieces on each home row, from column 0 to column 7.
const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// One of the 64 cells of the board, holding at most one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    square: Square,
    occupant: Option<Piece>,
}

impl Cell {
    #[inline(always)]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[inline(always)]
    pub const fn occupant(&self) -> Option<Piece> {
        self.occupant
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// The shade of this cell. See [`Square::color`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.square.color()
    }
}

/// Where every piece stands, without any history.
///
/// A [`Grid`] is small and [`Copy`], so trying out a move is just copying the grid and making the move on the copy.
///
/// The grid also indexes each king's square, so finding a king never requires a scan.
/// Every method that places or removes a piece keeps that index up to date.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Cell; 8]; 8],
    kings: [Option<Square>; Color::COUNT],
}

impl Grid {
    /// A grid with no pieces on it.
    pub fn empty() -> Self {
        let mut cells = [[Cell {
            square: Square::new_unchecked(0, 0),
            occupant: None,
        }; 8]; 8];

        for square in Square::iter() {
            cells[square].square = square;
        }

        Self {
            cells,
            kings: [None; Color::COUNT],
        }
    }

    /// Fetches the [`Cell`] at `square`.
    #[inline(always)]
    pub fn cell_at(&self, square: Square) -> &Cell {
        &self.cells[square]
    }

    /// Fetches the piece at `square`, if there is one.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Color, PieceKind, Square};
    /// let board = Board::new();
    /// let king = board.piece_at(Square::new(0, 4).unwrap()).unwrap();
    /// assert_eq!(king.color(), Color::White);
    /// assert_eq!(king.kind(), PieceKind::King);
    ///
    /// assert!(board.piece_at(Square::new(4, 4).unwrap()).is_none());
    /// ```
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square].occupant
    }

    #[inline(always)]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.cells[square].occupant.is_some()
    }

    /// The square of `color`'s king, or `None` if that king is not on the board.
    ///
    /// Boards built through [`Board::new`] always have both kings.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color as usize]
    }

    /// Iterates over all cells in row-major order, starting at `(0, 0)`.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Iterates over every occupied square and its piece, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells()
            .filter_map(|cell| cell.occupant.map(|piece| (cell.square, piece)))
    }

    /// Places `piece` on `square`, returning whatever was there before.
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        let previous = self.take(square);
        self.cells[square].occupant = Some(piece);
        if piece.is_king() {
            self.kings[piece.color()] = Some(square);
        }
        previous
    }

    /// Removes and returns the piece on `square`, if any.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.cells[square].occupant.take()?;
        if piece.is_king() && self.kings[piece.color()] == Some(square) {
            self.kings[piece.color()] = None;
        }
        Some(piece)
    }

    /// Moves the occupant of `mv.from()` onto `mv.to()`, overwriting anything there.
    ///
    /// No legality is checked. Returns the overwritten piece, if any.
    pub fn apply_simple(&mut self, mv: Move) -> Option<Piece> {
        let piece = self.take(mv.from())?;
        self.place(mv.to(), piece.with_moved())
    }

    /// Moves both the king and rook of a castle move, marking both as moved.
    ///
    /// No legality is checked, but `mv` must be a castle move with pieces on both origins.
    pub fn apply_castle(&mut self, mv: Move) -> Result<(), MoveError> {
        let (rook_from, rook_to) = mv
            .castle_squares()
            .ok_or(MoveError::MalformedCastleMove)?;

        let no_piece = |from, to| MoveError::IllegalMove {
            from,
            to,
            reason: IllegalReason::NoPiece,
        };

        if !self.is_occupied(mv.from()) {
            return Err(no_piece(mv.from(), mv.to()));
        }
        if !self.is_occupied(rook_from) {
            return Err(no_piece(rook_from, rook_to));
        }

        // Lift both pieces before dropping either, since a destination may be the other's origin
        let king = self.take(mv.from()).ok_or(no_piece(mv.from(), mv.to()))?;
        let rook = self.take(rook_from).ok_or(no_piece(rook_from, rook_to))?;
        self.place(mv.to(), king.with_moved());
        self.place(rook_to, rook.with_moved());

        Ok(())
    }

    /// If `mv` is a castle requested from the rook's side, returns it anchored on the king instead.
    pub(crate) fn anchor_castle(&self, mv: Move) -> Move {
        let from_is_rook = self.piece_at(mv.from()).is_some_and(|piece| piece.is_rook())
            && mv
                .rook_from()
                .and_then(|square| self.piece_at(square))
                .is_some_and(|piece| piece.is_king());

        mv.king_anchored(from_is_rook)
    }

    /// Makes `mv` on this grid without checking legality, returning a record of everything it changed.
    ///
    /// This handles every side effect of a move: castling displaces both pieces,
    /// a pawn moving diagonally onto an empty cell removes the pawn it passed,
    /// and a promotion replaces the pawn.
    ///
    /// The returned record does not know about checks; see [`Board::commit`].
    pub fn make_move(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        let mv = self.anchor_castle(mv);
        let piece = self.piece_at(mv.from()).ok_or(MoveError::IllegalMove {
            from: mv.from(),
            to: mv.to(),
            reason: IllegalReason::NoPiece,
        })?;

        if let Some((rook_from, _)) = mv.castle_squares() {
            let rook = self.piece_at(rook_from);
            self.apply_castle(mv)?;

            return Ok(MoveRecord {
                mv,
                piece,
                captured: None,
                rook,
                gave_check: false,
                flagged_check: false,
            });
        }

        let mut captured = self.piece_at(mv.to()).map(|victim| (mv.to(), victim));

        // En passant: the captured pawn sits beside the origin, not on the destination
        if piece.is_pawn() && captured.is_none() && mv.from().column() != mv.to().column() {
            let passed = Square::new_unchecked(mv.from().row(), mv.to().column());
            captured = self.take(passed).map(|victim| (passed, victim));
        }

        self.apply_simple(mv);

        if let Some(kind) = mv.promotion().filter(|_| piece.is_pawn()) {
            self.place(mv.to(), piece.promoted(kind));
        }

        Ok(MoveRecord {
            mv,
            piece,
            captured,
            rook: None,
            gave_check: false,
            flagged_check: false,
        })
    }

    /// Copies this grid and makes `mv` on the copy, leaving `self` untouched.
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Result<Self, MoveError> {
        let mut copied = *self;
        copied.make_move(mv)?;
        Ok(copied)
    }

    /// Returns `true` if any piece of color `by` attacks `square`.
    ///
    /// Attacks are raw geometry: a pinned piece still attacks, and pawns attack only diagonally.
    pub fn square_under_attack(&self, square: Square, by: Color) -> bool {
        self.pieces()
            .filter(|(_, piece)| piece.color() == by)
            .any(|(from, piece)| movegen::raw_attack_squares(self, from, piece).contains(square))
    }

    /// Returns `true` if `color`'s king is attacked.
    ///
    /// A board without that king is never in check.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Color};
    /// let board = Board::new();
    /// assert!(!board.is_in_check(Color::White));
    /// assert!(!board.is_in_check(Color::Black));
    /// ```
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.square_under_attack(king, color.opponent()))
    }

    /// Sets the "has been checked" flag on `color`'s king, returning `true` if it was not already set.
    fn flag_checked(&mut self, color: Color) -> bool {
        let Some(square) = self.king_square(color) else {
            return false;
        };

        match self.piece_at(square) {
            Some(king) if !king.has_been_checked() => {
                self.place(square, king.with_checked());
                true
            }
            _ => false,
        }
    }

    fn unflag_checked(&mut self, color: Color) {
        if let Some(square) = self.king_square(color) {
            if let Some(king) = self.piece_at(square) {
                self.place(square, king.without_checked());
            }
        }
    }
}

impl fmt::Display for Grid {
    /// Row 7 is printed first, so White's side of the board is at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            let cells = self.cells[row]
                .iter()
                .map(|cell| match cell.occupant {
                    Some(piece) => piece.char(),
                    None => '.',
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{row}  {cells}")?;
        }
        write!(f, "\n   0 1 2 3 4 5 6 7")
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A chess board: where the pieces stand, plus every move that led there.
///
/// Read-only queries ([`Grid::piece_at`], [`Grid::is_in_check`], ...) are available through [`Deref`].
/// All mutations go through [`Board`] itself so the history stays in step with the pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    history: Vec<MoveRecord>,
}

impl Board {
    /// Creates a board set up in the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Color, PieceKind, Square};
    /// let board = Board::new();
    /// assert_eq!(board.pieces().count(), 32);
    /// assert_eq!(board.king_square(Color::Black), Some(Square::new(7, 4).unwrap()));
    /// assert!(board.history().is_empty());
    /// ```
    pub fn new() -> Self {
        let mut board = Self::empty();

        for color in Color::all() {
            for (column, kind) in BACK_ROW.into_iter().enumerate() {
                let column = column as u8;
                let home = Square::new_unchecked(color.home_row(), column);
                let pawn = Square::new_unchecked(color.pawn_row(), column);
                board.place(home, Piece::new(color, kind));
                board.place(pawn, Piece::new(color, PieceKind::Pawn));
            }
        }

        board
    }

    /// Creates a board with no pieces and no history, to be filled with [`Board::place`].
    pub fn empty() -> Self {
        Self {
            grid: Grid::empty(),
            history: Vec::new(),
        }
    }

    /// Places `piece` on `square`, returning whatever was there before.
    ///
    /// This is for setting up positions and bypasses the rules entirely.
    /// Place at most one king of each color.
    #[inline(always)]
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.grid.place(square, piece)
    }

    /// Removes and returns the piece on `square`, bypassing the rules.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.grid.take(square)
    }

    /// See [`Grid::apply_simple`]. The move is not recorded in the history.
    #[inline(always)]
    pub fn apply_simple(&mut self, mv: Move) -> Option<Piece> {
        self.grid.apply_simple(mv)
    }

    /// See [`Grid::apply_castle`]. The move is not recorded in the history.
    #[inline(always)]
    pub fn apply_castle(&mut self, mv: Move) -> Result<(), MoveError> {
        self.grid.apply_castle(mv)
    }

    /// Flags every king that is currently in check as having been checked.
    ///
    /// Used when play starts from a position that was set up rather than reached.
    pub(crate) fn flag_kings_in_check(&mut self) {
        for color in Color::all() {
            if self.grid.is_in_check(color) {
                self.grid.flag_checked(color);
            }
        }
    }

    /// The placement of the pieces, without history.
    #[inline(always)]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Makes `mv` without checking legality and appends it to the history.
    ///
    /// If the move leaves the opponent in check, their king is flagged as having been checked.
    pub fn commit(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        let mut record = self.grid.make_move(mv)?;
        let opponent = record.piece.color().opponent();

        if self.grid.is_in_check(opponent) {
            record.gave_check = true;
            record.flagged_check = self.grid.flag_checked(opponent);
        }

        self.history.push(record);
        Ok(record)
    }

    /// Reverses the most recent committed move, returning its record.
    ///
    /// Returns `None` if there is no history.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Move, Square};
    /// let mut board = Board::new();
    /// let start = board.clone();
    ///
    /// let e2 = Square::new(1, 4).unwrap();
    /// let e4 = Square::new(3, 4).unwrap();
    /// board.commit(Move::new(e2, e4)).unwrap();
    /// assert_ne!(board, start);
    ///
    /// assert!(board.undo().is_some());
    /// assert_eq!(board, start);
    /// assert!(board.undo().is_none());
    /// ```
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        let mv = record.mv;

        if record.flagged_check {
            self.grid.unflag_checked(record.piece.color().opponent());
        }

        self.grid.take(mv.to());
        if let Some((rook_from, rook_to)) = mv.castle_squares() {
            self.grid.take(rook_to);
            if let Some(rook) = record.rook {
                self.grid.place(rook_from, rook);
            }
        }

        self.grid.place(mv.from(), record.piece);
        if let Some((square, piece)) = record.captured {
            self.grid.place(square, piece);
        }

        Some(record)
    }

    /// A fully independent copy of this board, safe to mutate for "what if" analysis.
    #[inline(always)]
    pub fn clone_for_simulation(&self) -> Self {
        self.clone()
    }

    /// The most recently committed move, if any.
    #[inline(always)]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Every committed move, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Board {
    type Target = Grid;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, column: u8) -> Square {
        Square::new_unchecked(row, column)
    }

    #[test]
    fn test_cells_know_their_squares() {
        let board = Board::new();
        for (i, cell) in board.cells().enumerate() {
            assert_eq!(cell.square().index(), i);
        }
        assert_eq!(board.cell_at(sq(0, 0)).color(), Color::Black);
        assert!(board.cell_at(sq(3, 3)).is_empty());
    }

    #[test]
    fn test_king_index_follows_king() {
        let mut board = Board::new();
        assert_eq!(board.king_square(Color::White), Some(sq(0, 4)));

        board.apply_simple(Move::new(sq(0, 4), sq(3, 4)));
        assert_eq!(board.king_square(Color::White), Some(sq(3, 4)));

        board.take(sq(3, 4));
        assert_eq!(board.king_square(Color::White), None);
        assert!(!board.is_in_check(Color::White));
    }

    #[test]
    fn test_apply_simple_marks_moved() {
        let mut board = Board::new();
        let captured = board.apply_simple(Move::new(sq(1, 0), sq(6, 0)));
        assert_eq!(captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));

        let pawn = board.piece_at(sq(6, 0)).unwrap();
        assert_eq!(pawn.color(), Color::White);
        assert!(pawn.has_moved());
        assert!(board.piece_at(sq(1, 0)).is_none());
    }

    #[test]
    fn test_apply_castle_requires_rook_squares() {
        let mut board = Board::new();
        assert_eq!(
            board.apply_castle(Move::new(sq(0, 4), sq(0, 6))),
            Err(MoveError::MalformedCastleMove)
        );
    }

    #[test]
    fn test_castle_from_rook_side_is_anchored_on_king() {
        let mut board = Board::empty();
        board.place(sq(0, 4), Piece::new(Color::White, PieceKind::King));
        board.place(sq(0, 7), Piece::new(Color::White, PieceKind::Rook));

        let from_rook = Move::castle(sq(0, 7), sq(0, 5), sq(0, 4), sq(0, 6));
        let record = board.commit(from_rook).unwrap();
        assert_eq!(record.from(), sq(0, 4));
        assert_eq!(record.to(), sq(0, 6));
        assert_eq!(board.king_square(Color::White), Some(sq(0, 6)));
        assert!(board.piece_at(sq(0, 5)).is_some_and(|p| p.is_rook() && p.has_moved()));
    }

    #[test]
    fn test_undo_restores_captures_and_flags() {
        let mut board = Board::empty();
        board.place(sq(0, 0), Piece::new(Color::White, PieceKind::King));
        board.place(sq(7, 7), Piece::new(Color::Black, PieceKind::King));
        board.place(sq(0, 7), Piece::new(Color::White, PieceKind::Rook));
        board.place(sq(5, 7), Piece::new(Color::Black, PieceKind::Knight));
        let before = board.clone();

        // Rook takes the knight and checks the black king
        let record = board.commit(Move::new(sq(0, 7), sq(5, 7))).unwrap();
        assert_eq!(record.captured(), Some(Piece::new(Color::Black, PieceKind::Knight)));
        assert!(record.gave_check());
        assert!(board.piece_at(sq(7, 7)).unwrap().has_been_checked());

        board.undo();
        assert_eq!(board, before);
        assert!(!board.piece_at(sq(7, 7)).unwrap().has_been_checked());
    }

    #[test]
    fn test_simulation_is_independent() {
        let board = Board::new();
        let mut copy = board.clone_for_simulation();
        copy.commit(Move::new(sq(1, 4), sq(3, 4))).unwrap();
        assert!(board.piece_at(sq(1, 4)).is_some());
        assert!(board.history().is_empty());

        let grid = board.with_move_made(Move::new(sq(1, 4), sq(3, 4))).unwrap();
        assert!(grid.piece_at(sq(3, 4)).is_some());
        assert!(board.piece_at(sq(3, 4)).is_none());
    }
}
