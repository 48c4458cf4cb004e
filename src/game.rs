/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref};

use crate::{
    check_legality, generate_all_legal_moves, generate_legal_moves, Board, Color, IllegalReason,
    Move, MoveError, MoveList, MoveRecord, Square,
};

/// A participant in a [`Game`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    name: String,
    color: Color,
}

impl Player {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.color)
    }
}

/// A game of chess between two players, enforcing turn order on top of the rules of the [`Board`].
///
/// A [`Game`] owns its board outright, so separate games never affect one another.
/// Read-only board queries are available through [`Deref`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    players: [Player; Color::COUNT],
}

impl Game {
    /// Starts a new game from the standard position, White to move.
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            board: Board::new(),
            side_to_move: Color::White,
            players: [
                Player::new(white, Color::White),
                Player::new(black, Color::Black),
            ],
        }
    }

    /// Starts a game from an arbitrary board, with `side_to_move` to play.
    ///
    /// Any king already in check on `board` is flagged as having been checked.
    pub fn from_board(mut board: Board, side_to_move: Color) -> Self {
        board.flag_kings_in_check();
        Self {
            board,
            side_to_move,
            ..Default::default()
        }
    }

    /// Plays `mv` if it is legal and the moving piece belongs to the side to move.
    ///
    /// On failure, nothing about the game changes.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, Game, Move, MoveError, Square};
    /// let mut game = Game::default();
    /// let e2 = Square::new(1, 4).unwrap();
    /// let e4 = Square::new(3, 4).unwrap();
    /// let e7 = Square::new(6, 4).unwrap();
    /// let e5 = Square::new(4, 4).unwrap();
    ///
    /// // Black cannot go first
    /// assert_eq!(
    ///     game.request_move(Move::new(e7, e5)),
    ///     Err(MoveError::NotYourTurn { color: Color::Black })
    /// );
    ///
    /// assert!(game.request_move(Move::new(e2, e4)).is_ok());
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// assert!(game.request_move(Move::new(e7, e5)).is_ok());
    /// ```
    pub fn request_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let piece = self.board.piece_at(mv.from()).ok_or(MoveError::IllegalMove {
            from: mv.from(),
            to: mv.to(),
            reason: IllegalReason::NoPiece,
        })?;

        if piece.color() != self.side_to_move {
            return Err(MoveError::NotYourTurn {
                color: piece.color(),
            });
        }

        check_legality(&self.board, mv)?;
        self.make_move_unchecked(mv)?;

        Ok(())
    }

    /// Commits `mv` without checking legality and passes the turn.
    pub(crate) fn make_move_unchecked(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        let record = self.board.commit(mv)?;
        self.side_to_move = self.side_to_move.opponent();
        Ok(record)
    }

    /// Takes back the most recent move, returning its record, and passes the turn back.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.board.undo()?;
        self.side_to_move = self.side_to_move.opponent();
        Some(record)
    }

    /// All legal moves for the piece on `square`.
    ///
    /// An empty square yields an empty list. A piece belonging to the side not to move is an error.
    pub fn legal_moves_for(&self, square: Square) -> Result<MoveList, MoveError> {
        match self.board.piece_at(square) {
            Some(piece) if piece.color() != self.side_to_move => Err(MoveError::NotYourTurn {
                color: piece.color(),
            }),
            _ => Ok(generate_legal_moves(&self.board, square)),
        }
    }

    /// All legal moves for the side to move.
    ///
    /// An empty list means the side to move is either checkmated or stalemated.
    #[inline(always)]
    pub fn legal_moves(&self) -> MoveList {
        generate_all_legal_moves(&self.board, self.side_to_move)
    }

    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    #[inline(always)]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.board.last_move()
    }

    #[inline(always)]
    pub fn history(&self) -> &[MoveRecord] {
        self.board.history()
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color]
    }

    /// The player whose turn it is.
    #[inline(always)]
    pub fn current_player(&self) -> &Player {
        self.player(self.side_to_move)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new("White", "Black")
    }
}

impl Deref for Game {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", self.board)?;
        write!(f, "{} to move", self.current_player())?;
        if self.is_in_check(self.side_to_move) {
            write!(f, " (in check)")?;
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
    fn test_players() {
        let game = Game::new("Alice", "Bob");
        assert_eq!(game.player(Color::White).name(), "Alice");
        assert_eq!(game.player(Color::Black).name(), "Bob");
        assert_eq!(game.current_player().color(), Color::White);
    }

    #[test]
    fn test_legal_moves_for() {
        let game = Game::default();
        assert_eq!(game.legal_moves_for(sq(1, 0)).unwrap().len(), 2);
        assert!(game.legal_moves_for(sq(4, 4)).unwrap().is_empty());
        assert_eq!(
            game.legal_moves_for(sq(6, 0)),
            Err(MoveError::NotYourTurn {
                color: Color::Black
            })
        );
    }

    #[test]
    fn test_empty_origin_is_illegal() {
        let mut game = Game::default();
        let (from, to) = (sq(3, 3), sq(4, 3));
        assert_eq!(
            game.request_move(Move::new(from, to)),
            Err(MoveError::IllegalMove {
                from,
                to,
                reason: IllegalReason::NoPiece
            })
        );
    }

    #[test]
    fn test_undo_passes_turn_back() {
        let mut game = Game::default();
        game.request_move(Move::new(sq(0, 6), sq(2, 5))).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);

        let record = game.undo().unwrap();
        assert_eq!(record.from(), sq(0, 6));
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game, Game::default());
        assert!(game.undo().is_none());
    }

    #[test]
    fn test_failed_commit_changes_nothing() {
        let mut game = Game::default();
        assert!(game.make_move_unchecked(Move::new(sq(4, 4), sq(5, 4))).is_err());
        assert_eq!(game, Game::default());
    }

    #[test]
    fn test_check_is_flagged() {
        let mut game = Game::default();
        // e4 f5 Qh5+
        game.request_move(Move::new(sq(1, 4), sq(3, 4))).unwrap();
        game.request_move(Move::new(sq(6, 5), sq(4, 5))).unwrap();
        game.request_move(Move::new(sq(0, 3), sq(4, 7))).unwrap();

        assert!(game.is_in_check(Color::Black));
        assert!(game.last_move().unwrap().gave_check());
        let king = game.piece_at(sq(7, 4)).unwrap();
        assert!(king.has_been_checked());
    }
}
