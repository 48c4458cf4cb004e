/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Color, PieceKind, Square};

/// Every way a move request (or a square construction) can be refused.
///
/// Errors are plain values: a refused request never mutates the board, history, or turn,
/// so submitting the same bad request twice yields two equal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum MoveError {
    /// A coordinate fell outside of `[0, 7]`.
    #[error("({row}, {column}) is not a square on the board")]
    InvalidSquare { row: i8, column: i8 },

    /// The piece being moved (or queried) does not belong to the side to move.
    #[error("it is not {color}'s turn to move")]
    NotYourTurn { color: Color },

    /// The move cannot be played in the current position.
    #[error("illegal move {from} -> {to}: {reason}")]
    IllegalMove {
        from: Square,
        to: Square,
        reason: IllegalReason,
    },

    /// A promotion was omitted where required, supplied where forbidden, or names a kind a pawn cannot become.
    #[error("invalid promotion: {}", describe_promotion(.kind))]
    InvalidPromotion { kind: Option<PieceKind> },

    /// A castle move without both rook squares, or a simple move carrying rook squares.
    #[error("castle moves must carry both rook squares, and other moves must carry neither")]
    MalformedCastleMove,
}

/// Why a move was rejected as [`MoveError::IllegalMove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IllegalReason {
    /// There is no piece on the origin square.
    NoPiece,

    /// The destination holds a piece of the mover's own color.
    FriendlyFire,

    /// The piece cannot move in that shape, or its path is blocked.
    BadGeometry,

    /// The king or rook has already moved, or the king has been checked at some point.
    CastleUnavailable,

    /// A square between or under the castling pieces is occupied.
    CastleObstructed,

    /// The king would start on, cross, or land on an attacked square.
    CastleThroughCheck,

    /// The move would leave the mover's own king in check.
    SelfCheck,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoPiece => "there is no piece to move",
            Self::FriendlyFire => "cannot capture a piece of your own color",
            Self::BadGeometry => "the piece cannot move that way",
            Self::CastleUnavailable => "castling rights have been lost",
            Self::CastleObstructed => "the castling path is obstructed",
            Self::CastleThroughCheck => "the king cannot castle out of, through, or into check",
            Self::SelfCheck => "the move would leave the king in check",
        };

        write!(f, "{reason}")
    }
}

fn describe_promotion(kind: &Option<PieceKind>) -> String {
    match kind {
        Some(kind) => format!("a pawn cannot promote to a {kind} here"),
        None => String::from("a pawn reaching the last row must name its promotion"),
    }
}
