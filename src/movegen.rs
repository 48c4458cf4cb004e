/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{
    Bitboard, Board, Color, Grid, IllegalReason, Move, MoveError, MoveList, Piece, PieceKind,
    Square,
};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const ROOK_DELTAS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const QUEEN_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// How one kind of piece moves.
struct MovementRules {
    /// Whether a non-castle move has the right shape for this kind, with a clear path.
    ///
    /// Friendly fire, promotion, and self-check are checked elsewhere.
    geometry: fn(&Board, Move, Piece) -> bool,

    /// The squares a piece of this kind attacks from a square, ignoring pins and checks.
    attacks: fn(&Grid, Square, Color) -> Bitboard,
}

/// Movement rules for each [`PieceKind`], indexed by kind.
const RULES: [MovementRules; PieceKind::COUNT] = [
    // Pawn
    MovementRules {
        geometry: pawn_geometry,
        attacks: pawn_attacks,
    },
    // Knight
    MovementRules {
        geometry: attack_geometry,
        attacks: knight_attacks,
    },
    // Bishop
    MovementRules {
        geometry: attack_geometry,
        attacks: bishop_attacks,
    },
    // Rook
    MovementRules {
        geometry: attack_geometry,
        attacks: rook_attacks,
    },
    // Queen
    MovementRules {
        geometry: attack_geometry,
        attacks: queen_attacks,
    },
    // King
    MovementRules {
        geometry: attack_geometry,
        attacks: king_attacks,
    },
];

/// Squares reachable by a single hop along each offset.
#[inline(always)]
fn step_attacks(from: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(drow, dcol)| from.offset(drow, dcol))
        .collect()
}

/// Squares along each direction up to and including the first occupied square.
fn ray_attacks(grid: &Grid, from: Square, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY_BOARD;

    for &(drow, dcol) in directions {
        let mut current = from;
        while let Some(next) = current.offset(drow, dcol) {
            attacks.insert(next);
            if grid.is_occupied(next) {
                break;
            }
            current = next;
        }
    }

    attacks
}

fn pawn_attacks(_: &Grid, from: Square, color: Color) -> Bitboard {
    let forward = color.forward();
    step_attacks(from, &[(forward, -1), (forward, 1)])
}

fn knight_attacks(_: &Grid, from: Square, _: Color) -> Bitboard {
    step_attacks(from, &KNIGHT_DELTAS)
}

fn bishop_attacks(grid: &Grid, from: Square, _: Color) -> Bitboard {
    ray_attacks(grid, from, &BISHOP_DELTAS)
}

fn rook_attacks(grid: &Grid, from: Square, _: Color) -> Bitboard {
    ray_attacks(grid, from, &ROOK_DELTAS)
}

fn queen_attacks(grid: &Grid, from: Square, _: Color) -> Bitboard {
    ray_attacks(grid, from, &QUEEN_DELTAS)
}

fn king_attacks(_: &Grid, from: Square, _: Color) -> Bitboard {
    step_attacks(from, &QUEEN_DELTAS)
}

/// For everything but pawns, a piece moves exactly where it attacks.
fn attack_geometry(board: &Board, mv: Move, piece: Piece) -> bool {
    raw_attack_squares(board, mv.from(), piece).contains(mv.to())
}

fn pawn_geometry(board: &Board, mv: Move, pawn: Piece) -> bool {
    let forward = pawn.color().forward();
    let (drow, dcol) = mv.from().delta(mv.to());

    if dcol == 0 {
        // Pushes never capture
        if board.is_occupied(mv.to()) {
            return false;
        }

        if drow == forward {
            return true;
        }

        drow == 2 * forward
            && !pawn.has_moved()
            && mv
                .from()
                .offset(forward, 0)
                .is_some_and(|skipped| !board.is_occupied(skipped))
    } else if drow == forward && dcol.abs() == 1 {
        match board.piece_at(mv.to()) {
            Some(target) => target.color() != pawn.color(),
            None => is_en_passant(board, mv, pawn),
        }
    } else {
        false
    }
}

/// Returns `true` if `mv` is a diagonal pawn step behind an enemy pawn that just advanced two rows beside it.
fn is_en_passant(board: &Board, mv: Move, pawn: Piece) -> bool {
    let Some(last) = board.last_move() else {
        return false;
    };

    let passed = Square::new_unchecked(mv.from().row(), mv.to().column());

    last.is_double_step()
        && last.piece().color() != pawn.color()
        && last.to() == passed
        && board
            .piece_at(passed)
            .is_some_and(|victim| victim.is_pawn() && victim.color() != pawn.color())
}

/// Checks every castling condition for a king-anchored castle move.
fn check_castle(board: &Board, mv: Move) -> Result<(), IllegalReason> {
    let (rook_from, rook_to) = mv.castle_squares().ok_or(IllegalReason::BadGeometry)?;

    let king = board
        .piece_at(mv.from())
        .filter(Piece::is_king)
        .ok_or(IllegalReason::BadGeometry)?;
    let rook = board
        .piece_at(rook_from)
        .filter(|rook| rook.is_rook() && rook.color() == king.color())
        .ok_or(IllegalReason::BadGeometry)?;

    // The only legal shape is the one computed from the two origins
    if Move::castling(mv.from(), rook_from).ok() != Some(mv) {
        return Err(IllegalReason::BadGeometry);
    }

    if king.has_moved() || rook.has_moved() || king.has_been_checked() {
        return Err(IllegalReason::CastleUnavailable);
    }

    let row = mv.from().row();
    let (low, high) = if rook_from.column() > mv.from().column() {
        (mv.from().column(), rook_from.column())
    } else {
        (rook_from.column(), mv.from().column())
    };

    let between_is_clear =
        (low + 1..high).all(|column| !board.is_occupied(Square::new_unchecked(row, column)));
    let landing_is_clear = [mv.to(), rook_to].into_iter().all(|square| {
        square == mv.from() || square == rook_from || !board.is_occupied(square)
    });

    if !between_is_clear || !landing_is_clear {
        return Err(IllegalReason::CastleObstructed);
    }

    // The rook lands on the square the king crosses
    let enemy = king.color().opponent();
    if [mv.from(), rook_to, mv.to()]
        .into_iter()
        .any(|square| board.square_under_attack(square, enemy))
    {
        return Err(IllegalReason::CastleThroughCheck);
    }

    Ok(())
}

/// A pawn arriving on its last row must name a valid promotion, and nothing else may name one.
fn check_promotion(mv: Move, piece: Piece) -> Result<(), MoveError> {
    let must_promote = piece.is_pawn() && mv.to().row() == piece.color().promotion_row();

    match (must_promote, mv.promotion()) {
        (true, Some(kind)) if kind.is_promotion_target() => Ok(()),
        (false, None) => Ok(()),
        (_, kind) => Err(MoveError::InvalidPromotion { kind }),
    }
}

/// The squares `piece` attacks from `square`, ignoring pins and checks.
///
/// Sliding pieces include the first occupied square along each line, whatever its color.
/// Pawns attack only their two forward diagonals.
///
/// # Example
/// ```
/// # use arbiter::{raw_attack_squares, Board, Square};
/// let board = Board::new();
/// let knight_square = Square::new(0, 1).unwrap();
/// let knight = board.piece_at(knight_square).unwrap();
///
/// let attacks = raw_attack_squares(&board, knight_square, knight);
/// assert_eq!(attacks.population(), 3);
/// assert!(attacks.contains(Square::new(2, 2).unwrap()));
/// ```
#[inline(always)]
pub fn raw_attack_squares(grid: &Grid, square: Square, piece: Piece) -> Bitboard {
    (RULES[piece.kind()].attacks)(grid, square, piece.color())
}

/// Returns `true` if the piece on `mv.from()` could make `mv` by its movement pattern, ignoring check.
///
/// For castle moves this checks the full set of castling conditions, and a castle never promotes.
pub fn geometry_valid(board: &Board, mv: Move) -> bool {
    let Some(piece) = board.piece_at(mv.from()) else {
        return false;
    };

    if mv.is_castle() {
        mv.promotion().is_none() && check_castle(board, board.anchor_castle(mv)).is_ok()
    } else {
        (RULES[piece.kind()].geometry)(board, mv, piece)
    }
}

/// Checks whether `mv` can be played on `board`, returning the first reason it cannot.
///
/// Turn order is not considered here; see [`crate::Game::request_move`].
///
/// # Example
/// ```
/// # use arbiter::{check_legality, Board, IllegalReason, Move, MoveError, Square};
/// let board = Board::new();
/// let e2 = Square::new(1, 4).unwrap();
///
/// assert!(check_legality(&board, Move::new(e2, Square::new(3, 4).unwrap())).is_ok());
///
/// let e5 = Square::new(4, 4).unwrap();
/// assert_eq!(
///     check_legality(&board, Move::new(e2, e5)),
///     Err(MoveError::IllegalMove { from: e2, to: e5, reason: IllegalReason::BadGeometry })
/// );
/// ```
pub fn check_legality(board: &Board, mv: Move) -> Result<(), MoveError> {
    let illegal = |reason| MoveError::IllegalMove {
        from: mv.from(),
        to: mv.to(),
        reason,
    };

    let piece = board
        .piece_at(mv.from())
        .ok_or(illegal(IllegalReason::NoPiece))?;

    if mv.is_castle() {
        if let Some(kind) = mv.promotion() {
            return Err(MoveError::InvalidPromotion { kind: Some(kind) });
        }

        check_castle(board, board.anchor_castle(mv)).map_err(illegal)?;
    } else {
        if board
            .piece_at(mv.to())
            .is_some_and(|target| target.color() == piece.color())
        {
            return Err(illegal(IllegalReason::FriendlyFire));
        }

        if !(RULES[piece.kind()].geometry)(board, mv, piece) {
            return Err(illegal(IllegalReason::BadGeometry));
        }

        check_promotion(mv, piece)?;
    }

    if board.with_move_made(mv)?.is_in_check(piece.color()) {
        return Err(illegal(IllegalReason::SelfCheck));
    }

    Ok(())
}

/// Returns `true` if `mv` can be played on `board`. See [`check_legality`].
#[inline(always)]
pub fn is_legal(board: &Board, mv: Move) -> bool {
    check_legality(board, mv).is_ok()
}

/// Pushes every legal move of the piece on `square` onto `moves`.
///
/// Castles are always generated king-anchored, and only from a rook if `castles_from_rook` is set.
fn generate_moves_into(
    board: &Board,
    square: Square,
    piece: Piece,
    castles_from_rook: bool,
    moves: &mut MoveList,
) {
    let mut push_if_legal = |mv| {
        if is_legal(board, mv) {
            moves.push(mv);
        }
    };

    let color = piece.color();
    let candidates = if piece.is_pawn() {
        let forward = color.forward();
        let pushes = [square.offset(forward, 0), square.offset(2 * forward, 0)]
            .into_iter()
            .flatten()
            .collect::<Bitboard>();
        pushes | pawn_attacks(board, square, color)
    } else {
        raw_attack_squares(board, square, piece)
    };

    for to in candidates {
        if piece.is_pawn() && to.row() == color.promotion_row() {
            for kind in PieceKind::PROMOTIONS {
                push_if_legal(Move::new_promotion(square, to, kind));
            }
        } else {
            push_if_legal(Move::new(square, to));
        }
    }

    if piece.is_king() && !piece.has_moved() {
        let row = square.row();
        for column in 0..8 {
            let rook_square = Square::new_unchecked(row, column);
            let unmoved_rook = board
                .piece_at(rook_square)
                .is_some_and(|rook| rook.is_rook() && rook.color() == color && !rook.has_moved());

            if unmoved_rook {
                if let Ok(castle) = Move::castling(square, rook_square) {
                    push_if_legal(castle);
                }
            }
        }
    } else if castles_from_rook && piece.is_rook() && !piece.has_moved() {
        let king_square = board
            .king_square(color)
            .filter(|king| king.row() == square.row());

        if let Some(king_square) = king_square {
            if let Ok(castle) = Move::castling(king_square, square) {
                push_if_legal(castle);
            }
        }
    }
}

/// Generates every legal move for the piece on `square`.
///
/// Returns an empty list if `square` is empty. For a king or an unmoved rook this includes castling,
/// always expressed with the king as the moving piece.
///
/// Moves are ordered by destination index, with promotions as knight, bishop, rook, queen, and castles last.
///
/// # Example
/// ```
/// # use arbiter::{generate_legal_moves, Board, Square};
/// let board = Board::new();
/// assert_eq!(generate_legal_moves(&board, Square::new(1, 4).unwrap()).len(), 2);
/// assert_eq!(generate_legal_moves(&board, Square::new(0, 1).unwrap()).len(), 2);
/// assert!(generate_legal_moves(&board, Square::new(0, 0).unwrap()).is_empty());
/// assert!(generate_legal_moves(&board, Square::new(4, 4).unwrap()).is_empty());
/// ```
pub fn generate_legal_moves(board: &Board, square: Square) -> MoveList {
    let mut moves = MoveList::new();

    if let Some(piece) = board.piece_at(square) {
        generate_moves_into(board, square, piece, true, &mut moves);
    }

    moves
}

/// Generates every legal move for `color`, scanning the board in row-major order.
///
/// Each castle appears once, from the king.
///
/// # Example
/// ```
/// # use arbiter::{generate_all_legal_moves, Board, Color};
/// let board = Board::new();
/// assert_eq!(generate_all_legal_moves(&board, Color::White).len(), 20);
/// assert_eq!(generate_all_legal_moves(&board, Color::Black).len(), 20);
/// ```
pub fn generate_all_legal_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();

    for (square, piece) in board.pieces().filter(|(_, piece)| piece.color() == color) {
        generate_moves_into(board, square, piece, false, &mut moves);
    }

    moves
}
