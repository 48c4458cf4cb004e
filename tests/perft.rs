/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arbiter::{perft, perft_generic, Board, Color, Game, Piece, PieceKind, Square};

/// Sets up a game from the placement, side-to-move, and castling fields of a FEN string.
///
/// Pawns off their starting row, and kings and rooks without a matching castling right, are marked as moved.
fn game_from_fen(fen: &str) -> Game {
    let mut fields = fen.split_ascii_whitespace();
    let placement = fields.next().unwrap();
    let side_to_move = match fields.next().unwrap() {
        "w" => Color::White,
        _ => Color::Black,
    };
    let castling = fields.next().unwrap_or("-");

    let mut board = Board::empty();
    for (i, rank) in placement.split('/').enumerate() {
        let row = 7 - i as u8;
        let mut column = 0;

        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                column += skip as u8;
                continue;
            }

            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let kind = c.to_string().parse::<PieceKind>().unwrap();
            let on_home_row = row == color.home_row();

            let right = |side: char| {
                let right = if color.is_white() {
                    side.to_ascii_uppercase()
                } else {
                    side
                };
                castling.contains(right)
            };

            let unmoved = match kind {
                PieceKind::Pawn => row == color.pawn_row(),
                PieceKind::King => on_home_row && column == 4 && (right('k') || right('q')),
                PieceKind::Rook => {
                    on_home_row && ((column == 7 && right('k')) || (column == 0 && right('q')))
                }
                _ => true,
            };

            let piece = Piece::new(color, kind);
            let square = Square::new(row as i8, column as i8).unwrap();
            board.place(square, if unmoved { piece } else { piece.with_moved() });
            column += 1;
        }
    }

    Game::from_board(board, side_to_move)
}

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let mut game = game_from_fen(fen);
    let before = game.clone();

    let res = perft(&mut game, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");
    assert_eq!(game, before, "PERFT({depth}) did not restore {fen}");
}

#[test]
fn test_startpos_matches_fen() {
    let from_fen = game_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(from_fen, Game::from_board(Board::new(), Color::White));
}

#[test]
fn test_bulk_and_full_counting_agree() {
    let mut game = Game::default();
    assert_eq!(
        perft_generic::<true, false>(&mut game, 3),
        perft_generic::<false, false>(&mut game, 3)
    );
}

#[cfg(test)]
mod startpos_perft {
    use super::*;

    #[test]
    fn test_startpos_perft_1() {
        assert_eq!(perft(&mut Game::default(), 1), 20);
    }
    #[test]
    fn test_startpos_perft_2() {
        assert_eq!(perft(&mut Game::default(), 2), 400);
    }
    #[test]
    fn test_startpos_perft_3() {
        assert_eq!(perft(&mut Game::default(), 3), 8902);
    }
    #[test]
    fn test_startpos_perft_4() {
        assert_eq!(perft(&mut Game::default(), 4), 197281);
    }
    #[test]
    #[ignore = "slow"]
    fn test_startpos_perft_5() {
        assert_eq!(perft(&mut Game::default(), 5), 4865609);
    }
}

#[cfg(test)]
mod kiwipete_perft {
    use crate::test_perft_fen_nodes;

    // Deeper counts assume a king may castle after escaping an earlier check, which these rules forbid
    const FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn test_kiwipete_perft_1() {
        test_perft_fen_nodes(1, FEN, 48);
    }
    #[test]
    fn test_kiwipete_perft_2() {
        test_perft_fen_nodes(2, FEN, 2039);
    }
    #[test]
    fn test_kiwipete_perft_3() {
        test_perft_fen_nodes(3, FEN, 97862);
    }
}

#[cfg(test)]
mod position_3_perft {
    use crate::test_perft_fen_nodes;

    const FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn test_position_3_perft_1() {
        test_perft_fen_nodes(1, FEN, 14);
    }
    #[test]
    fn test_position_3_perft_2() {
        test_perft_fen_nodes(2, FEN, 191);
    }
    #[test]
    fn test_position_3_perft_3() {
        test_perft_fen_nodes(3, FEN, 2812);
    }
    #[test]
    fn test_position_3_perft_4() {
        test_perft_fen_nodes(4, FEN, 43238);
    }
}

#[cfg(test)]
mod promotion_perft {
    use crate::test_perft_fen_nodes;

    const FEN: &str = "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1";

    #[test]
    fn test_promotion_perft_1() {
        test_perft_fen_nodes(1, FEN, 24);
    }
    #[test]
    fn test_promotion_perft_2() {
        test_perft_fen_nodes(2, FEN, 496);
    }
    #[test]
    fn test_promotion_perft_3() {
        test_perft_fen_nodes(3, FEN, 9483);
    }
    #[test]
    #[ignore = "slow"]
    fn test_promotion_perft_4() {
        test_perft_fen_nodes(4, FEN, 182838);
    }
}
