/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Sets of squares, used for attack queries.
mod bitboard;

/// The board: cells, king positions, and move history.
mod board;

/// Command-line arguments and shell commands.
mod cli;

/// Errors for rejected moves and invalid squares.
mod error;

/// Turn order and players.
mod game;

/// Per-piece movement rules, legality checking, and legal move generation.
mod movegen;

/// Move requests and committed move records.
mod moves;

/// Perft node counting over the legal move tree.
mod perft;

/// Pieces and piece kinds.
mod piece;

/// The interactive shell over a game.
mod shell;

/// Squares and colors.
mod square;

pub use bitboard::*;
pub use board::*;
pub use cli::*;
pub use error::*;
pub use game::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use shell::*;
pub use square::*;
