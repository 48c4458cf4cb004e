/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use crate::PieceKind;
use clap::{builder::PossibleValue, Parser, ValueEnum};

/// Command-line arguments for the `arbiter` shell.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name of the player with the White pieces.
    #[arg(short, long, default_value = "White")]
    pub white: String,

    /// Name of the player with the Black pieces.
    #[arg(short, long, default_value = "Black")]
    pub black: String,
}

/// A command entered at the shell prompt.
///
/// Squares are given as a row and a column, each in `[0, 7]`, with row 0 being White's home row.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND>")
)]
pub enum ShellCommand {
    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Request a move, if it is legal and it is that piece's turn.
    #[command(alias = "m")]
    Move {
        from_row: i8,
        from_col: i8,
        to_row: i8,
        to_col: i8,

        /// The piece to promote to, if this pawn move reaches the last row.
        #[arg(short, long)]
        promote: Option<PieceKind>,
    },

    /// Castle the king on the provided row and column with the rook in the provided column.
    Castle { row: i8, king_col: i8, rook_col: i8 },

    /// Shows all legal moves for the side to move, or for the piece on a specific square.
    Moves {
        #[arg(requires = "col")]
        row: Option<i8>,
        col: Option<i8>,
    },

    /// Report whether either king is in check.
    Check,

    /// Print the most recent move.
    Last,

    /// Print every move played so far.
    History,

    /// Take back the most recent move.
    Undo,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Quit the shell.
    #[command(aliases = ["quit", "q"])]
    Exit,
}

impl FromStr for ShellCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`ShellCommand`] from a line of input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

impl ValueEnum for PieceKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::Pawn,
            PieceKind::King,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        // Accept either the full name or the piece's letter
        let letter = match self {
            PieceKind::Pawn => "p",
            PieceKind::Knight => "n",
            PieceKind::Bishop => "b",
            PieceKind::Rook => "r",
            PieceKind::Queen => "q",
            PieceKind::King => "k",
        };
        Some(PossibleValue::new(self.name()).alias(letter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cmd = "move 6 0 7 0 --promote q".parse::<ShellCommand>().unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Move {
                from_row: 6,
                from_col: 0,
                to_row: 7,
                to_col: 0,
                promote: Some(PieceKind::Queen),
            }
        );

        let cmd = "m 1 4 3 4".parse::<ShellCommand>().unwrap();
        assert!(matches!(cmd, ShellCommand::Move { promote: None, .. }));
    }

    #[test]
    fn test_parse_others() {
        assert_eq!("d".parse::<ShellCommand>().unwrap(), ShellCommand::Display);
        assert_eq!(
            "moves".parse::<ShellCommand>().unwrap(),
            ShellCommand::Moves {
                row: None,
                col: None
            }
        );
        assert_eq!(
            "splitperft 3".parse::<ShellCommand>().unwrap(),
            ShellCommand::Splitperft { depth: 3 }
        );
        assert!("moves 1".parse::<ShellCommand>().is_err());
        assert!("dance".parse::<ShellCommand>().is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["arbiter", "--white", "Alice"]);
        assert_eq!(cli.white, "Alice");
        assert_eq!(cli.black, "Black");
    }
}
