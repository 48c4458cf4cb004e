/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, BufRead};

use anyhow::{bail, Context, Result};

use crate::{print_perft, Cli, Color, Game, Move, MoveList, ShellCommand, Square};

/// An interactive shell over a single [`Game`], reading one [`ShellCommand`] per line of `stdin`.
#[derive(Debug, Clone)]
pub struct Shell {
    game: Game,
}

impl Shell {
    /// Creates a new shell with a fresh game between the players named in `cli`.
    pub fn new(cli: &Cli) -> Self {
        Self {
            game: Game::new(cli.white.as_str(), cli.black.as_str()),
        }
    }

    /// The game being played in this shell.
    #[inline(always)]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Loops on input from `stdin` until `exit` is entered or input runs out.
    ///
    /// Commands that fail are reported on `stderr` and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let stdin = io::stdin();
        let mut buffer = String::new();

        loop {
            buffer.clear();
            let bytes = stdin
                .lock()
                .read_line(&mut buffer)
                .context("Failed to read line from stdin")?;

            // End of input
            if bytes == 0 {
                break;
            }

            if buffer.trim().is_empty() {
                continue;
            }

            let cmd = match buffer.parse::<ShellCommand>() {
                Ok(cmd) => cmd,
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };

            if cmd == ShellCommand::Exit {
                break;
            }

            if let Err(e) = self.execute(cmd) {
                eprintln!("Error: {e}");
            }
        }

        Ok(())
    }

    /// Executes a single command against the game.
    pub fn execute(&mut self, cmd: ShellCommand) -> Result<()> {
        match cmd {
            ShellCommand::Display => println!("{}", self.game),

            ShellCommand::Move {
                from_row,
                from_col,
                to_row,
                to_col,
                promote,
            } => {
                let from = Square::new(from_row, from_col)?;
                let to = Square::new(to_row, to_col)?;
                let mv = match promote {
                    Some(kind) => Move::new_promotion(from, to, kind),
                    None => Move::new(from, to),
                };

                self.request(mv)?;
            }

            ShellCommand::Castle {
                row,
                king_col,
                rook_col,
            } => {
                let king = Square::new(row, king_col)?;
                let rook = Square::new(row, rook_col)?;
                self.request(Move::castling(king, rook)?)?;
            }

            ShellCommand::Moves { row, col } => {
                let moves = match (row, col) {
                    (Some(row), Some(col)) => self.game.legal_moves_for(Square::new(row, col)?)?,
                    _ => self.game.legal_moves(),
                };
                println!("{}", format_moves(&moves));
            }

            ShellCommand::Check => {
                for color in Color::all() {
                    let status = if self.game.is_in_check(color) {
                        "in check"
                    } else {
                        "not in check"
                    };
                    println!("{}: {status}", self.game.player(color));
                }
            }

            ShellCommand::Last => match self.game.last_move() {
                Some(record) => println!("{record}"),
                None => println!("(none)"),
            },

            ShellCommand::History => {
                if self.game.history().is_empty() {
                    println!("(none)");
                }
                for (i, record) in self.game.history().iter().enumerate() {
                    println!("{:>3}. {record}", i + 1);
                }
            }

            ShellCommand::Undo => match self.game.undo() {
                Some(record) => println!("Took back: {record}"),
                None => bail!("There are no moves to take back"),
            },

            ShellCommand::Perft { depth } => {
                print_perft::<true, false>(&mut self.game, depth);
            }

            ShellCommand::Splitperft { depth } => {
                print_perft::<true, true>(&mut self.game, depth);
            }

            ShellCommand::Exit => {}
        }

        Ok(())
    }

    /// Requests `mv`, printing the committed move and any resulting check.
    fn request(&mut self, mv: Move) -> Result<()> {
        self.game
            .request_move(mv)
            .with_context(|| format!("Failed to play {mv}"))?;

        if let Some(record) = self.game.last_move() {
            println!("{record}");
        }

        let side = self.game.side_to_move();
        if self.game.is_in_check(side) {
            println!("{} is in check", self.game.player(side));
        }

        Ok(())
    }
}

/// Joins moves by comma-space, or `(none)` if there are none.
fn format_moves(moves: &MoveList) -> String {
    if moves.is_empty() {
        String::from("(none)")
    } else {
        moves
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell {
        Shell::new(&Cli {
            white: String::from("Alice"),
            black: String::from("Bob"),
        })
    }

    #[test]
    fn test_execute_moves_and_undo() {
        let mut shell = shell();
        shell
            .execute("move 1 4 3 4".parse().unwrap())
            .unwrap();
        assert_eq!(shell.game().side_to_move(), Color::Black);
        assert_eq!(shell.game().history().len(), 1);

        shell.execute(ShellCommand::Undo).unwrap();
        assert!(shell.game().history().is_empty());
        assert!(shell.execute(ShellCommand::Undo).is_err());
    }

    #[test]
    fn test_execute_reports_errors() {
        let mut shell = shell();
        assert!(shell.execute("move 1 4 4 4".parse().unwrap()).is_err());
        assert!(shell.execute("move 8 0 7 0".parse().unwrap()).is_err());
        assert!(shell.execute("castle 0 4 7".parse().unwrap()).is_err());
        assert!(shell.game().history().is_empty());
    }

    #[test]
    fn test_format_moves() {
        assert_eq!(format_moves(&MoveList::new()), "(none)");
    }
}
