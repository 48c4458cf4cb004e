/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use crate::Game;

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// Moves are made and taken back on `game`, which is left as it was found.
///
/// # Example
/// ```
/// # use arbiter::{perft, Game};
/// let mut game = Game::default();
/// assert_eq!(perft(&mut game, 2), 400);
/// assert_eq!(game, Game::default());
/// ```
#[inline(always)]
pub fn perft(game: &mut Game, depth: usize) -> u64 {
    perft_generic::<true, false>(game, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each move available at the root node.
#[inline(always)]
pub fn splitperft(game: &mut Game, depth: usize) -> u64 {
    perft_generic::<true, true>(game, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(game: &mut Game, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return game.legal_moves().len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mv in game.legal_moves() {
        // Generated moves are legal, so this only fails if the board is inconsistent
        let made = game.make_move_unchecked(mv);
        debug_assert!(made.is_ok(), "generated move {mv} could not be made: {made:?}");
        if made.is_err() {
            continue;
        }

        let new_nodes = perft_generic::<BULK, false>(game, depth - 1);
        game.undo();

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes += new_nodes;
    }

    nodes
}

/// Runs a perft and prints the node count, elapsed time, and nodes per second.
pub fn print_perft<const BULK: bool, const SPLIT: bool>(game: &mut Game, depth: usize) -> u64 {
    let now = Instant::now();
    let nodes = perft_generic::<BULK, SPLIT>(game, depth);
    let elapsed = now.elapsed();

    let nps = nodes as f64 / elapsed.as_secs_f64();
    println!("\nNodes searched: {nodes}");
    println!("Time: {elapsed:.1?}");
    println!("NPS: {nps:.0}");

    nodes
}
