use rayon::prelude::*;

use crate::game::Game;

/// Count leaf nodes of the legal move tree, playing and taking back every
/// move on `game` itself.
pub fn run_perft_test(game: &mut Game, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.all_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for (from, to) in moves {
        if game.try_move(from, to).is_ok() {
            nodes += run_perft_test(game, depth - 1);
            game.undo_last_move();
        }
    }
    nodes
}

/// Same count as [`run_perft_test`], with the root moves split across
/// threads. Each thread works on its own copy of the game.
pub fn run_perft_parallel(game: &Game, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut root = game.clone();
    root.set_verbose(false);
    let moves = root.all_legal_moves();

    moves
        .par_iter()
        .map(|&(from, to)| {
            let mut game = root.clone();
            match game.try_move(from, to) {
                Ok(_) => run_perft_test(&mut game, depth - 1),
                Err(_) => 0,
            }
        })
        .sum()
}

/// Per root move node counts, sorted by move, for comparing against another
/// move generator.
pub fn perft_divide(game: &mut Game, depth: u8) -> Vec<(String, u64)> {
    let mut counts = vec![];
    if depth == 0 {
        return counts;
    }
    for (from, to) in game.all_legal_moves() {
        if game.try_move(from, to).is_ok() {
            counts.push((format!("{from}{to}"), run_perft_test(game, depth - 1)));
            game.undo_last_move();
        }
    }
    counts.sort();
    counts
}
