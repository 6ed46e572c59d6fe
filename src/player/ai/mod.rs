pub mod naive_mc;
pub mod random;
pub mod uct;

pub use naive_mc::NaiveMonteCarlo;
pub use random::RandomEngine;
pub use uct::UctMonteCarlo;

use crate::core::{Board, Color, Move};
use crate::logic::{winner, RulesOracle};
use rand::seq::SliceRandom;
use rand::Rng;

/// Plays random moves from `board` (with `to_move` to play) until neither
/// side can move, then judges the final position.
pub(crate) fn playout<R: Rng>(
    oracle: &dyn RulesOracle,
    board: &Board,
    to_move: Color,
    rng: &mut R,
) -> anyhow::Result<Option<Color>> {
    let mut board = board.clone();
    let mut color = to_move;
    let mut passes = 0;

    // 両者とも打てなくなるまで
    while passes < 2 {
        let moves = oracle.candidates(&board, color)?;
        match moves.choose(rng) {
            Some(mv) => {
                passes = 0;
                board = apply(oracle, &board, mv, color)?;
            }
            None => passes += 1,
        }
        color = color.opponent();
    }

    let first = oracle.score(&board, Color::First)?;
    let second = oracle.score(&board, Color::Second)?;
    Ok(winner(first, second))
}

/// Applies `mv` through the oracle, treating a decline as an error.
pub(crate) fn apply(
    oracle: &dyn RulesOracle,
    board: &Board,
    mv: &Move,
    color: Color,
) -> anyhow::Result<Board> {
    oracle
        .apply_move_if_possible(board, mv.first, mv.second, mv.third, color)?
        .ok_or_else(|| anyhow::anyhow!("oracle declined its own candidate {}", mv))
}
