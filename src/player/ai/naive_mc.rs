use crate::core::{Board, Color, Move};
use crate::logic::RulesOracle;
use crate::player::Engine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// 候補手ごとのプレイアウト集計
struct Slot {
    mv: Move,
    next: Board,
    rng: StdRng,
    wins: u32,
    plays: u32,
}

/// 原始モンテカルロ
///
/// Every candidate gets the same number of random playouts; the one with the
/// most wins is played. Playouts run in parallel across candidates.
pub struct NaiveMonteCarlo {
    color: Color,
    oracle: Arc<dyn RulesOracle>,
    rng: StdRng,
    time_limit: Duration,
}

impl NaiveMonteCarlo {
    pub fn new(color: Color, oracle: Arc<dyn RulesOracle>, time_limit: Duration) -> Self {
        Self::with_rng(color, oracle, time_limit, StdRng::from_entropy())
    }

    pub fn with_rng(
        color: Color,
        oracle: Arc<dyn RulesOracle>,
        time_limit: Duration,
        rng: StdRng,
    ) -> Self {
        NaiveMonteCarlo {
            color,
            oracle,
            rng,
            time_limit,
        }
    }
}

impl Engine for NaiveMonteCarlo {
    fn play(&mut self, board: Board) -> anyhow::Result<Board> {
        let oracle = self.oracle.as_ref();
        let moves = oracle.candidates(&board, self.color)?;
        if moves.len() <= 1 {
            return match moves.first() {
                Some(mv) => super::apply(oracle, &board, mv, self.color),
                None => Ok(board),
            };
        }

        let mut slots = moves
            .into_iter()
            .map(|mv| {
                Ok(Slot {
                    next: super::apply(oracle, &board, &mv, self.color)?,
                    mv,
                    rng: StdRng::seed_from_u64(self.rng.gen()),
                    wins: 0,
                    plays: 0,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let color = self.color;
        let started = Instant::now();
        // 最低 1 回は全候補をプレイアウトする
        loop {
            slots.par_iter_mut().try_for_each(|slot| -> anyhow::Result<()> {
                let result = super::playout(oracle, &slot.next, color.opponent(), &mut slot.rng)?;
                slot.plays += 1;
                if result == Some(color) {
                    slot.wins += 1;
                }
                Ok(())
            })?;
            if started.elapsed() >= self.time_limit {
                break;
            }
        }

        let mut best = 0;
        for (i, slot) in slots.iter().enumerate() {
            if slot.wins > slots[best].wins {
                best = i;
            }
        }
        let chosen = slots.swap_remove(best);
        info!(
            "naive-mc ({:?}): {} win rate {:.1}% over {} playouts",
            color,
            chosen.mv,
            chosen.wins as f64 / chosen.plays as f64 * 100.0,
            chosen.plays
        );
        Ok(chosen.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::SeparoRules;

    #[test]
    fn test_naive_mc_plays_a_legal_move_within_budget() {
        let oracle: Arc<dyn RulesOracle> = Arc::new(SeparoRules::new());
        let mut engine = NaiveMonteCarlo::with_rng(
            Color::First,
            oracle.clone(),
            Duration::ZERO,
            StdRng::seed_from_u64(1),
        );
        let board = Board::new(5).unwrap();
        let legal = oracle.candidates(&board, Color::First).unwrap();

        let next = engine.play(board).unwrap();
        let (color, mv) = next.last_move().unwrap();
        assert_eq!(color, Color::First);
        assert!(legal.contains(&mv));
        assert_eq!(next.moves_played(), 1);
    }
}
