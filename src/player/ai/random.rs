use crate::core::{Board, Color};
use crate::logic::RulesOracle;
use crate::player::Engine;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// 合法手からランダムに選ぶ
pub struct RandomEngine {
    color: Color,
    oracle: Arc<dyn RulesOracle>,
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(color: Color, oracle: Arc<dyn RulesOracle>) -> Self {
        Self::with_rng(color, oracle, StdRng::from_entropy())
    }

    pub fn with_rng(color: Color, oracle: Arc<dyn RulesOracle>, rng: StdRng) -> Self {
        RandomEngine { color, oracle, rng }
    }
}

impl Engine for RandomEngine {
    fn play(&mut self, board: Board) -> anyhow::Result<Board> {
        let moves = self.oracle.candidates(&board, self.color)?;
        match moves.choose(&mut self.rng) {
            Some(mv) => super::apply(self.oracle.as_ref(), &board, mv, self.color),
            None => Ok(board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::SeparoRules;

    #[test]
    fn test_random_engine_plays_a_legal_move() {
        let oracle: Arc<dyn RulesOracle> = Arc::new(SeparoRules::new());
        let mut engine =
            RandomEngine::with_rng(Color::Second, oracle.clone(), StdRng::seed_from_u64(7));
        let board = Board::new(7).unwrap();
        let legal = oracle.candidates(&board, Color::Second).unwrap();

        let next = engine.play(board).unwrap();
        let (color, mv) = next.last_move().unwrap();
        assert_eq!(color, Color::Second);
        assert!(legal.contains(&mv));
    }
}
