use crate::core::{Board, Color, Coord, Move};
use crate::logic::RulesOracle;

/// 候補手の集合 (読み取り専用)
///
/// Only ever built from the oracle or narrowed by [`CandidateSet::filter`];
/// never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    moves: Vec<Move>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.moves.contains(mv)
    }

    /// Moves whose stone at `index` is `pos`. Empty for `index > 2`.
    pub fn filter(&self, index: usize, pos: Coord) -> CandidateSet {
        CandidateSet {
            moves: self
                .moves
                .iter()
                .filter(|m| m.at(index) == Some(pos))
                .copied()
                .collect(),
        }
    }

    /// Whether `prefix` is the beginning of at least one candidate.
    pub fn has_prefix(&self, prefix: &[Coord]) -> bool {
        self.moves
            .iter()
            .any(|m| prefix.iter().enumerate().all(|(i, &c)| m.at(i) == Some(c)))
    }
}

impl From<Vec<Move>> for CandidateSet {
    fn from(moves: Vec<Move>) -> Self {
        CandidateSet { moves }
    }
}

/// 盤面と手番から候補手を取り出す
pub fn candidates(
    oracle: &dyn RulesOracle,
    board: &Board,
    color: Color,
) -> anyhow::Result<CandidateSet> {
    Ok(CandidateSet::from(oracle.candidates(board, color)?))
}
