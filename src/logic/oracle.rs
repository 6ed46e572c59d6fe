//! The authoritative rules engine as seen by the rest of the crate.
//!
//! Gesture capture, players and the turn loop only ever talk to
//! [`RulesOracle`]; they never inspect legality themselves.

use crate::core::{Board, Color, Coord, Move};

pub trait RulesOracle: Send + Sync {
    fn can_move(&self, board: &Board, color: Color) -> anyhow::Result<bool>;

    fn is_gameover(&self, board: &Board) -> anyhow::Result<bool>;

    /// Every legal move for `color` on `board`.
    fn candidates(&self, board: &Board, color: Color) -> anyhow::Result<Vec<Move>>;

    /// Applies `p1 -> p2 -> p3` if it is legal. `Some` carries the new
    /// snapshot; `None` means the move was declined and nothing changed.
    fn apply_move_if_possible(
        &self,
        board: &Board,
        p1: Coord,
        p2: Coord,
        p3: Coord,
        color: Color,
    ) -> anyhow::Result<Option<Board>>;

    fn score(&self, board: &Board, color: Color) -> anyhow::Result<u32>;
}

/// Separo のルール
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparoRules;

impl SeparoRules {
    pub fn new() -> Self {
        SeparoRules
    }
}

impl RulesOracle for SeparoRules {
    fn can_move(&self, board: &Board, color: Color) -> anyhow::Result<bool> {
        Ok(super::can_move(board, color))
    }

    fn is_gameover(&self, board: &Board) -> anyhow::Result<bool> {
        Ok(super::is_gameover(board))
    }

    fn candidates(&self, board: &Board, color: Color) -> anyhow::Result<Vec<Move>> {
        Ok(super::legal_moves(board, color))
    }

    fn apply_move_if_possible(
        &self,
        board: &Board,
        p1: Coord,
        p2: Coord,
        p3: Coord,
        color: Color,
    ) -> anyhow::Result<Option<Board>> {
        let mv = Move::new(p1, p2, p3);
        if super::is_legal(board, &mv, color) {
            Ok(Some(super::apply_move(board, &mv, color)))
        } else {
            Ok(None)
        }
    }

    fn score(&self, board: &Board, color: Color) -> anyhow::Result<u32> {
        Ok(board.region_count(color))
    }
}
