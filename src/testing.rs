//! Test doubles shared by unit tests.

use crate::core::{Board, Color, Coord, Move};
use crate::display::{Frame, RenderSink};
use crate::logic::{RulesOracle, SeparoRules};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Wraps the real rules with knobs for the unhappy paths.
#[derive(Default)]
pub struct ScriptedOracle {
    pub inner: SeparoRules,
    /// Decline every complete move.
    pub reject_moves: bool,
    /// Error out on apply.
    pub fail_apply: bool,
    /// Colors that have no legal move.
    pub blocked: Vec<Color>,
    /// Fixed scores instead of region counts.
    pub scores: Option<[u32; 2]>,
    /// Never report gameover.
    pub never_over: bool,
    /// Report gameover once this many moves have been played.
    pub over_after: Option<usize>,
    pub apply_calls: AtomicUsize,
}

impl RulesOracle for ScriptedOracle {
    fn can_move(&self, board: &Board, color: Color) -> anyhow::Result<bool> {
        if self.blocked.contains(&color) {
            return Ok(false);
        }
        self.inner.can_move(board, color)
    }

    fn is_gameover(&self, board: &Board) -> anyhow::Result<bool> {
        if self.never_over {
            return Ok(false);
        }
        if self.over_after.is_some_and(|n| board.moves_played() >= n) {
            return Ok(true);
        }
        Ok(!self.can_move(board, Color::First)? && !self.can_move(board, Color::Second)?)
    }

    fn candidates(&self, board: &Board, color: Color) -> anyhow::Result<Vec<Move>> {
        if self.blocked.contains(&color) {
            return Ok(Vec::new());
        }
        self.inner.candidates(board, color)
    }

    fn apply_move_if_possible(
        &self,
        board: &Board,
        p1: Coord,
        p2: Coord,
        p3: Coord,
        color: Color,
    ) -> anyhow::Result<Option<Board>> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_apply {
            anyhow::bail!("rules engine crashed");
        }
        if self.reject_moves {
            return Ok(None);
        }
        self.inner.apply_move_if_possible(board, p1, p2, p3, color)
    }

    fn score(&self, board: &Board, color: Color) -> anyhow::Result<u32> {
        match self.scores {
            Some(scores) => Ok(scores[color.index()]),
            None => self.inner.score(board, color),
        }
    }
}

/// Keeps every status line it was asked to draw.
#[derive(Default)]
pub struct RecordingSink {
    pub statuses: Mutex<Vec<String>>,
    pub pending: Mutex<Vec<Vec<Coord>>>,
}

impl RenderSink for RecordingSink {
    fn render(&self, frame: &Frame<'_>) {
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.push(frame.status.to_string());
        }
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(frame.pending.to_vec());
        }
    }
}
