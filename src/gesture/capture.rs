use super::candidates::{candidates, CandidateSet};
use super::input::{GestureAction, InputAdapter, InputEvent, MissPolicy};
use crate::core::{Board, Color, Coord, Move};
use crate::logic::RulesOracle;
use tracing::{debug, warn};

/// 入力途中の手の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Empty,
    Partial1,
    Partial2,
    Ready,
    Done,
}

/// 入力途中の石 (最大 3 つ)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingGesture {
    stones: [Option<Coord>; 3],
}

impl PendingGesture {
    pub fn len(&self) -> usize {
        self.stones.iter().take_while(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.stones[0].is_none()
    }

    /// The filled prefix.
    pub fn filled(&self) -> Vec<Coord> {
        self.stones.iter().map_while(|s| *s).collect()
    }

    pub fn to_move(&self) -> Option<Move> {
        match self.stones {
            [Some(a), Some(b), Some(c)] => Some(Move::new(a, b, c)),
            _ => None,
        }
    }

    fn push(&mut self, pos: Coord) {
        if let Some(slot) = self.stones.iter_mut().find(|s| s.is_none()) {
            *slot = Some(pos);
        }
    }

    fn clear(&mut self) {
        self.stones = [None; 3];
    }
}

/// Result of feeding one event to a [`GestureCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Event ignored, or an invalid pick that the modality ignores.
    Unchanged,
    /// A stone was committed and the candidates narrowed.
    Narrowed,
    /// Render-only hint for the third stone.
    Preview(Coord),
    /// The gesture went back to empty.
    Cancelled,
    /// The oracle accepted the move; this is the new snapshot.
    Done(Board),
}

/// 1 手番ぶんの入力を受け付ける状態機械
///
/// Every pick is validated by narrowing the candidate set; a pick that
/// leaves nothing is never stored. The board is only touched once, when
/// the third stone lands and the oracle accepts the triple.
pub struct GestureCapture<'a> {
    oracle: &'a dyn RulesOracle,
    board: &'a Board,
    color: Color,
    adapter: &'a dyn InputAdapter,
    pending: PendingGesture,
    candidates: CandidateSet,
    phase: GesturePhase,
    preview: Option<Coord>,
}

impl<'a> GestureCapture<'a> {
    pub fn new(
        oracle: &'a dyn RulesOracle,
        board: &'a Board,
        color: Color,
        adapter: &'a dyn InputAdapter,
    ) -> anyhow::Result<Self> {
        let candidates = candidates(oracle, board, color)?;
        Ok(Self {
            oracle,
            board,
            color,
            adapter,
            pending: PendingGesture::default(),
            candidates,
            phase: GesturePhase::Empty,
            preview: None,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn pending(&self) -> &PendingGesture {
        &self.pending
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn preview(&self) -> Option<Coord> {
        self.preview
    }

    pub fn handle(&mut self, event: &InputEvent) -> anyhow::Result<Progress> {
        if self.phase == GesturePhase::Done {
            return Ok(Progress::Unchanged);
        }

        match self.adapter.interpret(self.phase, event) {
            GestureAction::Ignore => Ok(Progress::Unchanged),
            GestureAction::Cancel => self.cancel_progress(),
            GestureAction::Preview(pos) => {
                if self.candidates.filter(2, pos).is_empty() {
                    Ok(Progress::Unchanged)
                } else {
                    self.preview = Some(pos);
                    Ok(Progress::Preview(pos))
                }
            }
            GestureAction::Pick { pos, on_miss } => self.pick(pos, on_miss),
        }
    }

    /// 入力をリセットし、候補手を盤面から取り直す。
    /// Returns false when there was nothing to cancel.
    pub fn cancel(&mut self) -> anyhow::Result<bool> {
        if matches!(self.phase, GesturePhase::Empty | GesturePhase::Done) {
            return Ok(false);
        }

        self.pending.clear();
        self.preview = None;
        self.candidates = candidates(self.oracle, self.board, self.color)?;
        self.phase = GesturePhase::Empty;
        debug!("{:?}: gesture cancelled", self.color);
        Ok(true)
    }

    fn cancel_progress(&mut self) -> anyhow::Result<Progress> {
        if self.cancel()? {
            Ok(Progress::Cancelled)
        } else {
            Ok(Progress::Unchanged)
        }
    }

    fn pick(&mut self, pos: Coord, on_miss: MissPolicy) -> anyhow::Result<Progress> {
        let index = self.pending.len();
        let narrowed = self.candidates.filter(index, pos);

        if narrowed.is_empty() {
            debug!("{:?}: {} is not a candidate for stone {}", self.color, pos, index + 1);
            return match on_miss {
                MissPolicy::Ignore => Ok(Progress::Unchanged),
                MissPolicy::Cancel => self.cancel_progress(),
            };
        }

        self.pending.push(pos);
        self.candidates = narrowed;
        self.preview = None;
        self.phase = match index {
            0 => GesturePhase::Partial1,
            1 => GesturePhase::Partial2,
            _ => GesturePhase::Ready,
        };

        if self.phase == GesturePhase::Ready {
            self.submit()
        } else {
            Ok(Progress::Narrowed)
        }
    }

    fn submit(&mut self) -> anyhow::Result<Progress> {
        let Some(mv) = self.pending.to_move() else {
            return Ok(Progress::Unchanged);
        };

        let applied = self.oracle.apply_move_if_possible(
            self.board,
            mv.first,
            mv.second,
            mv.third,
            self.color,
        )?;

        match applied {
            Some(next) => {
                debug!("{:?}: gesture completed with {}", self.color, mv);
                self.pending.clear();
                self.phase = GesturePhase::Done;
                Ok(Progress::Done(next))
            }
            None => {
                warn!("{:?}: rules rejected {} after filtering", self.color, mv);
                self.cancel_progress()
            }
        }
    }
}
