//! Input events and the two modality policies that interpret them.
//!
//! Pointer devices (mouse) build a move with press, drag and release. Tap
//! devices (touch) place one stone per tap. The policies differ on what an
//! invalid pick means: a drag over a bad point is ignored, a bad tap cancels.

use super::capture::GesturePhase;
use crate::core::Coord;
use serde::{Deserialize, Serialize};

/// 入力イベント (座標は盤面座標に変換済み)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown(Coord),
    PointerMove(Coord),
    PointerUp(Coord),
    PointerLeave,
    Tap(Coord),
    /// 外部からのキャンセル (Esc など)
    Cancel,
}

/// What to do when a pick does not match any candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    Ignore,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Ignore,
    /// Try to commit `pos` into the next empty slot.
    Pick { pos: Coord, on_miss: MissPolicy },
    /// Show `pos` as the third stone without committing it.
    Preview(Coord),
    Cancel,
}

pub trait InputAdapter: Send + Sync {
    fn interpret(&self, phase: GesturePhase, event: &InputEvent) -> GestureAction;
}

/// マウス操作: 押して 1 つ目、ドラッグで 2 つ目、離して 3 つ目
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerAdapter;

impl InputAdapter for PointerAdapter {
    fn interpret(&self, phase: GesturePhase, event: &InputEvent) -> GestureAction {
        use GesturePhase::*;

        match (*event, phase) {
            (InputEvent::PointerDown(pos), Empty) => GestureAction::Pick {
                pos,
                on_miss: MissPolicy::Ignore,
            },
            (InputEvent::PointerMove(pos), Partial1) => GestureAction::Pick {
                pos,
                on_miss: MissPolicy::Ignore,
            },
            (InputEvent::PointerMove(pos), Partial2) => GestureAction::Preview(pos),
            // released before the second stone was chosen
            (InputEvent::PointerUp(_), Empty | Partial1) => GestureAction::Cancel,
            (InputEvent::PointerUp(pos), Partial2) => GestureAction::Pick {
                pos,
                on_miss: MissPolicy::Cancel,
            },
            (InputEvent::PointerLeave | InputEvent::Cancel, _) => GestureAction::Cancel,
            _ => GestureAction::Ignore,
        }
    }
}

/// タッチ操作: 1 タップで 1 石。外れたタップは即キャンセル
#[derive(Debug, Clone, Copy, Default)]
pub struct TapAdapter;

impl InputAdapter for TapAdapter {
    fn interpret(&self, phase: GesturePhase, event: &InputEvent) -> GestureAction {
        use GesturePhase::*;

        match (*event, phase) {
            (InputEvent::Tap(pos), Empty | Partial1 | Partial2) => GestureAction::Pick {
                pos,
                on_miss: MissPolicy::Cancel,
            },
            (InputEvent::PointerLeave | InputEvent::Cancel, _) => GestureAction::Cancel,
            _ => GestureAction::Ignore,
        }
    }
}

/// Which adapter a human player uses. Chosen once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModality {
    #[default]
    Pointer,
    Tap,
}

impl InputModality {
    pub fn adapter(self) -> Box<dyn InputAdapter> {
        match self {
            InputModality::Pointer => Box::new(PointerAdapter),
            InputModality::Tap => Box::new(TapAdapter),
        }
    }
}
