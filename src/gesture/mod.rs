//! Turning pointer or touch input into a three-stone move.

pub mod candidates;
pub mod capture;
pub mod input;

pub use candidates::{candidates, CandidateSet};
pub use capture::{GestureCapture, GesturePhase, PendingGesture, Progress};
pub use input::{
    GestureAction, InputAdapter, InputEvent, InputModality, MissPolicy, PointerAdapter, TapAdapter,
};
