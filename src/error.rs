//! Errors that callers are expected to match on.
//!
//! Everything else (oracle failures, I/O) travels as plain `anyhow::Error`.

use derive_more::{Display, Error};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Board width outside 4..=19.
    #[display("board width {width} is out of range (4..=19)")]
    InvalidBoardSize { width: usize },

    /// `GameHost::run` was called while another run was active.
    #[display("a game is already running")]
    AlreadyRunning,

    /// The host raised the stop signal.
    #[display("game stopped")]
    Stopped,

    /// Input queue closed while a human turn was waiting on it.
    #[display("input channel closed")]
    InputClosed,

    #[display("unknown player kind: {name}")]
    UnknownPlayerKind { name: String },
}

/// True when `err` is (or wraps) [`GameError::Stopped`].
pub fn is_stopped(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<GameError>(), Some(GameError::Stopped))
}
