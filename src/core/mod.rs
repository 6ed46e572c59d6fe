pub mod board;
pub mod graph;
pub mod r#move;
pub mod types;

pub use board::{Board, Cell};
pub use r#move::Move;
pub use types::{Color, Coord, Dir};
