pub mod ai;
pub mod controller;
pub mod engine;
pub mod human;

pub use ai::{NaiveMonteCarlo, RandomEngine, UctMonteCarlo};
pub use controller::{Engine, Player};
pub use engine::EnginePlayer;
pub use human::{input_queue, HumanPlayer, InputQueue};
