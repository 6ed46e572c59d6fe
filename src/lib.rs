//! Separo: gesture-driven move input and turn control for a two-player
//! root-placing board game.

pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod game;
pub mod gesture;
pub mod logic;
pub mod player;
pub mod selfplay;

#[cfg(test)]
mod session_tests;
#[cfg(test)]
mod testing;
