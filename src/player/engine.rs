use crate::core::{Board, Color};
use crate::player::{Engine, Player};
use std::time::Instant;
use tracing::debug;

/// Runs a synchronous engine behind the async [`Player`] contract.
pub struct EnginePlayer {
    color: Color,
    name: String,
    engine: Box<dyn Engine>,
}

impl EnginePlayer {
    pub fn new(color: Color, name: &str, engine: impl Engine + 'static) -> Self {
        Self {
            color,
            name: name.to_string(),
            engine: Box::new(engine),
        }
    }
}

#[async_trait::async_trait]
impl Player for EnginePlayer {
    async fn play(&mut self, board: Board) -> anyhow::Result<Board> {
        let started = Instant::now();
        let next = self.engine.play(board)?;
        debug!(
            "{} ({:?}) moved in {:.2}s",
            self.name,
            self.color,
            started.elapsed().as_secs_f64()
        );
        Ok(next)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Color {
        self.color
    }
}
