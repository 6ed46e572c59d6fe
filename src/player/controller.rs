use crate::core::{Board, Color};

/// プレイヤー共通の trait
///
/// `play` receives the current snapshot by value and returns the next one.
/// It may suspend (human input) or return immediately (engines).
#[async_trait::async_trait]
pub trait Player: Send {
    async fn play(&mut self, board: Board) -> anyhow::Result<Board>;
    fn name(&self) -> &str;
    fn color(&self) -> Color;
}

/// 同期的に次の盤面を決める思考エンジン
pub trait Engine: Send {
    /// Returns `board` unchanged when there is no legal move.
    fn play(&mut self, board: Board) -> anyhow::Result<Board>;
}
