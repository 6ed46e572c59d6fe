use crate::core::{Board, Color};
use crate::display::{Frame, RenderSink};
use crate::error::GameError;
use crate::gesture::{GestureCapture, InputAdapter, InputEvent, Progress};
use crate::logic::RulesOracle;
use crate::player::Player;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info};

/// 入力イベントの共有キュー (人間プレイヤー同士で共有)
pub type InputQueue = Arc<Mutex<mpsc::UnboundedReceiver<InputEvent>>>;

pub fn input_queue(rx: mpsc::UnboundedReceiver<InputEvent>) -> InputQueue {
    Arc::new(Mutex::new(rx))
}

/// 入力操作で手を決めるプレイヤー
pub struct HumanPlayer {
    color: Color,
    name: String,
    oracle: Arc<dyn RulesOracle>,
    adapter: Box<dyn InputAdapter>,
    input: InputQueue,
    sink: Arc<dyn RenderSink>,
    stop: watch::Receiver<bool>,
}

impl HumanPlayer {
    pub fn new(
        color: Color,
        name: &str,
        oracle: Arc<dyn RulesOracle>,
        adapter: Box<dyn InputAdapter>,
        input: InputQueue,
        sink: Arc<dyn RenderSink>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            color,
            name: name.to_string(),
            oracle,
            adapter,
            input,
            sink,
            stop,
        }
    }
}

fn draw(sink: &dyn RenderSink, board: &Board, capture: &GestureCapture<'_>, status: &str) {
    let pending = capture.pending().filled();
    sink.render(&Frame {
        board,
        pending: &pending,
        preview: capture.preview(),
        status,
    });
}

#[async_trait::async_trait]
impl Player for HumanPlayer {
    async fn play(&mut self, board: Board) -> anyhow::Result<Board> {
        if !self.oracle.can_move(&board, self.color)? {
            debug!("{:?} has no legal move", self.color);
            return Ok(board);
        }
        if *self.stop.borrow() {
            return Err(GameError::Stopped.into());
        }

        let queue = Arc::clone(&self.input);
        let mut input = queue.lock().await;
        // 前の手番中に溜まった入力は捨てる
        while input.try_recv().is_ok() {}

        let oracle = Arc::clone(&self.oracle);
        let sink = Arc::clone(&self.sink);
        let status = format!("{}'s turn ({})", self.color.label(), self.name);
        let mut capture =
            GestureCapture::new(oracle.as_ref(), &board, self.color, self.adapter.as_ref())?;
        draw(sink.as_ref(), &board, &capture, &status);

        loop {
            let event = tokio::select! {
                biased;
                changed = self.stop.changed() => {
                    if changed.is_err() || *self.stop.borrow() {
                        return Err(GameError::Stopped.into());
                    }
                    continue;
                }
                event = input.recv() => match event {
                    Some(event) => event,
                    None => return Err(GameError::InputClosed.into()),
                },
            };

            match capture.handle(&event)? {
                Progress::Done(next) => {
                    if let Some((_, mv)) = next.last_move() {
                        info!("{} ({:?}) played {}", self.name, self.color, mv);
                    }
                    return Ok(next);
                }
                Progress::Unchanged => {}
                _ => draw(sink.as_ref(), &board, &capture, &status),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Color {
        self.color
    }
}
