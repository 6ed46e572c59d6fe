pub mod host;
pub mod kifu;

pub use host::{GameHost, PlayerKind, PlayerSelection};
pub use kifu::{KifuData, KifuEntry, KifuRecorder};

use crate::core::{Board, Color};
use crate::display::{Frame, RenderSink};
use crate::error::GameError;
use crate::logic::{winner, RulesOracle};
use crate::player::Player;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(Color),
    Draw,
}

impl GameResult {
    /// 得点の少ない方が勝ち
    pub fn from_scores(scores: [u32; 2]) -> Self {
        match winner(scores[0], scores[1]) {
            Some(color) => GameResult::Win(color),
            None => GameResult::Draw,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::Win(color) => Some(color),
            GameResult::Draw => None,
        }
    }

    /// 画面表示用 ("Red wins!" など)
    pub fn announcement(self) -> String {
        match self {
            GameResult::Win(color) => format!("{} wins!", color.label()),
            GameResult::Draw => "draw!".to_string(),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameResult::Win(Color::First) => write!(f, "First wins"),
            GameResult::Win(Color::Second) => write!(f, "Second wins"),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub result: GameResult,
    /// [First, Second]
    pub scores: [u32; 2],
    pub board: Board,
    pub moves: usize,
    pub kifu: Option<KifuData>,
    pub kifu_path: Option<PathBuf>,
}

/// 1 局分の進行を持つ
pub struct GameSession {
    oracle: Arc<dyn RulesOracle>,
    board: Board,
    players: [Box<dyn Player>; 2],
    sink: Arc<dyn RenderSink>,
    stop: watch::Receiver<bool>,
    kifu: Option<KifuRecorder>,
}

impl GameSession {
    pub fn new(
        oracle: Arc<dyn RulesOracle>,
        board: Board,
        first: Box<dyn Player>,
        second: Box<dyn Player>,
        sink: Arc<dyn RenderSink>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        GameSession {
            oracle,
            board,
            players: [first, second],
            sink,
            stop,
            kifu: None,
        }
    }

    /// 指し手を棋譜に記録する
    pub fn with_kifu(mut self) -> Self {
        self.kifu = Some(KifuRecorder::new(
            self.board.width(),
            self.players[0].name(),
            self.players[1].name(),
        ));
        self
    }

    pub async fn run(self) -> anyhow::Result<GameOutcome> {
        let GameSession {
            oracle,
            mut board,
            mut players,
            sink,
            stop,
            mut kifu,
        } = self;
        let mut moves = 0;

        info!(
            "game start: {} vs {} on {}x{}",
            players[0].name(),
            players[1].name(),
            board.width(),
            board.width()
        );

        while !oracle.is_gameover(&board)? {
            let mut progressed = false;

            for color in Color::ALL {
                // 手番の途中で終局することもある
                if oracle.is_gameover(&board)? {
                    break;
                }
                if *stop.borrow() {
                    return Err(GameError::Stopped.into());
                }
                if !oracle.can_move(&board, color)? {
                    debug!("{:?} has no legal move, skipped", color);
                    continue;
                }

                let player = &mut players[color.index()];
                let status = format!("{}'s turn ({})", color.label(), player.name());
                sink.render(&Frame::board_only(&board, &status));

                let before = board.moves_played();
                board = player.play(board).await?;
                if board.moves_played() > before {
                    progressed = true;
                    moves += 1;
                    if let (Some(kifu), Some((mover, mv))) = (kifu.as_mut(), board.last_move()) {
                        kifu.record(mover, mv);
                    }
                }
            }

            if !progressed {
                warn!("no move was applied in a full round, ending the game");
                break;
            }
        }

        let scores = [
            oracle.score(&board, Color::First)?,
            oracle.score(&board, Color::Second)?,
        ];
        let result = GameResult::from_scores(scores);
        info!(
            "game over after {} moves: {} ({} - {})",
            moves, result, scores[0], scores[1]
        );

        let status = format!(
            "{} (Red {} - Blue {})",
            result.announcement(),
            scores[0],
            scores[1]
        );
        sink.render(&Frame::board_only(&board, &status));

        Ok(GameOutcome {
            result,
            scores,
            board,
            moves,
            kifu: kifu.map(|k| k.finish(&result.to_string(), scores)),
            kifu_path: None,
        })
    }
}
