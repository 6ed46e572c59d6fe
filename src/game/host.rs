use crate::config::GameConfig;
use crate::core::{Board, Color};
use crate::display::RenderSink;
use crate::error::GameError;
use crate::game::{GameOutcome, GameSession};
use crate::logic::RulesOracle;
use crate::player::{
    EnginePlayer, HumanPlayer, InputQueue, NaiveMonteCarlo, Player, RandomEngine, UctMonteCarlo,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerKind {
    Human,
    Random,
    NaiveMc,
    UctMc,
}

impl PlayerKind {
    pub const ALL: [PlayerKind; 4] = [
        PlayerKind::Human,
        PlayerKind::Random,
        PlayerKind::NaiveMc,
        PlayerKind::UctMc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlayerKind::Human => "Human",
            PlayerKind::Random => "Random",
            PlayerKind::NaiveMc => "Naive MC",
            PlayerKind::UctMc => "UCT MC",
        }
    }
}

impl FromStr for PlayerKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(PlayerKind::Human),
            "random" => Ok(PlayerKind::Random),
            "naive-mc" => Ok(PlayerKind::NaiveMc),
            "uct-mc" => Ok(PlayerKind::UctMc),
            _ => Err(GameError::UnknownPlayerKind {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSelection {
    pub first: PlayerKind,
    pub second: PlayerKind,
}

impl PlayerSelection {
    pub fn get(&self, color: Color) -> PlayerKind {
        match color {
            Color::First => self.first,
            Color::Second => self.second,
        }
    }
}

/// 実行中フラグを握るガード (Drop で解放)
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, GameError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| GameError::AlreadyRunning)?;
        Ok(RunGuard(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Starts games. Every `run` gets a fresh board and fresh players; only one
/// may be active at a time.
pub struct GameHost {
    config: GameConfig,
    oracle: Arc<dyn RulesOracle>,
    sink: Arc<dyn RenderSink>,
    input: Option<InputQueue>,
    stop: watch::Receiver<bool>,
    running: AtomicBool,
}

impl GameHost {
    pub fn new(
        config: GameConfig,
        oracle: Arc<dyn RulesOracle>,
        sink: Arc<dyn RenderSink>,
        stop: watch::Receiver<bool>,
    ) -> Self {
        GameHost {
            config,
            oracle,
            sink,
            input: None,
            stop,
            running: AtomicBool::new(false),
        }
    }

    /// 人間プレイヤー用の入力キューを渡す
    pub fn with_input(mut self, input: InputQueue) -> Self {
        self.input = Some(input);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn run(&self, selection: PlayerSelection) -> anyhow::Result<GameOutcome> {
        let _guard = RunGuard::acquire(&self.running)?;
        self.config.validate()?;

        let board = Board::new(self.config.board_size)?;
        let first = self.build_player(Color::First, selection.first)?;
        let second = self.build_player(Color::Second, selection.second)?;

        let mut session = GameSession::new(
            Arc::clone(&self.oracle),
            board,
            first,
            second,
            Arc::clone(&self.sink),
            self.stop.clone(),
        );
        if self.config.save_kifu {
            session = session.with_kifu();
        }

        let mut outcome = session.run().await?;
        if let Some(kifu) = &outcome.kifu {
            let path = kifu.save(&self.config.kifu_dir)?;
            info!("kifu saved to {}", path.display());
            outcome.kifu_path = Some(path);
        }
        Ok(outcome)
    }

    fn build_player(&self, color: Color, kind: PlayerKind) -> anyhow::Result<Box<dyn Player>> {
        let oracle = Arc::clone(&self.oracle);
        let name = kind.label();
        let time_limit = self.config.time_limit()?;

        let player: Box<dyn Player> = match kind {
            PlayerKind::Human => {
                let input = self
                    .input
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("a human player needs an input queue"))?;
                Box::new(HumanPlayer::new(
                    color,
                    name,
                    oracle,
                    self.config.input.adapter(),
                    input,
                    Arc::clone(&self.sink),
                    self.stop.clone(),
                ))
            }
            PlayerKind::Random => {
                Box::new(EnginePlayer::new(color, name, RandomEngine::new(color, oracle)))
            }
            PlayerKind::NaiveMc => Box::new(EnginePlayer::new(
                color,
                name,
                NaiveMonteCarlo::new(color, oracle, time_limit),
            )),
            PlayerKind::UctMc => Box::new(EnginePlayer::new(
                color,
                name,
                UctMonteCarlo::new(
                    color,
                    oracle,
                    time_limit,
                    self.config.ucb1_coeff,
                    self.config.expand_threshold,
                ),
            )),
        };
        Ok(player)
    }
}
