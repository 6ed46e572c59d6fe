use crate::core::board::{MAX_WIDTH, MIN_WIDTH};
use crate::error::GameError;
use crate::gesture::InputModality;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    /// 思考エンジンの持ち時間 (秒)
    pub time_limit_secs: f64,
    pub ucb1_coeff: f64,
    pub expand_threshold: u32,
    pub input: InputModality,
    /// 候補手の根をガイド表示する
    pub guide: bool,
    pub save_kifu: bool,
    pub kifu_dir: String,
}

impl GameConfig {
    pub const PATH: &'static str = "separo_config.json";

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Self::PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| Self::default())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.board_size) {
            return Err(GameError::InvalidBoardSize {
                width: self.board_size,
            }
            .into());
        }
        if self.ucb1_coeff < 0.0 || !self.ucb1_coeff.is_finite() {
            anyhow::bail!("ucb1_coeff must be a non-negative number");
        }
        self.time_limit().map(|_| ())
    }

    pub fn time_limit(&self) -> anyhow::Result<Duration> {
        Ok(Duration::try_from_secs_f64(self.time_limit_secs)?)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: 9,
            time_limit_secs: 1.0,
            ucb1_coeff: 1.4,
            expand_threshold: 3,
            input: InputModality::Pointer,
            guide: true,
            save_kifu: false,
            kifu_dir: "kifu".to_string(),
        }
    }
}
