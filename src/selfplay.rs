//! Headless engine-vs-engine games with aggregated statistics.

use crate::config::GameConfig;
use crate::core::Color;
use crate::display::NullRenderer;
use crate::game::{GameHost, PlayerKind, PlayerSelection};
use crate::logic::SeparoRules;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::info;

pub struct SelfPlayConfig {
    pub num_games: usize,
    pub selection: PlayerSelection,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayGame {
    pub winner: Option<Color>,
    pub scores: [u32; 2],
    pub moves: usize,
    pub time_ms: u128,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfPlayStats {
    pub total_games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
    pub avg_time_ms: f64,
    pub first_player: String,
    pub second_player: String,
    pub board_size: usize,
    pub games: Vec<SelfPlayGame>,
}

impl SelfPlayStats {
    pub fn add_result(&mut self, result: SelfPlayGame) {
        self.total_games += 1;
        match result.winner {
            Some(Color::First) => self.first_wins += 1,
            Some(Color::Second) => self.second_wins += 1,
            None => self.draws += 1,
        }
        self.games.push(result);
        self.recalculate_averages();
    }

    fn recalculate_averages(&mut self) {
        if self.games.is_empty() {
            return;
        }
        let total_moves: usize = self.games.iter().map(|g| g.moves).sum();
        let total_time: u128 = self.games.iter().map(|g| g.time_ms).sum();
        self.avg_moves = total_moves as f64 / self.games.len() as f64;
        self.avg_time_ms = total_time as f64 / self.games.len() as f64;
    }
}

pub async fn run_selfplay(config: SelfPlayConfig) -> anyhow::Result<SelfPlayStats> {
    for kind in [config.selection.first, config.selection.second] {
        if kind == PlayerKind::Human {
            anyhow::bail!("self-play needs engine players only");
        }
    }

    let mut stats = SelfPlayStats {
        first_player: config.selection.first.label().to_string(),
        second_player: config.selection.second.label().to_string(),
        board_size: config.game.board_size,
        ..Default::default()
    };

    // 停止要求は出さないので送信側は保持するだけ
    let (_stop_tx, stop_rx) = watch::channel(false);
    let host = GameHost::new(
        config.game,
        Arc::new(SeparoRules::new()),
        Arc::new(NullRenderer),
        stop_rx,
    );

    for game_num in 1..=config.num_games {
        let start_time = Instant::now();
        let outcome = host.run(config.selection).await?;
        let elapsed = start_time.elapsed();

        info!(
            "game {}/{}: {} ({} moves, {:.1}s)",
            game_num,
            config.num_games,
            outcome.result,
            outcome.moves,
            elapsed.as_secs_f64()
        );
        stats.add_result(SelfPlayGame {
            winner: outcome.result.winner(),
            scores: outcome.scores,
            moves: outcome.moves,
            time_ms: elapsed.as_millis(),
        });
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_averages() {
        let mut stats = SelfPlayStats::default();
        stats.add_result(SelfPlayGame {
            winner: Some(Color::First),
            scores: [1, 2],
            moves: 10,
            time_ms: 100,
        });
        stats.add_result(SelfPlayGame {
            winner: None,
            scores: [2, 2],
            moves: 20,
            time_ms: 300,
        });
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.first_wins, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.avg_moves, 15.0);
        assert_eq!(stats.avg_time_ms, 200.0);
    }

    #[tokio::test]
    async fn test_selfplay_random_games() {
        let config = SelfPlayConfig {
            num_games: 3,
            selection: PlayerSelection {
                first: PlayerKind::Random,
                second: PlayerKind::Random,
            },
            game: GameConfig {
                board_size: 5,
                ..Default::default()
            },
        };
        let stats = run_selfplay(config).await.unwrap();
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.first_wins + stats.second_wins + stats.draws, 3);
        assert!(stats.games.iter().all(|g| g.moves > 0));
    }

    #[tokio::test]
    async fn test_selfplay_rejects_humans() {
        let config = SelfPlayConfig {
            num_games: 1,
            selection: PlayerSelection {
                first: PlayerKind::Human,
                second: PlayerKind::Random,
            },
            game: GameConfig::default(),
        };
        assert!(run_selfplay(config).await.is_err());
    }
}
