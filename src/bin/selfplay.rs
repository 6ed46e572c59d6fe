//! Engine-vs-engine self-play. Prints the aggregated statistics as JSON.
//!
//! Usage: selfplay [games] [first] [second] [board_size]
//! Player kinds: random, naive-mc, uct-mc

use separo::config::GameConfig;
use separo::game::{PlayerKind, PlayerSelection};
use separo::selfplay::{run_selfplay, SelfPlayConfig};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let num_games = match args.get(1) {
        Some(n) => n.parse()?,
        None => 10,
    };
    let first: PlayerKind = args
        .get(2)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(PlayerKind::Random);
    let second: PlayerKind = args
        .get(3)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(PlayerKind::UctMc);

    let mut game = GameConfig::load_or_default();
    game.save_kifu = false;
    if let Some(size) = args.get(4) {
        game.board_size = size.parse()?;
    }
    game.validate()?;

    let stats = run_selfplay(SelfPlayConfig {
        num_games,
        selection: PlayerSelection { first, second },
        game,
    })
    .await?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
