use crate::core::{Board, Color, Coord};
use crate::display::{NullRenderer, RenderSink};
use crate::game::{GameResult, GameSession};
use crate::gesture::{InputEvent, TapAdapter};
use crate::logic::{RulesOracle, SeparoRules};
use crate::player::{input_queue, Engine, EnginePlayer, HumanPlayer, Player, RandomEngine};
use crate::testing::{RecordingSink, ScriptedOracle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Fails the test if the turn loop ever hands it the move.
struct NeverCalled(Color);

#[async_trait::async_trait]
impl Player for NeverCalled {
    async fn play(&mut self, _board: Board) -> anyhow::Result<Board> {
        panic!("{:?} should have been skipped", self.0);
    }

    fn name(&self) -> &str {
        "never"
    }

    fn color(&self) -> Color {
        self.0
    }
}

/// 何もせずに盤面を返すエンジン
struct Stalling;

impl Engine for Stalling {
    fn play(&mut self, board: Board) -> anyhow::Result<Board> {
        Ok(board)
    }
}

fn random(color: Color, oracle: Arc<dyn RulesOracle>, seed: u64) -> Box<dyn Player> {
    Box::new(EnginePlayer::new(
        color,
        "Random",
        RandomEngine::with_rng(color, oracle, StdRng::seed_from_u64(seed)),
    ))
}

fn session(
    oracle: Arc<dyn RulesOracle>,
    width: usize,
    first: Box<dyn Player>,
    second: Box<dyn Player>,
    sink: Arc<dyn RenderSink>,
) -> (GameSession, watch::Sender<bool>) {
    let (stop_tx, stop_rx) = watch::channel(false);
    let board = Board::new(width).unwrap();
    let session = GameSession::new(oracle, board, first, second, sink, stop_rx);
    (session, stop_tx)
}

#[test]
fn test_result_strings() {
    assert_eq!(GameResult::from_scores([1, 3]).to_string(), "First wins");
    assert_eq!(GameResult::from_scores([4, 2]).to_string(), "Second wins");
    assert_eq!(GameResult::from_scores([2, 2]).to_string(), "draw");
    assert_eq!(GameResult::from_scores([1, 3]).announcement(), "Red wins!");
    assert_eq!(GameResult::from_scores([2, 2]).winner(), None);
}

#[tokio::test]
async fn test_lower_score_wins() {
    for (scores, expected) in [([1, 3], "First wins"), ([2, 2], "draw")] {
        let oracle = Arc::new(ScriptedOracle {
            blocked: vec![Color::First, Color::Second],
            scores: Some(scores),
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let (session, _stop) = session(
            oracle.clone(),
            9,
            Box::new(NeverCalled(Color::First)),
            Box::new(NeverCalled(Color::Second)),
            sink.clone(),
        );

        let outcome = session.run().await.unwrap();
        assert_eq!(outcome.result.to_string(), expected);
        assert_eq!(outcome.scores, scores);
        assert_eq!(outcome.moves, 0);
        assert_eq!(oracle.apply_calls.load(Ordering::SeqCst), 0);

        let statuses = sink.statuses.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].contains(&outcome.result.announcement()));
    }
}

#[tokio::test]
async fn test_side_without_moves_is_skipped() {
    let oracle = Arc::new(ScriptedOracle {
        blocked: vec![Color::Second],
        ..Default::default()
    });
    let (session, _stop) = session(
        oracle.clone(),
        5,
        random(Color::First, oracle.clone(), 5),
        Box::new(NeverCalled(Color::Second)),
        Arc::new(NullRenderer),
    );

    let outcome = session.with_kifu().run().await.unwrap();
    assert!(outcome.moves > 0);
    assert!(!oracle.can_move(&outcome.board, Color::First).unwrap());

    let kifu = outcome.kifu.unwrap();
    assert!(kifu.moves.iter().all(|entry| entry.color == Color::First));
    assert_eq!(kifu.moves.len(), outcome.moves);
}

#[tokio::test]
async fn test_gameover_mid_round_skips_the_second_side() {
    // both sides could still move, but the game ends after First's move
    let oracle = Arc::new(ScriptedOracle {
        over_after: Some(1),
        ..Default::default()
    });
    let (session, _stop) = session(
        oracle.clone(),
        9,
        random(Color::First, oracle.clone(), 4),
        Box::new(NeverCalled(Color::Second)),
        Arc::new(NullRenderer),
    );

    let outcome = session.with_kifu().run().await.unwrap();
    assert_eq!(outcome.moves, 1);
    assert_eq!(outcome.board.moves_played(), 1);
    assert_eq!(oracle.apply_calls.load(Ordering::SeqCst), 1);
    assert!(oracle.can_move(&outcome.board, Color::Second).unwrap());
    let kifu = outcome.kifu.unwrap();
    assert_eq!(kifu.moves.len(), 1);
    assert_eq!(kifu.moves[0].color, Color::First);
}

#[tokio::test]
async fn test_terminates_when_nothing_can_happen() {
    // the oracle never says "over", yet neither side can move
    let oracle = Arc::new(ScriptedOracle {
        blocked: vec![Color::First, Color::Second],
        never_over: true,
        ..Default::default()
    });
    let (session, _stop) = session(
        oracle.clone(),
        9,
        Box::new(NeverCalled(Color::First)),
        Box::new(NeverCalled(Color::Second)),
        Arc::new(NullRenderer),
    );
    let outcome = session.run().await.unwrap();
    assert_eq!(outcome.moves, 0);
    assert_eq!(outcome.result, GameResult::Draw);
}

#[tokio::test]
async fn test_terminates_when_players_stall() {
    let oracle = Arc::new(ScriptedOracle {
        never_over: true,
        ..Default::default()
    });
    let (session, _stop) = session(
        oracle.clone(),
        9,
        Box::new(EnginePlayer::new(Color::First, "stall", Stalling)),
        Box::new(EnginePlayer::new(Color::Second, "stall", Stalling)),
        Arc::new(NullRenderer),
    );
    let outcome = session.run().await.unwrap();
    assert_eq!(outcome.moves, 0);
    assert_eq!(outcome.board, Board::new(9).unwrap());
}

#[tokio::test]
async fn test_engine_game_is_recorded_and_replayable() {
    let oracle: Arc<dyn RulesOracle> = Arc::new(SeparoRules::new());
    let (session, _stop) = session(
        oracle.clone(),
        6,
        random(Color::First, oracle.clone(), 1),
        random(Color::Second, oracle.clone(), 2),
        Arc::new(NullRenderer),
    );

    let outcome = session.with_kifu().run().await.unwrap();
    assert!(oracle.is_gameover(&outcome.board).unwrap());

    let kifu = outcome.kifu.unwrap();
    assert_eq!(kifu.moves.len(), outcome.moves);
    assert_eq!(kifu.result.as_deref(), Some(outcome.result.to_string().as_str()));
    assert_eq!(kifu.scores, Some(outcome.scores));

    let boards = kifu.replay(oracle.as_ref()).unwrap();
    assert_eq!(boards.last(), Some(&outcome.board));
}

#[tokio::test]
async fn test_human_turn_then_engine_reply_then_stop() {
    let oracle = Arc::new(ScriptedOracle::default());
    let sink = Arc::new(RecordingSink::default());
    let (tx, rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = watch::channel(false);

    let human = HumanPlayer::new(
        Color::First,
        "Human",
        oracle.clone(),
        Box::new(TapAdapter),
        input_queue(rx),
        sink.clone(),
        stop_rx.clone(),
    );
    let session = GameSession::new(
        oracle.clone(),
        Board::new(5).unwrap(),
        Box::new(human),
        random(Color::Second, oracle.clone(), 9),
        sink.clone(),
        stop_rx,
    );

    let counter = oracle.clone();
    let feeder = tokio::spawn(async move {
        tokio::task::yield_now().await;
        for (x, y) in [(0, 0), (1, 1), (2, 1)] {
            tx.send(InputEvent::Tap(Coord::new(x, y))).unwrap();
            tokio::task::yield_now().await;
        }
        // human move + engine reply
        while counter.apply_calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        stop_tx.send(true).unwrap();
        tx
    });

    let err = session.run().await.unwrap_err();
    let _tx = feeder.await.unwrap();
    assert!(crate::error::is_stopped(&err));
    assert_eq!(oracle.apply_calls.load(Ordering::SeqCst), 2);

    let statuses = sink.statuses.lock().unwrap();
    assert!(statuses.iter().any(|s| s == "Red's turn (Human)"));
    assert!(statuses.iter().any(|s| s == "Blue's turn (Random)"));
    let pending = sink.pending.lock().unwrap();
    assert!(pending.iter().any(|p| p.len() == 2));
    assert!(pending.iter().all(|p| p.len() < 3));
}
