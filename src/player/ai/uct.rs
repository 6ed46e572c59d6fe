use crate::core::{Board, Color, Move};
use crate::logic::RulesOracle;
use crate::player::Engine;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// 探索木のノード (arena の添字で参照する)
struct Node {
    board: Board,
    to_move: Color,
    /// `None` for the root and for passes.
    mv: Option<Move>,
    children: Vec<usize>,
    expanded: bool,
    /// Counted from the side that moved into this node.
    wins: f64,
    visits: u32,
}

impl Node {
    fn new(board: Board, to_move: Color, mv: Option<Move>) -> Self {
        Node {
            board,
            to_move,
            mv,
            children: Vec::new(),
            expanded: false,
            wins: 0.0,
            visits: 0,
        }
    }

    fn mover(&self) -> Color {
        self.to_move.opponent()
    }
}

/// UCT モンテカルロ木探索
pub struct UctMonteCarlo {
    color: Color,
    oracle: Arc<dyn RulesOracle>,
    rng: StdRng,
    time_limit: Duration,
    ucb1_coeff: f64,
    expand_threshold: u32,
}

impl UctMonteCarlo {
    pub fn new(
        color: Color,
        oracle: Arc<dyn RulesOracle>,
        time_limit: Duration,
        ucb1_coeff: f64,
        expand_threshold: u32,
    ) -> Self {
        UctMonteCarlo {
            color,
            oracle,
            rng: StdRng::from_entropy(),
            time_limit,
            ucb1_coeff,
            expand_threshold,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn expand(&self, arena: &mut Vec<Node>, index: usize) -> anyhow::Result<()> {
        arena[index].expanded = true;
        let board = arena[index].board.clone();
        let to_move = arena[index].to_move;

        let moves = self.oracle.candidates(&board, to_move)?;
        let mut children = Vec::with_capacity(moves.len().max(1));
        for mv in moves {
            let next = super::apply(self.oracle.as_ref(), &board, &mv, to_move)?;
            children.push(Node::new(next, to_move.opponent(), Some(mv)));
        }
        // 打てない側はパスして相手番へ (両者打てなければ終局で葉のまま)
        if children.is_empty() && self.oracle.can_move(&board, to_move.opponent())? {
            children.push(Node::new(board, to_move.opponent(), None));
        }

        for child in children {
            arena.push(child);
            let id = arena.len() - 1;
            arena[index].children.push(id);
        }
        Ok(())
    }

    fn select(&self, arena: &[Node], index: usize) -> usize {
        let parent = &arena[index];
        let ln_n = (parent.visits.max(1) as f64).ln();
        let mut best = parent.children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in &parent.children {
            let node = &arena[child];
            let score = if node.visits == 0 {
                f64::INFINITY
            } else {
                let n = node.visits as f64;
                node.wins / n + self.ucb1_coeff * (ln_n / n).sqrt()
            };
            if score > best_score {
                best = child;
                best_score = score;
            }
        }
        best
    }

    fn iterate(&mut self, arena: &mut Vec<Node>) -> anyhow::Result<()> {
        let mut path = vec![0];
        let mut index = 0;
        while !arena[index].children.is_empty() {
            index = self.select(arena, index);
            path.push(index);
        }

        if !arena[index].expanded && arena[index].visits >= self.expand_threshold {
            self.expand(arena, index)?;
            if let Some(&child) = arena[index].children.first() {
                index = child;
                path.push(index);
            }
        }

        let result = super::playout(
            self.oracle.as_ref(),
            &arena[index].board,
            arena[index].to_move,
            &mut self.rng,
        )?;

        for &i in &path {
            let node = &mut arena[i];
            node.visits += 1;
            match result {
                Some(c) if c == node.mover() => node.wins += 1.0,
                None => node.wins += 0.5,
                _ => {}
            }
        }
        Ok(())
    }
}

impl Engine for UctMonteCarlo {
    fn play(&mut self, board: Board) -> anyhow::Result<Board> {
        if !self.oracle.can_move(&board, self.color)? {
            return Ok(board);
        }

        let mut arena = vec![Node::new(board, self.color, None)];
        self.expand(&mut arena, 0)?;

        let started = Instant::now();
        let mut iterations = 0u32;
        loop {
            self.iterate(&mut arena)?;
            iterations += 1;
            if started.elapsed() >= self.time_limit {
                break;
            }
        }

        // 訪問回数最大の子を選ぶ
        let root = &arena[0];
        let mut best = root.children[0];
        for &child in &root.children {
            if arena[child].visits > arena[best].visits {
                best = child;
            }
        }

        let chosen = arena.swap_remove(best);
        if let Some(mv) = chosen.mv {
            info!(
                "uct-mc ({:?}): {} visits {}/{} win rate {:.1}% ({} nodes)",
                self.color,
                mv,
                chosen.visits,
                iterations,
                chosen.wins / chosen.visits.max(1) as f64 * 100.0,
                arena.len() + 1
            );
        }
        Ok(chosen.board)
    }
}
