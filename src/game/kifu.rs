use crate::core::{Board, Color, Move};
use crate::logic::RulesOracle;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KifuEntry {
    pub color: Color,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// 棋譜 (JSON で保存する)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KifuData {
    pub board_size: usize,
    pub first_player: String,
    pub second_player: String,
    pub started_at: String,
    pub moves: Vec<KifuEntry>,
    /// "First wins" / "Second wins" / "draw"
    pub result: Option<String>,
    pub scores: Option<[u32; 2]>,
}

impl KifuData {
    /// Writes the record under `dir` and returns the file path.
    pub fn save(&self, dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let stem = format!(
            "separo_{}x{}_{}",
            self.board_size,
            self.board_size,
            Local::now().format("%Y%m%d_%H%M%S_%3f")
        );
        // 同じ時刻の棋譜があれば連番を付ける (上書きしない)
        let mut suffix = 0;
        let (path, file) = loop {
            let name = if suffix == 0 {
                format!("{}.json", stem)
            } else {
                format!("{}_{}.json", stem, suffix)
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e.into()),
            }
        };
        serde_json::to_writer_pretty(file, self)?;
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// 初期盤面から順に全局面を再構成する
    pub fn replay(&self, oracle: &dyn RulesOracle) -> anyhow::Result<Vec<Board>> {
        let mut board = Board::new(self.board_size)?;
        let mut boards = Vec::with_capacity(self.moves.len() + 1);
        boards.push(board.clone());

        for (i, entry) in self.moves.iter().enumerate() {
            let mv = entry.mv;
            board = oracle
                .apply_move_if_possible(&board, mv.first, mv.second, mv.third, entry.color)?
                .ok_or_else(|| anyhow::anyhow!("move {} ({}) is not legal", i + 1, mv))?;
            boards.push(board.clone());
        }
        Ok(boards)
    }
}

/// 対局中に指し手を記録する
pub struct KifuRecorder {
    data: KifuData,
}

impl KifuRecorder {
    pub fn new(board_size: usize, first_player: &str, second_player: &str) -> Self {
        KifuRecorder {
            data: KifuData {
                board_size,
                first_player: first_player.to_string(),
                second_player: second_player.to_string(),
                started_at: Local::now().to_rfc3339(),
                moves: Vec::new(),
                result: None,
                scores: None,
            },
        }
    }

    pub fn record(&mut self, color: Color, mv: Move) {
        self.data.moves.push(KifuEntry { color, mv });
    }

    pub fn len(&self) -> usize {
        self.data.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.moves.is_empty()
    }

    pub fn finish(mut self, result: &str, scores: [u32; 2]) -> KifuData {
        self.data.result = Some(result.to_string());
        self.data.scores = Some(scores);
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::SeparoRules;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sample_game(oracle: &SeparoRules, turns: usize) -> (KifuRecorder, Board) {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = Board::new(7).unwrap();
        let mut recorder = KifuRecorder::new(7, "Random", "Random");
        for color in Color::ALL.iter().cycle().take(turns) {
            let moves = oracle.candidates(&board, *color).unwrap();
            let Some(mv) = moves.choose(&mut rng) else {
                continue;
            };
            board = oracle
                .apply_move_if_possible(&board, mv.first, mv.second, mv.third, *color)
                .unwrap()
                .unwrap();
            recorder.record(*color, *mv);
        }
        (recorder, board)
    }

    #[test]
    fn test_replay_reaches_the_same_board() {
        let oracle = SeparoRules::new();
        let (recorder, board) = sample_game(&oracle, 10);
        let played = recorder.len();
        assert!(played > 0);

        let kifu = recorder.finish("draw", [1, 1]);
        let boards = kifu.replay(&oracle).unwrap();
        assert_eq!(boards.len(), played + 1);
        assert_eq!(boards.last(), Some(&board));
    }

    #[test]
    fn test_save_and_load() {
        let oracle = SeparoRules::new();
        let (recorder, _) = sample_game(&oracle, 4);
        let kifu = recorder.finish("First wins", [1, 2]);

        let dir = std::env::temp_dir().join(format!("separo_kifu_{}", std::process::id()));
        let path = kifu.save(&dir).unwrap();
        let loaded = KifuData::load(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, kifu);
        assert_eq!(loaded.result.as_deref(), Some("First wins"));
    }

    #[test]
    fn test_saves_in_the_same_instant_do_not_overwrite() {
        let oracle = SeparoRules::new();
        let (recorder, _) = sample_game(&oracle, 2);
        let kifu = recorder.finish("draw", [1, 1]);

        let dir = std::env::temp_dir().join(format!("separo_kifu_dup_{}", std::process::id()));
        let paths: Vec<PathBuf> = (0..5).map(|_| kifu.save(&dir).unwrap()).collect();
        let files = std::fs::read_dir(&dir).unwrap().count();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(files, 5);
        for (i, a) in paths.iter().enumerate() {
            assert!(paths[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_replay_rejects_a_corrupt_record() {
        let oracle = SeparoRules::new();
        let (recorder, _) = sample_game(&oracle, 2);
        let mut kifu = recorder.finish("draw", [1, 1]);
        // 同じ手を二度は打てない
        let first = kifu.moves[0];
        kifu.moves.push(first);
        assert!(kifu.replay(&oracle).is_err());
    }
}
