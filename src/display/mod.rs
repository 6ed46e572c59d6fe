use crate::core::{Board, Color, Coord, Dir, Move};
use crate::gesture::InputModality;
use crate::logic::RulesOracle;
use crossterm::{cursor, execute, style::Stylize, terminal};
use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// 描画する内容一式
pub struct Frame<'a> {
    pub board: &'a Board,
    /// 入力途中の石 (0〜3 個)
    pub pending: &'a [Coord],
    pub preview: Option<Coord>,
    pub status: &'a str,
}

impl<'a> Frame<'a> {
    pub fn board_only(board: &'a Board, status: &'a str) -> Self {
        Frame {
            board,
            pending: &[],
            preview: None,
            status,
        }
    }
}

/// Fire-and-forget drawing of a snapshot. Nothing flows back.
pub trait RenderSink: Send + Sync {
    fn render(&self, frame: &Frame<'_>);
}

/// Draws nothing. Used for headless games.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn render(&self, _frame: &Frame<'_>) {}
}

// 画面レイアウト (端末の文字単位)
pub const HEADER_ROWS: u16 = 4;
pub const MARGIN_COLS: u16 = 4;
pub const CELL_COLS: u16 = 4;
pub const CELL_ROWS: u16 = 2;

/// 端末上の位置 (列, 行) を盤面座標に変換する。
/// Rounds to the nearest intersection; may return off-board coordinates.
pub fn surface_to_grid(column: u16, row: u16) -> Coord {
    let x = (column as i32 - MARGIN_COLS as i32 + CELL_COLS as i32 / 2)
        .div_euclid(CELL_COLS as i32);
    let y = (row as i32 - HEADER_ROWS as i32 + CELL_ROWS as i32 / 2)
        .div_euclid(CELL_ROWS as i32);
    Coord::new(x, y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Plain,
    Stone(Color),
    Guide(Color),
    Pending,
    Preview,
}

struct Canvas {
    cells: Vec<Vec<(char, Paint)>>,
}

impl Canvas {
    fn new(width: usize) -> Self {
        let rows = (width - 1) * CELL_ROWS as usize + 1;
        let cols = (width - 1) * CELL_COLS as usize + 1;
        let mut cells = vec![vec![(' ', Paint::Plain); cols]; rows];
        for y in 0..width {
            for x in 0..width {
                cells[y * CELL_ROWS as usize][x * CELL_COLS as usize] = ('.', Paint::Plain);
            }
        }
        Canvas { cells }
    }

    fn origin(pos: Coord) -> (usize, usize) {
        (
            pos.y as usize * CELL_ROWS as usize,
            pos.x as usize * CELL_COLS as usize,
        )
    }

    fn set(&mut self, row: usize, col: usize, ch: char, paint: Paint, overwrite: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            if overwrite || cell.0 == ' ' || cell.0 == '.' {
                *cell = (ch, paint);
            }
        }
    }

    fn point(&mut self, pos: Coord, ch: char, paint: Paint) {
        if pos.x < 0 || pos.y < 0 {
            return;
        }
        let (row, col) = Self::origin(pos);
        self.set(row, col, ch, paint, true);
    }

    fn root(&mut self, from: Coord, dir: Dir, paint: Paint, overwrite: bool) {
        // 左上側の端点から描く
        let to = from.offset(dir);
        let start = Coord::new(from.x.min(to.x), from.y.min(to.y));
        if start.x < 0 || start.y < 0 {
            return;
        }
        let (row, col) = Self::origin(start);
        match (dir.dx, dir.dy) {
            (_, 0) => {
                for c in 1..CELL_COLS as usize {
                    self.set(row, col + c, '-', paint, overwrite);
                }
            }
            (0, _) => self.set(row + 1, col, '|', paint, overwrite),
            (dx, dy) if dx == dy => self.set(row + 1, col + 2, '\\', paint, overwrite),
            _ => self.set(row + 1, col + 2, '/', paint, overwrite),
        }
    }
}

/// 最後に描いた画面 (ガイド切り替え時の再描画用)
struct Snapshot {
    board: Board,
    pending: Vec<Coord>,
    preview: Option<Coord>,
}

/// 操作説明 (入力方式ごと)
pub fn input_hint(modality: InputModality) -> &'static str {
    match modality {
        InputModality::Pointer => "[Mouse]: press-drag-release to place",
        InputModality::Tap => "[Mouse]: click three points to place",
    }
}

/// 端末描画 (crossterm)
pub struct TerminalRenderer {
    oracle: Arc<dyn RulesOracle>,
    /// 候補手をガイドとして表示するか (対局中に切り替え可)
    guide: AtomicBool,
    modality: InputModality,
    last: Mutex<Option<Snapshot>>,
}

impl TerminalRenderer {
    pub fn new(oracle: Arc<dyn RulesOracle>, guide: bool, modality: InputModality) -> Self {
        Self {
            oracle,
            guide: AtomicBool::new(guide),
            modality,
            last: Mutex::new(None),
        }
    }

    pub fn guide_enabled(&self) -> bool {
        self.guide.load(Ordering::SeqCst)
    }

    pub fn set_guide(&self, on: bool) {
        self.guide.store(on, Ordering::SeqCst);
    }

    /// ガイド表示を反転し、直前の画面を描き直す。新しい状態を返す。
    pub fn toggle_guide(&self) -> bool {
        let on = !self.guide.fetch_xor(true, Ordering::SeqCst);
        let last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(snap) = last.as_ref() {
            let status = format!("guide turned {}", if on { "on" } else { "off" });
            self.draw(&Frame {
                board: &snap.board,
                pending: &snap.pending,
                preview: snap.preview,
                status: &status,
            });
        }
        on
    }

    fn guide_moves(&self, board: &Board) -> Vec<(Color, Move)> {
        if !self.guide_enabled() {
            return Vec::new();
        }
        Color::ALL
            .iter()
            .flat_map(|&color| {
                self.oracle
                    .candidates(board, color)
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |mv| (color, mv))
            })
            .collect()
    }

    fn paint(ch: char, paint: Paint) -> String {
        let s = ch.to_string();
        match paint {
            Paint::Plain => s,
            Paint::Stone(Color::First) => s.red().bold().to_string(),
            Paint::Stone(Color::Second) => s.blue().bold().to_string(),
            Paint::Guide(Color::First) => s.dark_red().to_string(),
            Paint::Guide(Color::Second) => s.dark_blue().to_string(),
            Paint::Pending => s.yellow().bold().to_string(),
            Paint::Preview => s.yellow().to_string(),
        }
    }
}

impl RenderSink for TerminalRenderer {
    fn render(&self, frame: &Frame<'_>) {
        // 入力スレッドからの再描画と混ざらないようにロックしたまま描く
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        self.draw(frame);
        *last = Some(Snapshot {
            board: frame.board.clone(),
            pending: frame.pending.to_vec(),
            preview: frame.preview,
        });
    }
}

impl TerminalRenderer {
    fn draw(&self, frame: &Frame<'_>) {
        let board = frame.board;
        let mut canvas = Canvas::new(board.width());

        for (pos, color) in board.stones() {
            if let Some(cell) = board.cell(pos) {
                for &dir in &cell.roots {
                    canvas.root(pos, dir, Paint::Stone(color), true);
                }
            }
        }
        for (color, mv) in self.guide_moves(board) {
            canvas.root(mv.first, mv.first_root(), Paint::Guide(color), false);
            canvas.root(mv.second, mv.second_root(), Paint::Guide(color), false);
        }
        for (pos, color) in board.stones() {
            let ch = if color == Color::First { 'R' } else { 'B' };
            canvas.point(pos, ch, Paint::Stone(color));
        }
        for &pos in frame.pending {
            canvas.point(pos, '*', Paint::Pending);
        }
        if let Some(pos) = frame.preview {
            canvas.point(pos, '?', Paint::Preview);
        }

        let scores: Vec<String> = Color::ALL
            .iter()
            .map(|&c| {
                let score = self
                    .oracle
                    .score(board, c)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| "-".to_string());
                format!("{}: {}", c.label(), score)
            })
            .collect();

        let mut out = stdout();
        // 画面クリア（スクロール防止）
        let _ = execute!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        );

        // HEADER_ROWS 行ぶんのヘッダ
        print!("=== Separo ===\r\n");
        print!("{} | {}\r\n", scores[0].clone().red(), scores[1].clone().blue());
        print!("{}\r\n", frame.status.to_string().bold().yellow());
        print!("\r\n");

        for row in &canvas.cells {
            print!("{}", " ".repeat(MARGIN_COLS as usize));
            for &(ch, paint) in row {
                print!("{}", Self::paint(ch, paint));
            }
            print!("\r\n");
        }
        print!(
            "\r\n{} | [Esc]: Cancel | [g]: Guide | [q]: Quit\r\n",
            input_hint(self.modality)
        );
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_to_grid_rounds_to_nearest_point() {
        assert_eq!(surface_to_grid(MARGIN_COLS, HEADER_ROWS), Coord::new(0, 0));
        assert_eq!(surface_to_grid(MARGIN_COLS + 1, HEADER_ROWS), Coord::new(0, 0));
        assert_eq!(surface_to_grid(MARGIN_COLS + 3, HEADER_ROWS + 1), Coord::new(1, 1));
        assert_eq!(
            surface_to_grid(MARGIN_COLS + 8 * CELL_COLS, HEADER_ROWS + 8 * CELL_ROWS),
            Coord::new(8, 8)
        );
        // left of the board and in the header
        assert_eq!(surface_to_grid(0, 0), Coord::new(-1, -2));
    }

    #[test]
    fn test_canvas_draws_roots_between_points() {
        let mut canvas = Canvas::new(5);
        canvas.root(Coord::new(0, 0), Dir::new(1, 1), Paint::Plain, true);
        canvas.root(Coord::new(1, 1), Dir::new(1, 0), Paint::Plain, true);
        canvas.root(Coord::new(1, 1), Dir::new(0, -1), Paint::Plain, true);
        canvas.root(Coord::new(2, 0), Dir::new(-1, 1), Paint::Plain, true);

        assert_eq!(canvas.cells[1][2].0, '\\');
        assert_eq!(canvas.cells[2][5].0, '-');
        assert_eq!(canvas.cells[1][4].0, '|');
        assert_eq!(canvas.cells[1][6].0, '/');
        assert_eq!(canvas.cells[0][0].0, '.');
    }

    #[test]
    fn test_guide_toggle_changes_overlay() {
        let oracle: Arc<dyn RulesOracle> = Arc::new(crate::logic::SeparoRules::new());
        let renderer = TerminalRenderer::new(oracle, false, InputModality::Tap);
        let board = Board::new(9).unwrap();
        assert!(renderer.guide_moves(&board).is_empty());

        // nothing drawn yet, so this only flips the flag
        assert!(renderer.toggle_guide());
        assert!(renderer.guide_enabled());
        let guide = renderer.guide_moves(&board);
        assert_eq!(guide.len(), 8);
        assert!(guide.iter().any(|&(color, _)| color == Color::Second));

        assert!(!renderer.toggle_guide());
        assert!(renderer.guide_moves(&board).is_empty());
    }

    #[test]
    fn test_input_hint_follows_modality() {
        assert!(input_hint(InputModality::Pointer).contains("drag"));
        assert!(input_hint(InputModality::Tap).contains("click"));
        assert_ne!(input_hint(InputModality::Pointer), input_hint(InputModality::Tap));
    }
}
