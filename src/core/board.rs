use super::graph::RegionGraph;
use super::r#move::Move;
use super::types::{Color, Coord, Dir};
use crate::error::GameError;

pub const MIN_WIDTH: usize = 4;
pub const MAX_WIDTH: usize = 19;

/// 交点 1 つ分の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub color: Option<Color>,
    /// この石から伸びている根の向き (最大 4 本)
    pub roots: Vec<Dir>,
}

impl Cell {
    /// Checks the angle against existing roots only, not the color.
    /// Roots may not form less than 90 degrees.
    pub fn accepts_root(&self, dir: Dir) -> bool {
        !self
            .roots
            .iter()
            .any(|d| (dir.dx - d.dx).abs() + (dir.dy - d.dy).abs() <= 1)
    }
}

/// 盤面スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    cells: Vec<Cell>,
    /// 色ごとの領域グラフ (得点計算用)
    graphs: [RegionGraph; 2],
    last_move: Option<(Color, Move)>,
    moves_played: usize,
}

impl Board {
    pub fn new(width: usize) -> anyhow::Result<Self> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(GameError::InvalidBoardSize { width }.into());
        }

        let mut board = Board {
            width,
            cells: vec![Cell::default(); width * width],
            graphs: [RegionGraph::new(width), RegionGraph::new(width)],
            last_move: None,
            moves_played: 0,
        };

        let upper = width as i32 - 1;
        board.cell_mut(Coord::new(0, 0)).color = Some(Color::First);
        board.cell_mut(Coord::new(upper, upper)).color = Some(Color::First);
        board.cell_mut(Coord::new(upper, 0)).color = Some(Color::Second);
        board.cell_mut(Coord::new(0, upper)).color = Some(Color::Second);

        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, pos: Coord) -> Option<&Cell> {
        if pos.in_bounds(self.width) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn stone_at(&self, pos: Coord) -> Option<Color> {
        self.cell(pos).and_then(|c| c.color)
    }

    /// All stones in row-major order.
    pub fn stones(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.color
                .map(|color| (self.coord_of(idx), color))
        })
    }

    pub fn last_move(&self) -> Option<(Color, Move)> {
        self.last_move
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    pub fn region_count(&self, color: Color) -> u32 {
        self.graphs[color.index()].count_regions()
    }

    /// 石と根を置く。合法性は呼び出し側で検証済みであること。
    pub(crate) fn place(&mut self, mv: &Move, color: Color) {
        self.cell_mut(mv.second).color = Some(color);
        self.cell_mut(mv.third).color = Some(color);

        let d1 = mv.first_root();
        let d2 = mv.second_root();
        self.cell_mut(mv.first).roots.push(d1);
        self.cell_mut(mv.second).roots.push(d1.reversed());
        self.cell_mut(mv.second).roots.push(d2);
        self.cell_mut(mv.third).roots.push(d2.reversed());

        self.graphs[color.index()].cut(mv);
        self.last_move = Some((color, *mv));
        self.moves_played += 1;
    }

    fn index(&self, pos: Coord) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    fn coord_of(&self, idx: usize) -> Coord {
        Coord::new((idx % self.width) as i32, (idx / self.width) as i32)
    }

    fn cell_mut(&mut self, pos: Coord) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }
}
