use serde::{Deserialize, Serialize};
use std::fmt;

/// 手番の色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    #[default]
    First, // 先手 (Red)
    Second, // 後手 (Blue)
}

impl Color {
    /// Turn order within one round.
    pub const ALL: [Color; 2] = [Color::First, Color::Second];

    pub fn opponent(self) -> Color {
        match self {
            Color::First => Color::Second,
            Color::Second => Color::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::First => 0,
            Color::Second => 1,
        }
    }

    /// 画面表示用の名前
    pub fn label(self) -> &'static str {
        match self {
            Color::First => "Red",
            Color::Second => "Blue",
        }
    }
}

/// 盤面座標 (0-indexed)
///
/// Signed so that a surface transform may hand us points off the board;
/// such points simply never match a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    pub fn offset(self, dir: Dir) -> Coord {
        Coord::new(self.x + dir.dx, self.y + dir.dy)
    }

    pub fn in_bounds(self, width: usize) -> bool {
        let w = width as i32;
        0 <= self.x && self.x < w && 0 <= self.y && self.y < w
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 根の向き。y 軸は下向き (左上が原点)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dir {
    pub dx: i32,
    pub dy: i32,
}

impl Dir {
    pub const DIAGONALS: [Dir; 4] = [
        Dir { dx: 1, dy: 1 },
        Dir { dx: -1, dy: 1 },
        Dir { dx: -1, dy: -1 },
        Dir { dx: 1, dy: -1 },
    ];

    pub fn new(dx: i32, dy: i32) -> Self {
        Dir { dx, dy }
    }

    pub fn between(from: Coord, to: Coord) -> Dir {
        Dir::new(to.x - from.x, to.y - from.y)
    }

    pub fn reversed(self) -> Dir {
        Dir::new(-self.dx, -self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_defaults_to_first() {
        assert_eq!(Color::default(), Color::First);
        assert_eq!(Color::default().opponent(), Color::Second);
        assert_eq!(Color::ALL[Color::default().index()], Color::First);
    }
}
