use super::types::{Coord, Dir};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1手 = 3つの石を結ぶ2本の根
///
/// `second` is diagonal to `first` and `third` is one orthogonal step from
/// `second`. Whether the triple is actually playable is decided by the rules
/// oracle alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub first: Coord,
    pub second: Coord,
    pub third: Coord,
}

impl Move {
    pub fn new(first: Coord, second: Coord, third: Coord) -> Self {
        Move {
            first,
            second,
            third,
        }
    }

    /// Stone at `index` (0, 1 or 2).
    pub fn at(&self, index: usize) -> Option<Coord> {
        match index {
            0 => Some(self.first),
            1 => Some(self.second),
            2 => Some(self.third),
            _ => None,
        }
    }

    pub fn stones(&self) -> [Coord; 3] {
        [self.first, self.second, self.third]
    }

    pub fn first_root(&self) -> Dir {
        Dir::between(self.first, self.second)
    }

    pub fn second_root(&self) -> Dir {
        Dir::between(self.second, self.third)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {} -> {}", self.first, self.second, self.third)
    }
}
