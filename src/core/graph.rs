use super::r#move::Move;

// 各マス目に 4 つのノード (N, E, S, W) を置いたグラフ。
// 根がエッジを切断し、連結成分 (4 ノード以上) の数が得点になる。
//
//            stone
// +----------(+)----------+
// |     o     |`.   o     |
// |   .' '.   |  `.  '.   |
// | o'     'o---o  `.  'o---
// |  '.   .'  |  '.  `.   |
// |    'o'    |    'o  `. |
// +-----|-----+-----|----(+)
// |     o     |     o    stone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodePos {
    N,
    E,
    S,
    W,
}

impl NodePos {
    fn slot(self) -> usize {
        match self {
            NodePos::N => 0,
            NodePos::E => 1,
            NodePos::S => 2,
            NodePos::W => 3,
        }
    }
}

/// Smallest component that counts as a region.
const MIN_REGION_NODES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGraph {
    ngrids: usize,
    edges: Vec<Vec<usize>>,
}

impl RegionGraph {
    /// Graph for a board with `width` lines per side (`width - 1` cells).
    pub fn new(width: usize) -> Self {
        let ngrids = width.saturating_sub(1);
        let mut graph = RegionGraph {
            ngrids,
            edges: vec![Vec::with_capacity(3); ngrids * ngrids * 4],
        };

        for x in 0..ngrids {
            for y in 0..ngrids {
                let n = graph.node(x, y, NodePos::N);
                let e = graph.node(x, y, NodePos::E);
                let s = graph.node(x, y, NodePos::S);
                let w = graph.node(x, y, NodePos::W);
                graph.add_edge(n, e);
                graph.add_edge(n, w);
                graph.add_edge(s, e);
                graph.add_edge(s, w);

                if x + 1 < ngrids {
                    let west_of_next = graph.node(x + 1, y, NodePos::W);
                    graph.add_edge(e, west_of_next);
                }
                if y + 1 < ngrids {
                    let north_of_next = graph.node(x, y + 1, NodePos::N);
                    graph.add_edge(s, north_of_next);
                }
            }
        }
        graph
    }

    /// 1手分の根でエッジを切る
    pub fn cut(&mut self, mv: &Move) {
        let (s1, s2, s3) = (mv.first, mv.second, mv.third);

        // first root: diagonal through a single cell
        let d1 = mv.first_root();
        let (cell, tl_br) = match (d1.dx, d1.dy) {
            (1, 1) => ((s1.x, s1.y), true),
            (-1, -1) => ((s2.x, s2.y), true),
            (1, -1) => ((s1.x, s1.y - 1), false),
            (-1, 1) => ((s1.x - 1, s1.y), false),
            _ => return,
        };
        if let Some((cx, cy)) = self.cell(cell.0, cell.1) {
            if tl_br {
                self.remove_edge(self.node(cx, cy, NodePos::N), self.node(cx, cy, NodePos::W));
                self.remove_edge(self.node(cx, cy, NodePos::S), self.node(cx, cy, NodePos::E));
            } else {
                self.remove_edge(self.node(cx, cy, NodePos::N), self.node(cx, cy, NodePos::E));
                self.remove_edge(self.node(cx, cy, NodePos::S), self.node(cx, cy, NodePos::W));
            }
        }

        // second root: along a grid line, separating two neighbouring cells.
        // Nothing to cut on the outer border.
        let d2 = mv.second_root();
        match (d2.dx, d2.dy) {
            (1, 0) | (-1, 0) => {
                let left = if d2.dx == 1 { s2 } else { s3 };
                if let (Some((ax, ay)), Some((bx, by))) =
                    (self.cell(left.x, left.y - 1), self.cell(left.x, left.y))
                {
                    self.remove_edge(self.node(ax, ay, NodePos::S), self.node(bx, by, NodePos::N));
                }
            }
            (0, 1) | (0, -1) => {
                let top = if d2.dy == 1 { s2 } else { s3 };
                if let (Some((ax, ay)), Some((bx, by))) =
                    (self.cell(top.x - 1, top.y), self.cell(top.x, top.y))
                {
                    self.remove_edge(self.node(ax, ay, NodePos::E), self.node(bx, by, NodePos::W));
                }
            }
            _ => {}
        }
    }

    /// 4 ノード以上の連結成分の数
    pub fn count_regions(&self) -> u32 {
        let mut visited = vec![false; self.edges.len()];
        let mut regions = 0;
        let mut stack = Vec::new();

        for start in 0..self.edges.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push(start);
            let mut size = 0;
            while let Some(idx) = stack.pop() {
                size += 1;
                for &next in &self.edges[idx] {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
            if size >= MIN_REGION_NODES {
                regions += 1;
            }
        }
        regions
    }

    fn cell(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let n = self.ngrids as i32;
        if 0 <= x && x < n && 0 <= y && y < n {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    fn node(&self, x: usize, y: usize, pos: NodePos) -> usize {
        (x * self.ngrids + y) * 4 + pos.slot()
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        self.edges[a].push(b);
        self.edges[b].push(a);
    }

    fn remove_edge(&mut self, a: usize, b: usize) {
        self.edges[a].retain(|&n| n != b);
        self.edges[b].retain(|&n| n != a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coord;

    #[test]
    fn test_uncut_graph_is_one_region() {
        let graph = RegionGraph::new(9);
        assert_eq!(graph.count_regions(), 1);
    }

    #[test]
    fn test_corner_move_splits_off_small_piece() {
        // (0,0) -> (1,1) -> (1,0) cuts off the N/E triangle of the corner
        // cell. Two nodes are too few to count, the rest stays connected.
        let mut graph = RegionGraph::new(9);
        let mv = Move::new(Coord::new(0, 0), Coord::new(1, 1), Coord::new(1, 0));
        graph.cut(&mv);
        assert_eq!(graph.count_regions(), 1);
    }
}
