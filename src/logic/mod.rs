pub mod oracle;

pub use oracle::{RulesOracle, SeparoRules};

use crate::core::{Board, Color, Dir, Move};

/// 合法手生成
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();

    for (first, _) in board.stones().filter(|&(_, c)| c == color) {
        let Some(cell1) = board.cell(first) else {
            continue;
        };

        for dir1 in Dir::DIAGONALS {
            // 45 度になる根は不可
            if !cell1.accepts_root(dir1) {
                continue;
            }

            // 2 つ目の石は空点のみ
            let second = first.offset(dir1);
            let Some(cell2) = board.cell(second) else {
                continue;
            };
            if cell2.color.is_some() || !cell2.accepts_root(dir1.reversed()) {
                continue;
            }

            for dir2 in [Dir::new(dir1.dx, 0), Dir::new(0, dir1.dy)] {
                if !cell2.accepts_root(dir2) {
                    continue;
                }
                // 3 つ目の石は空点か自分の石
                let third = second.offset(dir2);
                let Some(cell3) = board.cell(third) else {
                    continue;
                };
                let color_ok = cell3.color.map_or(true, |c| c == color);
                if color_ok && cell3.accepts_root(dir2.reversed()) {
                    moves.push(Move::new(first, second, third));
                }
            }
        }
    }

    moves
}

pub fn is_legal(board: &Board, mv: &Move, color: Color) -> bool {
    legal_moves(board, color).contains(mv)
}

/// 手を適用した新しい盤面を返す (元の盤面は変更しない)
pub fn apply_move(board: &Board, mv: &Move, color: Color) -> Board {
    let mut next = board.clone();
    next.place(mv, color);
    next
}

pub fn can_move(board: &Board, color: Color) -> bool {
    !legal_moves(board, color).is_empty()
}

pub fn is_gameover(board: &Board) -> bool {
    !can_move(board, Color::First) && !can_move(board, Color::Second)
}

/// Lower score wins; `None` is a draw.
pub fn winner(first_score: u32, second_score: u32) -> Option<Color> {
    if first_score < second_score {
        Some(Color::First)
    } else if second_score < first_score {
        Some(Color::Second)
    } else {
        None
    }
}
