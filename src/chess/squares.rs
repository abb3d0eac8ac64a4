use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::chess::fen::{Board, Piece, Position};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// One square in rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquareView {
    /// Algebraic name, e.g. `e4`.
    pub coord: String,
    pub piece: Option<Piece>,
    pub matrix_rank: usize,
    pub matrix_file: usize,
    pub is_light: bool,
}

/// The 64 squares top-left first, row by row. For black both axes are
/// reversed so h1 comes first.
pub fn board_to_squares(board: &Board, orientation: Orientation) -> Vec<SquareView> {
    let order: Vec<usize> = match orientation {
        Orientation::White => (0..8).collect(),
        Orientation::Black => (0..8).rev().collect(),
    };
    let mut squares = Vec::with_capacity(64);
    for &rank in &order {
        for &file in &order {
            squares.push(SquareView {
                coord: square_name(rank, file),
                piece: board[rank][file],
                matrix_rank: rank,
                matrix_file: file,
                is_light: (rank + file) % 2 == 0,
            });
        }
    }
    squares
}

/// `(0, 0)` is `a8`.
pub fn square_name(rank: usize, file: usize) -> String {
    format!("{}{}", (b'a' + file as u8) as char, 8 - rank)
}

pub fn file_labels(orientation: Orientation) -> [char; 8] {
    let mut files = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
    if orientation == Orientation::Black {
        files.reverse();
    }
    files
}

/// Top to bottom.
pub fn rank_labels(orientation: Orientation) -> [char; 8] {
    let mut ranks = ['1', '2', '3', '4', '5', '6', '7', '8'];
    if orientation == Orientation::White {
        ranks.reverse();
    }
    ranks
}

/// Matrix cells `(rank, file)` whose glyph differs between two positions.
/// Empty when either side is missing.
pub fn diff_boards(prev: Option<&Position>, next: Option<&Position>) -> BTreeSet<(usize, usize)> {
    let (Some(prev), Some(next)) = (prev, next) else {
        return BTreeSet::new();
    };
    let mut changed = BTreeSet::new();
    for rank in 0..8 {
        for file in 0..8 {
            let before = prev.board[rank][file].map(|p| p.glyph);
            let after = next.board[rank][file].map(|p| p.glyph);
            if before != after {
                changed.insert((rank, file));
            }
        }
    }
    changed
}

/// The entry at `index` clamped into range, or the nearest earlier entry
/// that is present. `None` only when nothing at or before it is present.
pub fn get_state_for_index<T>(timeline: &[Option<T>], index: isize) -> Option<&T> {
    if timeline.is_empty() {
        return None;
    }
    let clamped = index.clamp(0, timeline.len() as isize - 1) as usize;
    timeline[..=clamped].iter().rev().find_map(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::fen::parse_fen;

    #[test]
    fn white_orientation_starts_at_a8() {
        let pos = Position::default();
        let squares = board_to_squares(&pos.board, Orientation::White);
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].coord, "a8");
        assert!(squares[0].is_light);
        assert_eq!(squares[0].piece.map(|p| p.fen_char()), Some('r'));
        assert_eq!(squares[63].coord, "h1");
        assert!(squares[63].is_light);
        assert_eq!(squares[56].coord, "a1");
        assert!(!squares[56].is_light);
    }

    #[test]
    fn black_orientation_reverses_both_axes() {
        let pos = Position::default();
        let squares = board_to_squares(&pos.board, Orientation::Black);
        assert_eq!(squares[0].coord, "h1");
        assert_eq!((squares[0].matrix_rank, squares[0].matrix_file), (7, 7));
        assert_eq!(squares[63].coord, "a8");
        assert_eq!(squares[7].coord, "a1");
    }

    #[test]
    fn labels() {
        assert_eq!(file_labels(Orientation::White)[0], 'a');
        assert_eq!(file_labels(Orientation::Black)[0], 'h');
        assert_eq!(rank_labels(Orientation::White)[0], '8');
        assert_eq!(rank_labels(Orientation::Black)[0], '1');
        assert_eq!(Orientation::White.flipped(), Orientation::Black);
    }

    #[test]
    fn diff_after_e4() {
        let before = Position::default();
        let after = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        let changed = diff_boards(Some(&before), Some(&after));
        assert_eq!(changed, BTreeSet::from([(4, 4), (6, 4)]));
        assert!(diff_boards(None, Some(&after)).is_empty());
        assert!(diff_boards(Some(&before), Some(&before)).is_empty());
    }

    #[test]
    fn sparse_timeline_walks_back() {
        let timeline = [Some(0), None, Some(2), None, None];
        assert_eq!(get_state_for_index(&timeline, 4), Some(&2));
        assert_eq!(get_state_for_index(&timeline, 1), Some(&0));
        assert_eq!(get_state_for_index(&timeline, 99), Some(&2));
        assert_eq!(get_state_for_index(&timeline, -3), Some(&0));
        assert_eq!(get_state_for_index::<u8>(&[], 0), None);
        assert_eq!(get_state_for_index::<u8>(&[None, None], 1), None);
    }
}
