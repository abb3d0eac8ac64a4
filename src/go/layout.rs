use serde::Serialize;

/// Column letters used under the board; `I` is skipped.
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Star points (hoshi) for the standard sizes. Other sizes have none.
pub fn star_points(size: usize) -> Vec<(usize, usize)> {
    match size {
        19 => {
            let lines = [3, 9, 15];
            lines.iter().flat_map(|&y| lines.iter().map(move |&x| (x, y))).collect()
        }
        13 => vec![(3, 3), (9, 3), (6, 6), (3, 9), (9, 9)],
        9 => vec![(2, 2), (6, 2), (4, 4), (2, 6), (6, 6)],
        _ => Vec::new(),
    }
}

/// Letter for column `x`, or `None` past the 25th column.
pub fn column_label(x: usize) -> Option<char> {
    COLUMNS.get(x).map(|&b| b as char)
}

/// Row numbers count up from the bottom edge.
pub fn row_label(y: usize, size: usize) -> Option<usize> {
    (y < size).then(|| size - y)
}

/// An annotation drawn on (or beside) an intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Marker {
    /// The most recent move, when it carries no number.
    Last,
    /// 1-based move number of the stone still standing here.
    Number(usize),
    /// `LB` text.
    Label(String),
    Triangle,
    Square,
    Circle,
}

/// A marker together with its intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedMarker {
    pub x: usize,
    pub y: usize,
    pub marker: Marker,
}
