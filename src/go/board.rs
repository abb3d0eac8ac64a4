use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sgf::node::MAX_COORD;

// ---------------------------------------------------------------------------
// Cell / Stone
// ---------------------------------------------------------------------------

/// The occupancy state of a single intersection on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Black,
    White,
}

/// The colour of a stone being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl From<Stone> for Cell {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => Cell::Black,
            Stone::White => Cell::White,
        }
    }
}

/// Stones captured *by* each colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Captures {
    pub black: usize,
    pub white: usize,
}

impl Captures {
    pub fn by(&self, stone: Stone) -> usize {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, n: usize) {
        match stone {
            Stone::Black => self.black += n,
            Stone::White => self.white += n,
        }
    }
}

/// A committed placement, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayedStone {
    pub color: Stone,
    pub x: usize,
    pub y: usize,
}

// ---------------------------------------------------------------------------
// GoBoard
// ---------------------------------------------------------------------------

/// A Go position with capture resolution.
///
/// # Coordinate system
///
/// `(x, y)` are 0-indexed from the top-left corner, `x` along a row and `y`
/// down the columns, matching the SGF convention that `'a'` on each axis maps
/// to 0. Cells are stored row-major: `cells[y * size + x]`.
///
/// # Invariant
///
/// Every group left on the board after a successful [`GoBoard::play`] has at
/// least one liberty. A failed `play` leaves the board, capture counts and
/// history exactly as they were.
///
/// # Ko
///
/// Only simple ko is enforced: a move whose resulting position equals the
/// position before the previous committed move is rejected. Positional
/// superko is not checked.
///
/// There is no undo. Callers that need an earlier position rebuild it with
/// [`GoBoard::reset`] and a replay of the move prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoBoard {
    size: usize,
    cells: Vec<Cell>,
    captures: Captures,
    /// Position before each committed move, oldest first.
    history: Vec<Vec<Cell>>,
    moves: Vec<PlayedStone>,
}

impl GoBoard {
    /// Sizes above the largest SGF-addressable board are capped to it.
    pub fn new(size: usize) -> Self {
        let size = size.min(MAX_COORD);
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            captures: Captures::default(),
            history: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// Clear to an empty board of `size`, dropping history and captures.
    pub fn reset(&mut self, size: usize) {
        *self = Self::new(size);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major cells, `size * size` long.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn captures(&self) -> Captures {
        self.captures
    }

    pub fn moves(&self) -> &[PlayedStone] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<PlayedStone> {
        self.moves.last().copied()
    }

    /// The cell at `(x, y)`, or `None` off the board.
    pub fn get(&self, x: isize, y: isize) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.index(x as usize, y as usize).map(|idx| self.cells[idx])
    }

    /// Put a setup stone (`AB`/`AW`) without capture checks or history.
    /// Returns `false` off the board.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Try to play `color` at `(x, y)`.
    ///
    /// Returns `false` with the board untouched when the point is off the
    /// board or occupied, when the move would be suicide (no liberties and
    /// nothing captured), or when it retakes a simple ko.
    pub fn play(&mut self, x: usize, y: usize, color: Stone) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if self.cells[idx] != Cell::Empty {
            return false;
        }

        let before = self.cells.clone();
        self.cells[idx] = color.into();

        let opponent = Cell::from(color.opponent());
        let mut captured = 0;
        for n in self.neighbors(idx) {
            // An earlier neighbour may already have removed this group.
            if self.cells[n] != opponent {
                continue;
            }
            let group = self.group(n);
            if self.liberties(&group) == 0 {
                for &stone in &group {
                    self.cells[stone] = Cell::Empty;
                }
                captured += group.len();
            }
        }

        if captured == 0 && self.liberties(&self.group(idx)) == 0 {
            self.cells = before;
            return false;
        }
        if self.history.last() == Some(&self.cells) {
            tracing::debug!(x, y, ?color, "rejecting simple ko recapture");
            self.cells = before;
            return false;
        }

        self.captures.add(color, captured);
        self.history.push(before);
        self.moves.push(PlayedStone { color, x, y });
        true
    }

    /// Every point of the group containing `(x, y)`; empty for an empty or
    /// off-board point.
    pub fn group_at(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        match self.index(x, y) {
            Some(idx) if self.cells[idx] != Cell::Empty => self
                .group(idx)
                .into_iter()
                .map(|i| (i % self.size, i / self.size))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Liberty count of the group containing `(x, y)`.
    pub fn liberties_at(&self, x: usize, y: usize) -> Option<usize> {
        let idx = self.index(x, y)?;
        if self.cells[idx] == Cell::Empty {
            return None;
        }
        Some(self.liberties(&self.group(idx)))
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    fn neighbors(&self, idx: usize) -> Vec<usize> {
        let (x, y) = (idx % self.size, idx / self.size);
        let mut result = Vec::with_capacity(4);
        if x > 0 {
            result.push(idx - 1);
        }
        if x + 1 < self.size {
            result.push(idx + 1);
        }
        if y > 0 {
            result.push(idx - self.size);
        }
        if y + 1 < self.size {
            result.push(idx + self.size);
        }
        result
    }

    /// Flood fill over same-coloured 4-neighbours. Iterative so that large
    /// groups on 19x19 cannot exhaust the stack.
    fn group(&self, start: usize) -> Vec<usize> {
        let color = self.cells[start];
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        let mut group = Vec::new();

        while let Some(idx) = stack.pop() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            group.push(idx);
            for n in self.neighbors(idx) {
                if !visited[n] && self.cells[n] == color {
                    stack.push(n);
                }
            }
        }
        group
    }

    /// Distinct empty points adjacent to any stone of `group`.
    fn liberties(&self, group: &[usize]) -> usize {
        let mut liberties = HashSet::new();
        for &stone in group {
            for n in self.neighbors(stone) {
                if self.cells[n] == Cell::Empty {
                    liberties.insert(n);
                }
            }
        }
        liberties.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
