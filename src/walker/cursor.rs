use serde::Serialize;

use crate::walker::Navigate;

/// Position inside a closed window `[first, last]` of replayable indices.
///
/// Go uses `first = -1` for "setup stones only"; chess timelines start at 0.
/// An empty move list still has one valid index, `first` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveCursor {
    first: isize,
    last: isize,
    current: isize,
}

impl MoveCursor {
    /// `last` below `first` is raised to `first`; `current` is clamped.
    pub fn new(first: isize, last: isize, current: isize) -> Self {
        let last = last.max(first);
        Self { first, last, current: current.clamp(first, last) }
    }

    /// Window for a list of `len` moves where `first` means "before move 0".
    pub fn for_moves(first: isize, len: usize) -> Self {
        let last = first + len as isize - if first < 0 { 0 } else { 1 };
        Self::new(first, last, first)
    }

    pub fn current(&self) -> isize {
        self.current
    }

    pub fn first(&self) -> isize {
        self.first
    }

    pub fn last(&self) -> isize {
        self.last
    }

    pub fn contains(&self, index: isize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// Move to `index`. Returns `false` and stays put when out of range.
    pub fn go_to(&mut self, index: isize) -> bool {
        if !self.contains(index) {
            return false;
        }
        self.current = index;
        true
    }

    /// Move one step forward. Returns `false` if already at the end.
    pub fn advance(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    /// Move one step back. Returns `false` if already at the start.
    pub fn retreat(&mut self) -> bool {
        self.go_to(self.current - 1)
    }

    /// The index a navigation command points at. May be out of range
    /// (`Prev` at the start, `Next` at the end, a bad `Jump`).
    pub fn resolve(&self, cmd: Navigate) -> isize {
        match cmd {
            Navigate::Start => self.first,
            Navigate::Prev => self.current - 1,
            Navigate::Next => self.current + 1,
            Navigate::End => self.last,
            Navigate::Jump(index) => index,
        }
    }
}
