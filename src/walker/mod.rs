mod cursor;
pub use cursor::MoveCursor;

use serde::{Deserialize, Serialize};

/// Navigation commands shared by every replayable viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Navigate {
    Start,
    Prev,
    Next,
    End,
    Jump(isize),
}

/// A viewer whose displayed state is a pure function of a move index.
///
/// Implementors rebuild the state for an index from scratch (Go replays the
/// prefix from setup, chess reads a precomputed timeline frame), so seeking to
/// the same index always yields the same state regardless of the path taken.
pub trait Replay {
    fn cursor(&self) -> &MoveCursor;

    /// Rebuild the state for `index` and move the cursor there. Only called
    /// with an index inside the cursor window.
    fn replay_to(&mut self, index: isize);

    /// Returns `false` and changes nothing when `index` is out of range.
    fn seek(&mut self, index: isize) -> bool {
        if !self.cursor().contains(index) {
            tracing::debug!(index, "seek out of range ignored");
            return false;
        }
        self.replay_to(index);
        true
    }

    fn navigate(&mut self, cmd: Navigate) -> bool {
        let target = self.cursor().resolve(cmd);
        self.seek(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts how many times state is rebuilt.
    struct Frames {
        cursor: MoveCursor,
        rebuilt: usize,
    }

    impl Replay for Frames {
        fn cursor(&self) -> &MoveCursor {
            &self.cursor
        }

        fn replay_to(&mut self, index: isize) {
            self.rebuilt += 1;
            self.cursor.go_to(index);
        }
    }

    #[test]
    fn navigation_walks_the_window() {
        let mut frames = Frames { cursor: MoveCursor::for_moves(-1, 3), rebuilt: 0 };
        assert!(frames.navigate(Navigate::End));
        assert_eq!(frames.cursor().current(), 2);
        assert!(!frames.navigate(Navigate::Next));
        assert!(frames.navigate(Navigate::Prev));
        assert!(frames.navigate(Navigate::Start));
        assert_eq!(frames.cursor().current(), -1);
        assert!(!frames.navigate(Navigate::Prev));
        assert_eq!(frames.rebuilt, 3);
    }

    #[test]
    fn bad_jump_does_not_rebuild() {
        let mut frames = Frames { cursor: MoveCursor::for_moves(0, 2), rebuilt: 0 };
        assert!(!frames.navigate(Navigate::Jump(5)));
        assert!(!frames.navigate(Navigate::Jump(-1)));
        assert_eq!(frames.rebuilt, 0);
        assert!(frames.navigate(Navigate::Jump(1)));
        assert_eq!(frames.cursor().current(), 1);
    }

    #[test]
    fn navigate_deserialises_from_lowercase_names() {
        let cmd: Navigate = serde_json::from_str("\"next\"").unwrap();
        assert_eq!(cmd, Navigate::Next);
        let cmd: Navigate = serde_json::from_str("{\"jump\":4}").unwrap();
        assert_eq!(cmd, Navigate::Jump(4));
    }
}
