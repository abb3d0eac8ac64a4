use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    chess::{
        engine::{RulesEngine, ShakmatyEngine},
        fen::{Position, parse_fen, to_fen},
        pgn::{MoveEntry, build_pgn_from_moves, extract_san_moves},
        squares::{Orientation, SquareView, board_to_squares, diff_boards, get_state_for_index},
    },
    error::FormatError,
    walker::{MoveCursor, Navigate, Replay},
};

/// Widget options for a chess diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChessConfig {
    pub fen: String,
    pub pgn: String,
    pub orientation: Orientation,
    pub interactive: bool,
}

impl Default for ChessConfig {
    fn default() -> Self {
        Self {
            fen: "startpos".to_string(),
            pgn: String::new(),
            orientation: Orientation::White,
            interactive: false,
        }
    }
}

/// Positions before and after every accepted move.
///
/// `positions[0]` is the base position and `positions[k]` the position after
/// `moves[k - 1]`, so there is always exactly one more position than moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub positions: Vec<Position>,
    pub moves: Vec<MoveEntry>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// [`build_timeline_with`] on a fresh [`ShakmatyEngine`].
pub fn build_timeline_from_pgn(fen: &str, pgn: &str) -> Result<Timeline, FormatError> {
    build_timeline_with(&mut ShakmatyEngine::new(), fen, pgn)
}

/// Replay the PGN movetext from `fen`, snapshotting after every move.
///
/// Fails only when `fen` itself is not a well-formed board. Tokens the engine
/// rejects are skipped with a warning. When the engine refuses the base
/// position (say, no kings) the timeline is that position alone.
pub fn build_timeline_with<E: RulesEngine>(engine: &mut E, fen: &str, pgn: &str) -> Result<Timeline, FormatError> {
    let base = parse_fen(fen)?;
    if let Err(e) = engine.load_position(&to_fen(&base)) {
        tracing::warn!(error = %e, "rules engine refused the base position; showing it without moves");
        return Ok(Timeline { positions: vec![base], moves: Vec::new() });
    }

    let mut positions = vec![parse_fen(&engine.current_fen())?];
    let mut moves = Vec::new();
    for san in extract_san_moves(pgn) {
        let Some(played) = engine.apply_san(&san) else {
            tracing::warn!(san = %san, ply = moves.len() + 1, "skipping move the engine rejected");
            continue;
        };
        let ply = moves.len() + 1;
        moves.push(MoveEntry { label: played.san.clone(), san: played.san, ply });
        positions.push(parse_fen(&engine.current_fen())?);
    }
    tracing::debug!(plies = moves.len(), "built chess timeline");
    Ok(Timeline { positions, moves })
}

/// Read-only viewer over a timeline. Frames may be sparse: a missing frame
/// shows the nearest earlier one.
#[derive(Debug, Clone)]
pub struct ChessViewer {
    frames: Vec<Option<Position>>,
    moves: Vec<MoveEntry>,
    cursor: MoveCursor,
    orientation: Orientation,
}

impl ChessViewer {
    /// Starts on the final position.
    pub fn new(timeline: Timeline, orientation: Orientation) -> Self {
        Self::from_frames(timeline.positions.into_iter().map(Some).collect(), timeline.moves, orientation)
    }

    pub fn from_frames(frames: Vec<Option<Position>>, moves: Vec<MoveEntry>, orientation: Orientation) -> Self {
        let cursor = MoveCursor::for_moves(0, frames.len().max(1));
        let last = cursor.last();
        let mut viewer = Self { frames, moves, cursor, orientation };
        viewer.cursor.go_to(last);
        viewer
    }

    pub fn from_config(config: &ChessConfig) -> Result<Self, FormatError> {
        let timeline = build_timeline_from_pgn(&config.fen, &config.pgn)?;
        Ok(Self::new(timeline, config.orientation))
    }

    /// Out-of-range indices change nothing.
    pub fn jump_to(&mut self, index: isize) -> bool {
        self.seek(index)
    }

    pub fn apply(&mut self, cmd: Navigate) -> bool {
        self.navigate(cmd)
    }

    pub fn index(&self) -> usize {
        self.cursor.current().max(0) as usize
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn moves(&self) -> &[MoveEntry] {
        &self.moves
    }

    pub fn current(&self) -> Option<&Position> {
        get_state_for_index(&self.frames, self.cursor.current())
    }

    pub fn previous(&self) -> Option<&Position> {
        let index = self.cursor.current();
        if index <= 0 {
            return None;
        }
        get_state_for_index(&self.frames, index - 1)
    }

    /// The move that led to the current frame.
    pub fn last_move(&self) -> Option<&MoveEntry> {
        self.index().checked_sub(1).and_then(|i| self.moves.get(i))
    }

    /// Cells to highlight as just changed.
    pub fn changed_cells(&self) -> BTreeSet<(usize, usize)> {
        diff_boards(self.previous(), self.current())
    }

    pub fn squares(&self) -> Vec<SquareView> {
        self.current()
            .map(|pos| board_to_squares(&pos.board, self.orientation))
            .unwrap_or_default()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn flip(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// Movetext up to the displayed position.
    pub fn pgn_text(&self) -> String {
        let shown = self.index().min(self.moves.len());
        build_pgn_from_moves(&self.moves[..shown])
    }
}

impl Replay for ChessViewer {
    fn cursor(&self) -> &MoveCursor {
        &self.cursor
    }

    fn replay_to(&mut self, index: isize) {
        self.cursor.go_to(index);
    }
}
