use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    chess::{
        engine::{InteractiveEngine, PlayedMove, ShakmatyEngine},
        fen::{PieceColor, PieceKind, Position, glyph, parse_fen},
        pgn::{MoveEntry, build_pgn_from_moves, extract_san_moves},
    },
    error::FormatError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    pub in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: bool,
    pub insufficient: bool,
    pub repetition: bool,
    pub turn: PieceColor,
}

/// Glyphs of the pieces each side has taken so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapturedPieces {
    pub white: Vec<&'static str>,
    pub black: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChessSnapshot {
    pub position: Position,
    pub fen: String,
    pub status: GameStatus,
    pub cursor: usize,
    pub history_length: usize,
    pub last_move: Option<PlayedMove>,
    pub captures: CapturedPieces,
    pub pgn: String,
}

/// Interactive board: moves are played on the engine, and undone moves stay
/// available for redo until a different move is made.
#[derive(Debug, Clone)]
pub struct ChessController<E: InteractiveEngine = ShakmatyEngine> {
    engine: E,
    history: Vec<PlayedMove>,
    /// Number of `history` entries currently applied on the engine.
    cursor: usize,
    initial_fen: String,
}

impl Default for ChessController<ShakmatyEngine> {
    fn default() -> Self {
        Self::new(ShakmatyEngine::new())
    }
}

impl<E: InteractiveEngine> ChessController<E> {
    pub fn new(engine: E) -> Self {
        let initial_fen = engine.current_fen();
        Self { engine, history: Vec::new(), cursor: 0, initial_fen }
    }

    /// Reset to `fen` and play the PGN movetext on top of it. Tokens the
    /// engine rejects are skipped.
    pub fn load(&mut self, fen: &str, pgn: &str) -> Result<ChessSnapshot> {
        self.engine
            .load_position(fen)
            .with_context(|| format!("cannot load chess position {fen:?}"))?;
        self.initial_fen = self.engine.current_fen();
        self.history.clear();
        self.cursor = 0;
        for san in extract_san_moves(pgn) {
            match self.engine.apply_san(&san) {
                Some(played) => {
                    self.history.push(played);
                    self.cursor = self.history.len();
                }
                None => tracing::warn!(san = %san, "scripted move rejected"),
            }
        }
        Ok(self.snapshot()?)
    }

    /// Play `from`-`to`. A pawn reaching the last rank without an explicit
    /// piece becomes a queen. Any undone moves are discarded.
    pub fn make_move(&mut self, from: &str, to: &str, promotion: Option<PieceKind>) -> Option<PlayedMove> {
        let promotion = promotion.or_else(|| self.requires_promotion(from, to).then_some(PieceKind::Queen));
        let played = self.engine.apply_coords(from, to, promotion)?;
        self.history.truncate(self.cursor);
        self.history.push(played.clone());
        self.cursor = self.history.len();
        Some(played)
    }

    pub fn undo(&mut self) -> Option<PlayedMove> {
        if self.cursor == 0 {
            return None;
        }
        let undone = self.engine.undo()?;
        self.cursor -= 1;
        Some(undone)
    }

    pub fn redo(&mut self) -> Option<PlayedMove> {
        let next = self.history.get(self.cursor)?.clone();
        let replayed = self.engine.apply_coords(&next.from, &next.to, next.promotion)?;
        self.cursor += 1;
        Some(replayed)
    }

    /// Walk to `index` in `[0, history_len]` by undo/redo. Out of range is a
    /// no-op returning `false`.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index > self.history.len() {
            return false;
        }
        while self.cursor > index {
            if self.undo().is_none() {
                break;
            }
        }
        while self.cursor < index {
            if self.redo().is_none() {
                break;
            }
        }
        self.cursor == index
    }

    pub fn legal_moves(&self, square: &str) -> Vec<PlayedMove> {
        self.engine.legal_moves_from(square)
    }

    /// Destination squares for the piece on `square`, sorted and without
    /// duplicates.
    pub fn legal_targets(&self, square: &str) -> Vec<String> {
        let mut targets: Vec<String> = self.legal_moves(square).into_iter().map(|m| m.to).collect();
        targets.sort();
        targets.dedup();
        targets
    }

    pub fn requires_promotion(&self, from: &str, to: &str) -> bool {
        self.legal_moves(from)
            .iter()
            .any(|m| m.to == to && m.promotion.is_some())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn timeline_len(&self) -> usize {
        self.history.len() + 1
    }

    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }

    /// Moves up to the cursor.
    pub fn history(&self) -> &[PlayedMove] {
        &self.history[..self.cursor]
    }

    pub fn last_move(&self) -> Option<&PlayedMove> {
        self.history().last()
    }

    pub fn captures(&self) -> CapturedPieces {
        let mut captures = CapturedPieces::default();
        for mv in self.history() {
            let Some(kind) = mv.captured else { continue };
            let taken = glyph(kind, mv.color.opponent());
            match mv.color {
                PieceColor::White => captures.white.push(taken),
                PieceColor::Black => captures.black.push(taken),
            }
        }
        captures
    }

    pub fn status(&self) -> GameStatus {
        GameStatus {
            in_check: self.engine.is_check(),
            checkmate: self.engine.is_checkmate(),
            stalemate: self.engine.is_stalemate(),
            draw: self.engine.is_draw(),
            insufficient: self.engine.is_insufficient_material(),
            repetition: self.engine.is_threefold_repetition(),
            turn: self.engine.turn(),
        }
    }

    pub fn pgn(&self) -> String {
        let entries: Vec<MoveEntry> = self
            .history()
            .iter()
            .enumerate()
            .map(|(i, m)| MoveEntry { san: m.san.clone(), label: m.san.clone(), ply: i + 1 })
            .collect();
        build_pgn_from_moves(&entries)
    }

    pub fn snapshot(&self) -> Result<ChessSnapshot, FormatError> {
        let fen = self.engine.current_fen();
        Ok(ChessSnapshot {
            position: parse_fen(&fen)?,
            fen,
            status: self.status(),
            cursor: self.cursor,
            history_length: self.history.len(),
            last_move: self.last_move().cloned(),
            captures: self.captures(),
            pgn: self.pgn(),
        })
    }
}
