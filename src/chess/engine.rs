use anyhow::{Context, Result};
use serde::Serialize;
use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, File, Move, Position as _, Role, Square,
    fen::Fen,
    san::{San, SanPlus},
};

use crate::chess::fen::{PieceColor, PieceKind, default_fen};

/// A move the engine accepted, in the shape the UI layer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedMove {
    /// SAN with check suffix, e.g. `Qh4+`.
    pub san: String,
    pub from: String,
    /// Destination square. Castling reports the king's destination.
    pub to: String,
    pub promotion: Option<PieceKind>,
    pub color: PieceColor,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
}

/// The narrow capability the timeline builder needs from a rules engine.
pub trait RulesEngine {
    fn load_position(&mut self, fen: &str) -> Result<()>;

    /// Play a SAN token. `None` (and no state change) when it is not legal.
    fn apply_san(&mut self, san: &str) -> Option<PlayedMove>;

    fn current_fen(&self) -> String;

    fn is_check(&self) -> bool;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_draw(&self) -> bool;
}

/// What the interactive controller additionally needs.
pub trait InteractiveEngine: RulesEngine {
    /// Legal moves whose origin is `square` (e.g. `"e2"`).
    fn legal_moves_from(&self, square: &str) -> Vec<PlayedMove>;

    fn apply_coords(&mut self, from: &str, to: &str, promotion: Option<PieceKind>) -> Option<PlayedMove>;

    /// Take back the last move played on this engine.
    fn undo(&mut self) -> Option<PlayedMove>;

    fn turn(&self) -> PieceColor;

    fn is_insufficient_material(&self) -> bool;

    fn is_threefold_repetition(&self) -> bool;
}

/// [`RulesEngine`] backed by `shakmaty`, with an undo stack of earlier
/// positions.
#[derive(Debug, Clone, Default)]
pub struct ShakmatyEngine {
    pos: Chess,
    /// Positions before each played move, paired with that move.
    stack: Vec<(Chess, PlayedMove)>,
}

impl ShakmatyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut engine = Self::new();
        engine.load_position(fen)?;
        Ok(engine)
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    fn play(&mut self, mv: Move) -> PlayedMove {
        let before = self.pos.clone();
        let san = San::from_move(&before, mv.clone());
        self.pos.play_unchecked(mv.clone());
        let played = describe(&before, &mv, san_with_suffix(san, &self.pos));
        self.stack.push((before, played.clone()));
        played
    }

    /// Board, side to move, castling and en passant: the part of a FEN that
    /// decides repetition.
    fn repetition_key(pos: &Chess) -> String {
        let fen = fen_string(pos);
        fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }
}

impl RulesEngine for ShakmatyEngine {
    fn load_position(&mut self, fen: &str) -> Result<()> {
        let trimmed = fen.trim();
        let fen = if trimmed.is_empty() || trimmed == "startpos" { default_fen() } else { trimmed };
        let setup: Fen = fen.parse().with_context(|| format!("unreadable FEN {fen:?}"))?;
        let pos: Chess = setup
            .into_position(CastlingMode::Standard)
            .with_context(|| format!("illegal position {fen:?}"))?;
        self.pos = pos;
        self.stack.clear();
        Ok(())
    }

    fn apply_san(&mut self, san: &str) -> Option<PlayedMove> {
        let parsed: SanPlus = san.parse().ok()?;
        let mv = parsed.san.to_move(&self.pos).ok()?;
        Some(self.play(mv))
    }

    fn current_fen(&self) -> String {
        fen_string(&self.pos)
    }

    fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    fn is_draw(&self) -> bool {
        self.pos.is_stalemate()
            || self.pos.is_insufficient_material()
            || self.pos.halfmoves() >= 100
            || self.is_threefold_repetition()
    }
}

impl InteractiveEngine for ShakmatyEngine {
    fn legal_moves_from(&self, square: &str) -> Vec<PlayedMove> {
        let Ok(from) = square.parse::<Square>() else {
            return Vec::new();
        };
        self.pos
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from() == Some(from))
            .map(|mv| {
                let san = San::from_move(&self.pos, mv.clone());
                let mut after = self.pos.clone();
                after.play_unchecked(mv.clone());
                describe(&self.pos, &mv, san_with_suffix(san, &after))
            })
            .collect()
    }

    fn apply_coords(&mut self, from: &str, to: &str, promotion: Option<PieceKind>) -> Option<PlayedMove> {
        let from = from.parse::<Square>().ok()?;
        let to = to.parse::<Square>().ok()?;
        let promotion = promotion.map(role_of);
        let mv = self
            .pos
            .legal_moves()
            .into_iter()
            .find(|mv| mv.from() == Some(from) && display_to(mv) == to && mv.promotion() == promotion)?;
        Some(self.play(mv))
    }

    fn undo(&mut self) -> Option<PlayedMove> {
        let (before, played) = self.stack.pop()?;
        self.pos = before;
        Some(played)
    }

    fn turn(&self) -> PieceColor {
        color_of(self.pos.turn())
    }

    fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    fn is_threefold_repetition(&self) -> bool {
        let current = Self::repetition_key(&self.pos);
        let earlier = self
            .stack
            .iter()
            .filter(|(pos, _)| Self::repetition_key(pos) == current)
            .count();
        earlier + 1 >= 3
    }
}

fn fen_string(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

fn san_with_suffix(san: San, after: &Chess) -> String {
    if after.is_checkmate() {
        format!("{san}#")
    } else if after.is_check() {
        format!("{san}+")
    } else {
        san.to_string()
    }
}

/// Castling is stored king-takes-rook; report the king's landing square.
fn display_to(mv: &Move) -> Square {
    match mv {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            Square::from_coords(file, king.rank())
        }
        other => other.to(),
    }
}

fn describe(before: &Chess, mv: &Move, san: String) -> PlayedMove {
    PlayedMove {
        san,
        from: mv.from().map(|sq| sq.to_string()).unwrap_or_default(),
        to: display_to(mv).to_string(),
        promotion: mv.promotion().map(kind_of),
        color: color_of(before.turn()),
        piece: kind_of(mv.role()),
        captured: mv.capture().map(kind_of),
    }
}

fn kind_of(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn role_of(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}

fn color_of(color: Color) -> PieceColor {
    match color {
        Color::White => PieceColor::White,
        Color::Black => PieceColor::Black,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn san_moves_and_fen() {
        let mut engine = ShakmatyEngine::new();
        let e4 = engine.apply_san("e4").unwrap();
        assert_eq!((e4.from.as_str(), e4.to.as_str()), ("e2", "e4"));
        assert_eq!(e4.color, PieceColor::White);
        assert_eq!(engine.current_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        assert!(engine.apply_san("e4").is_none());
        assert!(engine.apply_san("garbage").is_none());
        assert_eq!(engine.turn(), PieceColor::Black);
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut engine = ShakmatyEngine::new();
        for san in ["f3", "e5", "g4"] {
            engine.apply_san(san).unwrap();
        }
        let mate = engine.apply_san("Qh4#").unwrap();
        assert_eq!(mate.san, "Qh4#");
        assert!(engine.is_check());
        assert!(engine.is_checkmate());
        assert!(!engine.is_draw());
    }

    #[test]
    fn castling_reports_king_destination() {
        let mut engine = ShakmatyEngine::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let targets: Vec<String> = engine.legal_moves_from("e1").into_iter().map(|m| m.to).collect();
        assert!(targets.contains(&"g1".to_string()));
        assert!(targets.contains(&"c1".to_string()));
        let castle = engine.apply_coords("e1", "g1", None).unwrap();
        assert_eq!(castle.san, "O-O");
        assert_eq!(castle.piece, PieceKind::King);
    }

    #[test]
    fn promotion_needs_the_piece() {
        let mut engine = ShakmatyEngine::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        assert!(engine.apply_coords("a7", "a8", None).is_none());
        let promoted = engine.apply_coords("a7", "a8", Some(PieceKind::Knight)).unwrap();
        assert_eq!(promoted.promotion, Some(PieceKind::Knight));
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut engine = ShakmatyEngine::new();
        let start = engine.current_fen();
        engine.apply_san("d4").unwrap();
        assert_eq!(engine.undo().unwrap().san, "d4");
        assert_eq!(engine.current_fen(), start);
        assert!(engine.undo().is_none());
    }

    #[test]
    fn knight_shuffle_repeats_three_times() {
        let mut engine = ShakmatyEngine::new();
        for _ in 0..2 {
            for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
                engine.apply_san(san).unwrap();
            }
        }
        assert!(engine.is_threefold_repetition());
        assert!(engine.is_draw());
    }

    #[test]
    fn bad_fen_is_an_error() {
        assert!(ShakmatyEngine::from_fen("not a fen").is_err());
        // Geometrically fine but both kings missing.
        assert!(ShakmatyEngine::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(ShakmatyEngine::from_fen("startpos").is_ok());
    }

    #[test]
    fn fifty_move_rule_is_a_draw() {
        let engine = ShakmatyEngine::from_fen("8/8/8/4k3/8/8/3R4/4K3 w - - 100 80").unwrap();
        assert!(!engine.is_stalemate());
        assert!(!engine.is_insufficient_material());
        assert!(engine.is_draw());
        let engine = ShakmatyEngine::from_fen("8/8/8/4k3/8/8/3R4/4K3 w - - 99 80").unwrap();
        assert!(!engine.is_draw());
    }

    #[test]
    fn insufficient_material_is_a_draw() {
        let engine = ShakmatyEngine::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(engine.is_insufficient_material());
        assert!(engine.is_draw());
    }
}
