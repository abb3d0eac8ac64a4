use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

pub const DEFAULT_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn default_fen() -> &'static str {
    DEFAULT_FEN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase FEN letter.
    pub fn letter(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Case-insensitive.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::Pawn),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl PieceColor {
    pub fn letter(self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub glyph: &'static str,
}

impl Piece {
    pub fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color, glyph: glyph(kind, color) }
    }

    /// `PNBRQK` for white, `pnbrqk` for black.
    pub fn from_fen_char(c: char) -> Option<Self> {
        let kind = PieceKind::from_letter(c)?;
        let color = if c.is_ascii_uppercase() { PieceColor::White } else { PieceColor::Black };
        Some(Self::new(kind, color))
    }

    pub fn fen_char(self) -> char {
        match self.color {
            PieceColor::White => self.kind.letter().to_ascii_uppercase(),
            PieceColor::Black => self.kind.letter(),
        }
    }
}

/// Unicode chess symbol. The black pawn carries U+FE0E so it renders as
/// text rather than emoji.
pub fn glyph(kind: PieceKind, color: PieceColor) -> &'static str {
    match (color, kind) {
        (PieceColor::White, PieceKind::Pawn) => "♙",
        (PieceColor::White, PieceKind::Knight) => "♘",
        (PieceColor::White, PieceKind::Bishop) => "♗",
        (PieceColor::White, PieceKind::Rook) => "♖",
        (PieceColor::White, PieceKind::Queen) => "♕",
        (PieceColor::White, PieceKind::King) => "♔",
        (PieceColor::Black, PieceKind::Pawn) => "♟\u{FE0E}",
        (PieceColor::Black, PieceKind::Knight) => "♞",
        (PieceColor::Black, PieceKind::Bishop) => "♝",
        (PieceColor::Black, PieceKind::Rook) => "♜",
        (PieceColor::Black, PieceKind::Queen) => "♛",
        (PieceColor::Black, PieceKind::King) => "♚",
    }
}

/// `board[rank][file]`, rank 0 is the eighth rank and file 0 the a-file,
/// in the order FEN writes them.
pub type Board = [[Option<Piece>; 8]; 8];

/// A decoded FEN record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub board: Board,
    pub active_color: PieceColor,
    /// As written, `-` when nobody can castle.
    pub castling: String,
    pub en_passant: Option<String>,
    pub halfmove: u32,
    pub fullmove: u32,
    /// The trimmed input (or the default FEN for `startpos`).
    pub fen: String,
}

impl Position {
    pub fn piece_at(&self, rank: usize, file: usize) -> Option<Piece> {
        self.board.get(rank)?.get(file).copied().flatten()
    }
}

impl Default for Position {
    fn default() -> Self {
        let mut board: Board = [[None; 8]; 8];
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back.into_iter().enumerate() {
            board[0][file] = Some(Piece::new(kind, PieceColor::Black));
            board[1][file] = Some(Piece::new(PieceKind::Pawn, PieceColor::Black));
            board[6][file] = Some(Piece::new(PieceKind::Pawn, PieceColor::White));
            board[7][file] = Some(Piece::new(kind, PieceColor::White));
        }
        Self {
            board,
            active_color: PieceColor::White,
            castling: "KQkq".to_string(),
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
            fen: DEFAULT_FEN.to_string(),
        }
    }
}

/// Decode a FEN string.
///
/// `"startpos"` and blank input give the initial position. At least four
/// fields are required and the board must be eight `/`-separated rows of
/// exactly eight squares each; nothing else is fatal. Any side-to-move other
/// than `b`/`B` means white, and missing or non-numeric clocks become `0`
/// and `1`.
pub fn parse_fen(fen: &str) -> Result<Position, FormatError> {
    let trimmed = fen.trim();
    let normalized = if trimmed.is_empty() || trimmed == "startpos" { DEFAULT_FEN } else { trimmed };

    let parts: Vec<&str> = normalized.split_whitespace().collect();
    let [board_part, active, castling, en_passant, clocks @ ..] = parts.as_slice() else {
        return Err(FormatError::invalid("FEN", fen));
    };

    let rows: Vec<&str> = board_part.split('/').collect();
    if rows.len() != 8 {
        return Err(FormatError::invalid("FEN board rows", *board_part));
    }
    let mut board: Board = [[None; 8]; 8];
    for (rank, row) in rows.iter().enumerate() {
        board[rank] = parse_row(row)?;
    }

    let active_color = if active.eq_ignore_ascii_case("b") { PieceColor::Black } else { PieceColor::White };
    let halfmove = parse_clock(clocks.first().copied(), 0, "halfmove clock");
    let fullmove = parse_clock(clocks.get(1).copied(), 1, "fullmove number");

    Ok(Position {
        board,
        active_color,
        castling: castling.to_string(),
        en_passant: (*en_passant != "-").then(|| en_passant.to_string()),
        halfmove,
        fullmove,
        fen: normalized.to_string(),
    })
}

fn parse_row(row: &str) -> Result<[Option<Piece>; 8], FormatError> {
    let mut squares = [None; 8];
    let mut file = 0usize;
    for c in row.chars() {
        if let Some(run) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
            file += run as usize;
        } else if let Some(piece) = Piece::from_fen_char(c) {
            if file < 8 {
                squares[file] = Some(piece);
            }
            file += 1;
        } else {
            return Err(FormatError::invalid("FEN character", c.to_string()));
        }
        if file > 8 {
            return Err(FormatError::invalid("FEN row length", row));
        }
    }
    if file != 8 {
        return Err(FormatError::invalid("FEN row length", row));
    }
    Ok(squares)
}

fn parse_clock(field: Option<&str>, default: u32, what: &'static str) -> u32 {
    let Some(raw) = field else { return default };
    raw.parse().unwrap_or_else(|_| {
        tracing::debug!(clock = what, raw, "non-numeric FEN clock, using default");
        default
    })
}

/// Encode a position back to FEN. Inverse of [`parse_fen`] on its fields.
pub fn to_fen(position: &Position) -> String {
    let mut out = String::with_capacity(90);
    for (rank, row) in position.board.iter().enumerate() {
        if rank > 0 {
            out.push('/');
        }
        let mut empty = 0;
        for square in row {
            match square {
                Some(piece) => {
                    if empty > 0 {
                        let _ = write!(out, "{empty}");
                        empty = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            let _ = write!(out, "{empty}");
        }
    }
    let castling = if position.castling.is_empty() { "-" } else { &position.castling };
    let en_passant = position.en_passant.as_deref().unwrap_or("-");
    let _ = write!(
        out,
        " {} {} {} {} {}",
        position.active_color.letter(),
        castling,
        en_passant,
        position.halfmove,
        position.fullmove
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(row: &[Option<Piece>; 8]) -> String {
        row.iter().map(|sq| sq.map_or('.', Piece::fen_char)).collect()
    }

    #[test]
    fn default_position_layout() {
        let pos = parse_fen(default_fen()).unwrap();
        assert_eq!(kinds(&pos.board[0]), "rnbqkbnr");
        assert_eq!(kinds(&pos.board[7]), "RNBQKBNR");
        assert!(pos.board[0].iter().all(|p| p.is_some_and(|p| p.color == PieceColor::Black)));
        assert_eq!(pos.active_color, PieceColor::White);
        assert_eq!(pos.castling, "KQkq");
        assert_eq!(pos.en_passant, None);
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn startpos_and_blank_are_the_default() {
        assert_eq!(parse_fen("startpos").unwrap(), Position::default());
        assert_eq!(parse_fen("   ").unwrap(), Position::default());
    }

    #[test]
    fn glyphs_follow_colour() {
        let pos = Position::default();
        assert_eq!(pos.piece_at(7, 4).unwrap().glyph, "♔");
        assert_eq!(pos.piece_at(1, 0).unwrap().glyph, "♟\u{FE0E}");
        assert_eq!(pos.piece_at(4, 4), None);
        assert_eq!(pos.piece_at(8, 0), None);
    }

    #[test]
    fn clocks_default_when_absent() {
        let pos = parse_fen("8/8/8/4k3/8/8/8/4K3 b - e3").unwrap();
        assert_eq!(pos.halfmove, 0);
        assert_eq!(pos.fullmove, 1);
        assert_eq!(pos.active_color, PieceColor::Black);
        assert_eq!(pos.en_passant.as_deref(), Some("e3"));
        assert_eq!(to_fen(&pos), "8/8/8/4k3/8/8/8/4K3 b - e3 0 1");
    }

    #[test]
    fn encode_round_trips() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
        assert_eq!(to_fen(&parse_fen(fen).unwrap()), fen);
        assert_eq!(to_fen(&Position::default()), DEFAULT_FEN);
    }

    #[test]
    fn geometry_errors_carry_the_fragment() {
        let err = parse_fen("8/8/8/8 w - -").unwrap_err();
        assert_eq!(err.fragment(), "8/8/8/8");
        let err = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq -").unwrap_err();
        assert_eq!(err.fragment(), "X");
        let err = parse_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap_err();
        assert_eq!(err.fragment(), "ppppppp");
        let err = parse_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap_err();
        assert_eq!(err.fragment(), "9");
        assert!(parse_fen("8/8/8/8/8/8/8/8 w -").is_err());
    }

    #[test]
    fn side_to_move_and_clocks_are_lenient() {
        let pos = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR W KQkq - - -").unwrap();
        assert_eq!(pos.active_color, PieceColor::White);
        assert_eq!((pos.halfmove, pos.fullmove), (0, 1));
        let pos = parse_fen("8/8/8/4k3/8/8/8/4K3 B - - 7 x").unwrap();
        assert_eq!(pos.active_color, PieceColor::Black);
        assert_eq!((pos.halfmove, pos.fullmove), (7, 1));
        assert_eq!(parse_fen("8/8/8/8/8/8/8/8 x - -").unwrap().active_color, PieceColor::White);
    }

    #[test]
    fn overlong_rows_are_rejected() {
        assert!(parse_fen("rnbqkbnrp/8/8/8/8/8/8/8 w - -").is_err());
        assert!(parse_fen("44p/8/8/8/8/8/8/8 w - -").is_err());
    }
}
