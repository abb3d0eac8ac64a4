pub mod controller;
pub mod engine;
pub mod fen;
pub mod pgn;
pub mod squares;
pub mod timeline;

pub use controller::{CapturedPieces, ChessController, ChessSnapshot, GameStatus};
pub use engine::{InteractiveEngine, PlayedMove, RulesEngine, ShakmatyEngine};
pub use fen::{Board, DEFAULT_FEN, Piece, PieceColor, PieceKind, Position, default_fen, glyph, parse_fen, to_fen};
pub use pgn::{MoveEntry, build_pgn_from_moves, extract_pgn_metadata, extract_san_moves, format_move_label};
pub use squares::{
    Orientation, SquareView, board_to_squares, diff_boards, file_labels, get_state_for_index, rank_labels, square_name,
};
pub use timeline::{ChessConfig, ChessViewer, Timeline, build_timeline_from_pgn, build_timeline_with};
