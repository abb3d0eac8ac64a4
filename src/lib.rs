pub mod bridge;
pub mod chess;
pub mod error;
pub mod go;
pub mod sgf;
pub mod walker;

pub use bridge::{Deal, PbnDocument, parse_deal, parse_deal_strict};
pub use chess::{ChessController, ChessViewer, Position, build_timeline_from_pgn, parse_fen};
pub use error::FormatError;
pub use go::{GoBoard, GoGame, GoOptions};
pub use sgf::{GameRecord, SgfNode, parse_sgf, write_sgf};
pub use walker::{MoveCursor, Navigate, Replay};
