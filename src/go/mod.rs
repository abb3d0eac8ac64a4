pub mod board;
pub mod game;
pub mod layout;

pub use board::{Captures, Cell, GoBoard, PlayedStone, Stone};
pub use game::{GoGame, GoOptions, GoSnapshot, MoveNumbers};
pub use layout::{Marker, PlacedMarker, column_label, row_label, star_points};
