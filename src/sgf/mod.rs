pub mod node;
pub mod record;
mod parser;
mod serializer;

pub use node::{GameInfo, Property, SgfNode, coord_to_sgf, sgf_to_coord};
pub use parser::parse_sgf;
pub use record::GameRecord;
pub use serializer::write_sgf;
