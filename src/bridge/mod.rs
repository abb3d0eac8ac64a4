pub mod auction;
pub mod deal;
pub mod pbn;

pub use auction::{AuctionGrid, Call};
pub use deal::{Deal, Direction, Hand, Suit, parse_deal, parse_deal_strict};
pub use pbn::{PbnDocument, Vulnerability, parse};
