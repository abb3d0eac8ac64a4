use serde::Serialize;

use crate::bridge::deal::Direction;

/// Column order of a printed bidding table.
pub const COLUMNS: [Direction; 4] = [Direction::W, Direction::N, Direction::E, Direction::S];

/// A call as it appears in the bidding table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Call {
    Pass,
    Double,
    Redouble,
    /// A contract bid such as `1NT` or `4S`, or any other token verbatim.
    Bid(String),
}

impl Call {
    pub fn parse(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "pass" | "p" => Self::Pass,
            "dbl" | "x" => Self::Double,
            "rdbl" | "xx" => Self::Redouble,
            _ => Self::Bid(token.to_string()),
        }
    }
}

/// The auction laid out four calls to a row under `W N E S`.
///
/// Seats before the dealer in the first row are blank (`None`), `AP` is not
/// a call and is dropped, and the last row is padded with blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuctionGrid {
    pub rows: Vec<[Option<Call>; 4]>,
    /// Whether the auction ended with `AP` (all pass).
    pub all_pass: bool,
}

impl AuctionGrid {
    /// An unknown dealer starts the auction in the West column.
    pub fn build(dealer: Option<Direction>, auction: &[String]) -> Self {
        let offset = dealer.and_then(|d| COLUMNS.iter().position(|&c| c == d)).unwrap_or(0);
        let mut cells: Vec<Option<Call>> = vec![None; offset];
        let mut all_pass = false;
        for token in auction {
            if token.eq_ignore_ascii_case("AP") {
                all_pass = true;
                continue;
            }
            cells.push(Some(Call::parse(token)));
        }
        if cells.iter().all(Option::is_none) {
            return Self { rows: Vec::new(), all_pass };
        }
        while cells.len() % 4 != 0 {
            cells.push(None);
        }

        let rows = cells
            .chunks_exact(4)
            .map(|chunk| [chunk[0].clone(), chunk[1].clone(), chunk[2].clone(), chunk[3].clone()])
            .collect();
        Self { rows, all_pass }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
