use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::error::FormatError;

/// A seat at the table, in clockwise order starting from North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    pub const CLOCKWISE: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    /// Case-insensitive `N`/`E`/`S`/`W`.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::N),
            'E' => Some(Self::E),
            'S' => Some(Self::S),
            'W' => Some(Self::W),
            _ => None,
        }
    }

    /// Accepts a single direction letter, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let dir = Self::from_char(chars.next()?)?;
        chars.next().is_none().then_some(dir)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The next seat clockwise.
    pub fn next(self) -> Self {
        Self::CLOCKWISE[(self.index() + 1) % 4]
    }

    pub fn as_char(self) -> char {
        match self {
            Self::N => 'N',
            Self::E => 'E',
            Self::S => 'S',
            Self::W => 'W',
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

/// Card ranks held in each suit, as written in the deal (`"AKQJ"`, `""` for
/// a void).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    #[serde(rename = "S")]
    pub spades: String,
    #[serde(rename = "H")]
    pub hearts: String,
    #[serde(rename = "D")]
    pub diamonds: String,
    #[serde(rename = "C")]
    pub clubs: String,
}

impl Hand {
    /// `S.H.D.C`; missing trailing suits are voids.
    pub fn parse(token: &str) -> Self {
        let mut suits = token.split('.').map(str::to_string);
        Self {
            spades: suits.next().unwrap_or_default(),
            hearts: suits.next().unwrap_or_default(),
            diamonds: suits.next().unwrap_or_default(),
            clubs: suits.next().unwrap_or_default(),
        }
    }

    pub fn suit(&self, suit: Suit) -> &str {
        match suit {
            Suit::Spades => &self.spades,
            Suit::Hearts => &self.hearts,
            Suit::Diamonds => &self.diamonds,
            Suit::Clubs => &self.clubs,
        }
    }

    /// `false` when every suit is blank, i.e. nothing worth drawing.
    pub fn has_cards(&self) -> bool {
        [&self.spades, &self.hearts, &self.diamonds, &self.clubs]
            .iter()
            .any(|s| !s.trim().is_empty())
    }
}

/// The four hands of a `Deal` tag, indexed by [`Direction::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deal {
    /// The seat whose hand is written first.
    pub first: Direction,
    pub hands: [Option<Hand>; 4],
}

impl Deal {
    pub fn hand(&self, dir: Direction) -> Option<&Hand> {
        self.hands[dir.index()].as_ref()
    }

    /// Seats in clockwise order with their hands.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Option<&Hand>)> {
        Direction::CLOCKWISE.into_iter().map(|d| (d, self.hand(d)))
    }
}

/// Parse a `Deal` value such as `"N:AKQJ.AKQJ.AK.AQJ - 5432.5432.54.754 -"`.
///
/// Fails when the value does not have exactly one `:` or the first seat is
/// not a direction letter. Hand tokens that are `-` or missing are `None`.
pub fn parse_deal_strict(value: &str) -> Result<Deal, FormatError> {
    let parts: Vec<&str> = value.split(':').collect();
    let [first, rest] = parts.as_slice() else {
        return Err(FormatError::invalid("deal", value));
    };
    let first = Direction::parse(first).ok_or_else(|| FormatError::invalid("deal first seat", *first))?;

    let mut tokens = rest.split_whitespace();
    let mut hands: [Option<Hand>; 4] = Default::default();
    let mut dir = first;
    for _ in 0..4 {
        hands[dir.index()] = match tokens.next() {
            Some(token) if token != "-" => Some(Hand::parse(token)),
            _ => None,
        };
        dir = dir.next();
    }
    Ok(Deal { first, hands })
}

/// Tolerant form of [`parse_deal_strict`]: an unusable value is "no deal".
pub fn parse_deal(value: &str) -> Option<Deal> {
    match parse_deal_strict(value) {
        Ok(deal) => Some(deal),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unusable Deal tag");
            None
        }
    }
}
