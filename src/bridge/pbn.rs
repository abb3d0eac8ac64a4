use std::{collections::BTreeMap, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::bridge::deal::{Deal, Direction, parse_deal};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[\s*([A-Za-z0-9_]+)\s+"([^"]*)"\s*\]"#).expect("tag pattern is valid"));

/// A parsed PBN record.
///
/// `hands` is `None` when there is no `Deal` tag or it cannot be read; the
/// caller shows "no deal data" rather than guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PbnDocument {
    pub tags: BTreeMap<String, String>,
    pub hands: Option<Deal>,
    pub auction: Vec<String>,
    pub play: Vec<String>,
}

/// Parse PBN text. Never fails: missing pieces come back empty.
///
/// Every `[Name "Value"]` tag is recorded, later duplicates winning. The
/// auction and play sections are the tokens between the last `Auction` (or
/// `Play`) tag and the next `[`, with `*` record terminators removed.
pub fn parse(text: &str) -> PbnDocument {
    let mut tags = BTreeMap::new();
    let mut auction_end = None;
    let mut play_end = None;

    for caps in TAG_RE.captures_iter(text) {
        let (Some(whole), Some(name), Some(value)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        match name.as_str() {
            "Auction" => auction_end = Some(whole.end()),
            "Play" => play_end = Some(whole.end()),
            _ => {}
        }
        tags.insert(name.as_str().to_string(), value.as_str().to_string());
    }

    let hands = tags.get("Deal").and_then(|deal| parse_deal(deal));
    PbnDocument {
        auction: auction_end.map(|at| section_tokens(text, at)).unwrap_or_default(),
        play: play_end.map(|at| section_tokens(text, at)).unwrap_or_default(),
        tags,
        hands,
    }
}

/// Whitespace-separated tokens from `start` up to the next `[`.
fn section_tokens(text: &str, start: usize) -> Vec<String> {
    let rest = &text[start..];
    let body = rest.find('[').map_or(rest, |end| &rest[..end]);
    body.split_whitespace()
        .map(|token| token.replace('*', ""))
        .filter(|token| !token.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Vulnerability {
    None,
    NorthSouth,
    EastWest,
    Both,
    /// A value outside the PBN vocabulary, kept verbatim.
    Other(String),
}

impl Vulnerability {
    pub fn from_pbn(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "love" | "-" => Self::None,
            "ns" => Self::NorthSouth,
            "ew" => Self::EastWest,
            "both" | "all" => Self::Both,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl PbnDocument {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn dealer(&self) -> Option<Direction> {
        self.tag("Dealer").and_then(Direction::parse)
    }

    pub fn declarer(&self) -> Option<Direction> {
        self.tag("Declarer").and_then(Direction::parse)
    }

    pub fn vulnerability(&self) -> Option<Vulnerability> {
        self.tag("Vulnerable").map(Vulnerability::from_pbn)
    }

    /// `None` for a missing or empty `Contract` tag.
    pub fn contract(&self) -> Option<&str> {
        self.tag("Contract").filter(|c| !c.trim().is_empty())
    }

    /// The `Lead` tag if present, else the first card of the play section.
    pub fn opening_lead(&self) -> Option<&str> {
        self.tag("Lead")
            .filter(|lead| !lead.is_empty())
            .or_else(|| self.play.first().map(String::as_str))
    }

    /// `Date` as `YYYY.MM.DD`. Dates with `?` placeholders are unknown.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.tag("Date")?.trim(), "%Y.%m.%d").ok()
    }

    pub fn has_deal(&self) -> bool {
        self.hands
            .as_ref()
            .is_some_and(|deal| deal.iter().any(|(_, hand)| hand.is_some_and(|h| h.has_cards())))
    }
}
