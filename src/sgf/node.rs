use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::Serialize;

/// Largest coordinate an SGF point can encode (`a..z` then `A..Z`).
pub const MAX_COORD: usize = 52;

/// Decode a two-letter SGF point into zero-based `(x, y)`.
///
/// Lowercase letters map to 0..25 and uppercase letters to 26..51 (FF[4]).
/// Anything that is not exactly two letters yields `None`; an empty value
/// (the FF[4] pass) is therefore `None` too.
pub fn sgf_to_coord(s: &str) -> Option<(usize, usize)> {
    let mut chars = s.chars();
    let x = decode_axis(chars.next()?)?;
    let y = decode_axis(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some((x, y))
}

/// Encode zero-based `(x, y)` as an SGF point. Inverse of [`sgf_to_coord`].
pub fn coord_to_sgf(x: usize, y: usize) -> Option<String> {
    Some(format!("{}{}", encode_axis(x)?, encode_axis(y)?))
}

fn decode_axis(c: char) -> Option<usize> {
    match c {
        'a'..='z' => Some(c as usize - 'a' as usize),
        'A'..='Z' => Some(c as usize - 'A' as usize + 26),
        _ => None,
    }
}

fn encode_axis(n: usize) -> Option<char> {
    match n {
        0..=25 => Some((b'a' + n as u8) as char),
        26..=51 => Some((b'A' + (n - 26) as u8) as char),
        _ => None,
    }
}

/// One property of a node: an identifier and its bracketed values, in
/// source order. A parsed property always has at least one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub ident: String,
    pub values: Vec<String>,
}

/// A single SGF node. Properties keep their source order; a repeated
/// identifier inside the same node extends the existing value list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SgfNode {
    properties: Vec<Property>,
}

impl SgfNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ident: impl Into<String>, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        let ident = ident.into();
        match self.properties.iter_mut().find(|p| p.ident == ident) {
            Some(existing) => existing.values.extend(values),
            None => self.properties.push(Property { ident, values }),
        }
    }

    /// First value of `ident`, for properties used as scalars.
    pub fn get(&self, ident: &str) -> Option<&str> {
        self.values(ident).first().map(String::as_str)
    }

    /// All values of `ident`; empty when the property is absent.
    pub fn values(&self, ident: &str) -> &[String] {
        self.properties
            .iter()
            .find(|p| p.ident == ident)
            .map(|p| p.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn has(&self, ident: &str) -> bool {
        self.properties.iter().any(|p| p.ident == ident)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// A move node carries a `B` or `W` property.
    pub fn is_move(&self) -> bool {
        self.has("B") || self.has("W")
    }

    /// Decoded points of a point-list property such as `AB`, `TR` or `SQ`.
    /// Malformed entries are skipped.
    pub fn points(&self, ident: &str) -> Vec<(usize, usize)> {
        self.values(ident).iter().filter_map(|v| sgf_to_coord(v)).collect()
    }
}

impl FromIterator<(String, Vec<String>)> for SgfNode {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut node = SgfNode::new();
        for (ident, values) in iter {
            node.insert(ident, values);
        }
        node
    }
}

/// Game information read from the root node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameInfo {
    pub black_player: Option<String>,
    pub white_player: Option<String>,
    pub result: Option<String>,
    pub komi: Option<f64>,
    pub date: Option<NaiveDate>,
}

impl GameInfo {
    pub fn from_root(root: &SgfNode) -> Self {
        let text = |ident: &str| root.get(ident).map(str::to_string).filter(|s| !s.is_empty());
        Self {
            black_player: text("PB"),
            white_player: text("PW"),
            result: text("RE"),
            komi: root.get("KM").and_then(|k| k.trim().parse().ok()),
            date: root.get("DT").and_then(parse_sgf_date),
        }
    }
}

/// `DT` holds a comma-separated list of ISO dates; the first full date wins.
fn parse_sgf_date(value: &str) -> Option<NaiveDate> {
    value
        .split(',')
        .find_map(|part| NaiveDate::parse_from_str(part.trim(), "%Y-%m-%d").ok())
}

/// Escape a raw value for writing back between brackets.
pub(crate) fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            // Already-escaped pairs are kept raw by the parser.
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                } else {
                    out.push('\\');
                }
            }
            ']' => out.push_str("\\]"),
            c => out.push(c),
        }
    }
    out
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ident)?;
        for v in &self.values {
            write!(f, "[{}]", escape_value(v))?;
        }
        Ok(())
    }
}

impl Display for SgfNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, ";")?;
        for prop in &self.properties {
            write!(f, "{}", prop)?;
        }
        Ok(())
    }
}
