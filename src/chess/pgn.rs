//! PGN text helpers. Movetext is only tokenised here; whether a token is a
//! legal move is left to the rules engine.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

static TAG_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*\[([A-Za-z0-9_]+)\s+"([^"]*)"\]\s*$"#).expect("tag pattern is valid"));
static BRACE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("comment pattern is valid"));
static INNER_VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("variation pattern is valid"));
static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").expect("NAG pattern is valid"));
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.+").expect("number pattern is valid"));

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// One played move as shown in a move list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveEntry {
    pub san: String,
    pub label: String,
    /// 1-based half-move number.
    pub ply: usize,
}

/// Split PGN into its tag pairs and the movetext joined onto one line.
/// `;` rest-of-line comments are dropped here since they end at a newline.
fn split_pgn(pgn: &str) -> (BTreeMap<String, String>, String) {
    let mut tags = BTreeMap::new();
    let mut body = Vec::new();
    for line in pgn.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = TAG_LINE_RE.captures(line) {
            tags.insert(caps[1].to_string(), caps[2].to_string());
            continue;
        }
        let code = line.split_once(';').map_or(line, |(code, _)| code).trim();
        if !code.is_empty() {
            body.push(code);
        }
    }
    (tags, body.join(" "))
}

/// Tag pairs such as `White`, `Event` or `FEN`, each on its own line.
pub fn extract_pgn_metadata(pgn: &str) -> BTreeMap<String, String> {
    split_pgn(pgn).0
}

/// The main-line move tokens in order.
///
/// Drops comments, (nested) variations, NAGs, move numbers, results and
/// trailing `!`/`?` annotations. `1...e5` style numbering is accepted.
pub fn extract_san_moves(pgn: &str) -> Vec<String> {
    let (_, body) = split_pgn(pgn);
    let mut text = BRACE_COMMENT_RE.replace_all(&body, " ").into_owned();
    loop {
        let stripped = INNER_VARIATION_RE.replace_all(&text, " ");
        if stripped == text {
            break;
        }
        text = stripped.into_owned();
    }
    let text = NAG_RE.replace_all(&text, " ");

    text.split_whitespace()
        .map(|token| MOVE_NUMBER_RE.replace(token, ""))
        .map(|token| token.trim_end_matches(['!', '?']).to_string())
        .filter(|token| !token.is_empty() && !RESULTS.contains(&token.as_str()))
        .collect()
}

/// Numbered movetext, e.g. `1. e4 e5 2. Nf3`, assuming White moves first.
pub fn build_pgn_from_moves(moves: &[MoveEntry]) -> String {
    let mut tokens: Vec<String> = Vec::new();
    for (idx, entry) in moves.iter().enumerate() {
        let notation = format_move_label(Some(entry), idx);
        if idx % 2 == 0 {
            tokens.push(format!("{}. {}", idx / 2 + 1, notation));
        } else if let Some(last) = tokens.last_mut() {
            last.push(' ');
            last.push_str(&notation);
        }
    }
    tokens.join(" ")
}

/// Label, then SAN, then a generic `Move N`.
pub fn format_move_label(entry: Option<&MoveEntry>, idx: usize) -> String {
    let Some(entry) = entry else {
        return String::new();
    };
    if !entry.label.is_empty() {
        return entry.label.clone();
    }
    if !entry.san.is_empty() {
        return entry.san.clone();
    }
    let n = if entry.ply > 0 { entry.ply } else { idx + 1 };
    format!("Move {n}")
}
