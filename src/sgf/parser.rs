use pest_consume::{Parser, match_nodes};

use crate::sgf::node::SgfNode;

type Node<'i> = pest_consume::Node<'i, Rule, ()>;
type ParseResult<T> = std::result::Result<T, pest_consume::Error<Rule>>;

#[derive(Parser)]
#[grammar = "sgf.pest"]
struct SGFParser;

#[pest_consume::parser]
impl SGFParser {
    fn EOI(_input: Node) -> ParseResult<()> {
        Ok(())
    }

    fn prop_ident(input: Node) -> ParseResult<String> {
        Ok(input.as_str().to_string())
    }

    fn prop_value(input: Node) -> ParseResult<String> {
        Ok(input.as_str().to_string())
    }

    fn property(input: Node) -> ParseResult<(String, Vec<String>)> {
        match_nodes!(input.into_children();
            [prop_ident(ident), prop_value(values)..] => Ok((ident, values.collect()))
        )
    }

    fn node(input: Node) -> ParseResult<SgfNode> {
        match_nodes!(input.into_children();
            [property(props)..] => Ok(props.collect())
        )
    }

    fn file(input: Node) -> ParseResult<Vec<SgfNode>> {
        match_nodes!(input.into_children();
            [node(nodes).., EOI(_)] => Ok(nodes.collect())
        )
    }
}

/// Parse SGF text into the flat list of main-line nodes, root first.
///
/// Scanning starts after the first `(` (or at a leading `;` when the text
/// has no parentheses at all). Entering a nested `(` keeps following the
/// first branch; the first `)` ends the walk, so sibling variations and any
/// later game records are dropped. Characters outside recognised constructs
/// are skipped. Input that contains no game tree yields an empty list.
pub fn parse_sgf(input: &str) -> Vec<SgfNode> {
    let input = input.trim();
    let parsed = SGFParser::parse(Rule::file, input)
        .and_then(|inputs| inputs.single())
        .and_then(SGFParser::file);
    match parsed {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::debug!(error = %e, "no SGF game tree found");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_main_line_root_first() {
        let nodes = parse_sgf("(;GM[1]FF[4]SZ[19];B[dd];W[pp];B[dp])");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].get("SZ"), Some("19"));
        assert_eq!(nodes[1].get("B"), Some("dd"));
        assert_eq!(nodes[2].get("W"), Some("pp"));
        assert_eq!(nodes[3].get("B"), Some("dp"));
    }

    #[test]
    fn only_first_variation_is_followed() {
        let nodes = parse_sgf("(;SZ[19];B[dd](;W[pp];B[qq])(;W[dp]))");
        let moves: Vec<_> = nodes.iter().skip(1).filter_map(|n| n.get("B").or(n.get("W"))).collect();
        assert_eq!(moves, ["dd", "pp", "qq"]);
    }

    #[test]
    fn multi_valued_properties_keep_order() {
        let nodes = parse_sgf("(;AB[aa][bb]\n [cc]AW[dd]LB[pd:A][qc:B])");
        assert_eq!(nodes[0].values("AB"), ["aa", "bb", "cc"]);
        assert_eq!(nodes[0].values("AW"), ["dd"]);
        assert_eq!(nodes[0].values("LB"), ["pd:A", "qc:B"]);
    }

    #[test]
    fn brackets_and_separators_inside_values() {
        let nodes = parse_sgf("(;C[move (3); good \\] fight];B[aa])");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].get("C"), Some("move (3); good \\] fight"));
    }

    #[test]
    fn stray_characters_are_skipped() {
        let nodes = parse_sgf("junk before (;SZ[9] x ; B[ee] lowercase ;W[])trailing");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].get("B"), Some("ee"));
        assert_eq!(nodes[2].get("W"), Some(""));
    }

    #[test]
    fn bare_node_sequence_without_parentheses() {
        let nodes = parse_sgf(";SZ[9];B[aa]");
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn text_without_game_tree_is_empty() {
        assert!(parse_sgf("").is_empty());
        assert!(parse_sgf("no tree here").is_empty());
    }

    #[test]
    fn node_without_properties_is_kept() {
        let nodes = parse_sgf("(;;B[aa])");
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_empty());
    }
}
