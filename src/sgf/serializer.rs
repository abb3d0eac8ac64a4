use crate::sgf::SgfNode;

/// Serialise a main line back to SGF text as a single `(…)` game tree.
///
/// Property order within each node is preserved. An empty slice gives an
/// empty string rather than `()`, which is not a valid tree.
pub fn write_sgf(nodes: &[SgfNode]) -> String {
    if nodes.is_empty() {
        return String::new();
    }
    let mut out = String::from("(");
    for node in nodes {
        out.push_str(&node.to_string());
    }
    out.push(')');
    out
}
