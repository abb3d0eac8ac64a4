use crate::sgf::{
    node::{GameInfo, MAX_COORD, SgfNode},
    parse_sgf,
};

/// A parsed main line split into its root node and the move nodes that
/// follow it. Nodes after the root that carry neither `B` nor `W` (comment
/// or setup-only nodes) are not part of the move list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    pub root: SgfNode,
    pub moves: Vec<SgfNode>,
}

impl GameRecord {
    /// Returns `None` when there is no root node at all.
    pub fn from_nodes(nodes: Vec<SgfNode>) -> Option<Self> {
        let mut nodes = nodes.into_iter();
        let root = nodes.next()?;
        let moves = nodes.filter(SgfNode::is_move).collect();
        Some(Self { root, moves })
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::from_nodes(parse_sgf(text))
    }

    /// `SZ` as a square board size. `SZ[19]` and the rectangular form
    /// `SZ[19:19]` both give 19. Zero, garbage, or a size whose points SGF
    /// cannot address (above 52) gives `None`.
    pub fn board_size(&self) -> Option<usize> {
        let raw = self.root.get("SZ")?;
        let first = raw.split(':').next().unwrap_or(raw).trim();
        match first.parse::<usize>() {
            Ok(0) | Err(_) => {
                tracing::debug!(sz = raw, "ignoring unusable board size");
                None
            }
            Ok(n) if n > MAX_COORD => {
                tracing::debug!(sz = raw, "ignoring unusable board size");
                None
            }
            Ok(n) => Some(n),
        }
    }

    pub fn black_setup(&self) -> Vec<(usize, usize)> {
        self.root.points("AB")
    }

    pub fn white_setup(&self) -> Vec<(usize, usize)> {
        self.root.points("AW")
    }

    pub fn info(&self) -> GameInfo {
        GameInfo::from_root(&self.root)
    }

    /// Root first, then every move node.
    pub fn iter_mainline(&self) -> impl Iterator<Item = &SgfNode> {
        std::iter::once(&self.root).chain(self.moves.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_boards_are_ignored() {
        assert_eq!(GameRecord::parse("(;SZ[52])").unwrap().board_size(), Some(52));
        assert_eq!(GameRecord::parse("(;SZ[53])").unwrap().board_size(), None);
        assert_eq!(GameRecord::parse("(;SZ[5000000000])").unwrap().board_size(), None);
        assert_eq!(GameRecord::parse("(;SZ[99999999999999999999999])").unwrap().board_size(), None);
    }

    #[test]
    fn splits_root_and_moves() {
        let record = GameRecord::parse("(;SZ[13]AB[dd][jj];C[comment only];B[cc];W[kk])").unwrap();
        assert_eq!(record.board_size(), Some(13));
        assert_eq!(record.black_setup(), vec![(3, 3), (9, 9)]);
        assert!(record.white_setup().is_empty());
        assert_eq!(record.moves.len(), 2);
        assert_eq!(record.iter_mainline().count(), 3);
    }

    #[test]
    fn rectangular_and_bad_sizes() {
        assert_eq!(GameRecord::parse("(;SZ[9:9])").unwrap().board_size(), Some(9));
        assert_eq!(GameRecord::parse("(;SZ[big])").unwrap().board_size(), None);
        assert_eq!(GameRecord::parse("(;SZ[0])").unwrap().board_size(), None);
        assert_eq!(GameRecord::parse("(;GM[1])").unwrap().board_size(), None);
    }

    #[test]
    fn empty_text_has_no_record() {
        assert!(GameRecord::parse("").is_none());
    }
}
