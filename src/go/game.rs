use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    go::{
        board::{Captures, Cell, GoBoard, Stone},
        layout::{Marker, PlacedMarker, star_points},
    },
    sgf::{GameInfo, GameRecord, SgfNode, sgf_to_coord},
    walker::{MoveCursor, Navigate, Replay},
};

/// Which stones carry their move number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMoveNumbers")]
pub enum MoveNumbers {
    #[default]
    Off,
    All,
    /// The last `n` moves up to the current one.
    Last(usize),
    /// 1-based inclusive range, capped at the current move.
    Range { start: usize, end: Option<usize> },
}

/// Accepts `true`/`false`, a count, or `{ "start": .., "end": .. }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMoveNumbers {
    Flag(bool),
    Count(usize),
    Range { start: Option<usize>, end: Option<usize> },
}

impl From<RawMoveNumbers> for MoveNumbers {
    fn from(raw: RawMoveNumbers) -> Self {
        match raw {
            RawMoveNumbers::Flag(true) => Self::All,
            RawMoveNumbers::Flag(false) | RawMoveNumbers::Count(0) => Self::Off,
            RawMoveNumbers::Count(n) => Self::Last(n),
            RawMoveNumbers::Range { start, end } => Self::Range { start: start.unwrap_or(1), end },
        }
    }
}

impl MoveNumbers {
    /// Inclusive 0-based move indices to number when `current` is displayed.
    fn window(self, current: isize) -> Option<(usize, usize)> {
        if current < 0 {
            return None;
        }
        let current = current as usize;
        let (start, end) = match self {
            Self::Off => return None,
            Self::All => (0, current),
            Self::Last(n) => ((current + 1).saturating_sub(n), current),
            Self::Range { end: Some(0), .. } => return None,
            Self::Range { start, end } => (
                start.saturating_sub(1),
                end.map_or(current, |e| current.min(e - 1)),
            ),
        };
        (start <= end).then_some((start, end))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoOptions {
    /// Board size used when the record has no usable `SZ`.
    pub size: usize,
    /// 1-based move to show after loading; `0` shows the setup position.
    pub initial_move: Option<usize>,
    pub show_move_numbers: MoveNumbers,
}

impl Default for GoOptions {
    fn default() -> Self {
        Self { size: 19, initial_move: None, show_move_numbers: MoveNumbers::Off }
    }
}

/// Everything a renderer needs for the displayed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoSnapshot {
    pub size: usize,
    pub cells: Vec<Cell>,
    pub captures: Captures,
    /// `-1` while only setup stones are shown.
    pub move_index: isize,
    pub total_moves: usize,
    pub star_points: Vec<(usize, usize)>,
    pub markers: Vec<PlacedMarker>,
}

/// Go record viewer: owns the parsed record and the board shown for the
/// current move index.
#[derive(Debug, Clone)]
pub struct GoGame {
    options: GoOptions,
    board: GoBoard,
    record: Option<GameRecord>,
    cursor: MoveCursor,
}

impl GoGame {
    pub fn new(options: GoOptions) -> Self {
        Self {
            board: GoBoard::new(options.size),
            options,
            record: None,
            cursor: MoveCursor::for_moves(-1, 0),
        }
    }

    /// Load a record and show its setup position (or `initial_move` when
    /// configured and in range). Returns `false` and keeps the current state
    /// when the text holds no game tree.
    pub fn load_sgf(&mut self, text: &str) -> bool {
        let Some(record) = GameRecord::parse(text) else {
            tracing::debug!("SGF text has no nodes; keeping current game");
            return false;
        };
        let size = record.board_size().unwrap_or(self.board.size());
        self.cursor = MoveCursor::for_moves(-1, record.moves.len());
        self.record = Some(record);
        self.board.reset(size);
        self.apply_setup();

        if let Some(initial) = self.options.initial_move.and_then(|n| isize::try_from(n).ok()) {
            self.go_to_move(initial - 1);
        }
        true
    }

    /// Show the position after move `index` (0-based; `-1` is setup only).
    /// Out-of-range indices change nothing and return `false`.
    pub fn go_to_move(&mut self, index: isize) -> bool {
        self.seek(index)
    }

    pub fn next(&mut self) -> bool {
        self.navigate(Navigate::Next)
    }

    pub fn prev(&mut self) -> bool {
        self.navigate(Navigate::Prev)
    }

    pub fn start(&mut self) -> bool {
        self.navigate(Navigate::Start)
    }

    pub fn end(&mut self) -> bool {
        self.navigate(Navigate::End)
    }

    pub fn apply(&mut self, cmd: Navigate) -> bool {
        self.navigate(cmd)
    }

    pub fn board(&self) -> &GoBoard {
        &self.board
    }

    pub fn record(&self) -> Option<&GameRecord> {
        self.record.as_ref()
    }

    pub fn info(&self) -> Option<GameInfo> {
        self.record.as_ref().map(GameRecord::info)
    }

    pub fn current_move(&self) -> isize {
        self.cursor.current()
    }

    pub fn total_moves(&self) -> usize {
        self.moves().len()
    }

    pub fn snapshot(&self) -> GoSnapshot {
        GoSnapshot {
            size: self.board.size(),
            cells: self.board.cells().to_vec(),
            captures: self.board.captures(),
            move_index: self.cursor.current(),
            total_moves: self.total_moves(),
            star_points: star_points(self.board.size()),
            markers: self
                .markers()
                .into_iter()
                .map(|((x, y), marker)| PlacedMarker { x, y, marker })
                .collect(),
        }
    }

    /// Markers for the displayed position. Later sources override earlier
    /// ones on the same point: move numbers, then the last-move marker (only
    /// where no number is shown), then the current node's `LB`/`TR`/`SQ`/`CR`.
    pub fn markers(&self) -> BTreeMap<(usize, usize), Marker> {
        let mut markers = BTreeMap::new();
        let current = self.cursor.current();
        let moves = self.moves();

        if let Some((start, end)) = self.options.show_move_numbers.window(current) {
            for (i, node) in moves.iter().enumerate().take(end + 1).skip(start) {
                let Some((x, y)) = self.move_point(node) else { continue };
                if self.cell(x, y) != Cell::Empty {
                    markers.insert((x, y), Marker::Number(i + 1));
                }
            }
        }

        let node = match usize::try_from(current) {
            Ok(i) => moves.get(i),
            Err(_) => self.record.as_ref().map(|r| &r.root),
        };
        let Some(node) = node else { return markers };

        if current >= 0 {
            if let Some(point) = self.move_point(node) {
                markers.entry(point).or_insert(Marker::Last);
            }
        }
        add_node_markers(node, &mut markers);
        markers
    }

    fn moves(&self) -> &[SgfNode] {
        self.record.as_ref().map(|r| r.moves.as_slice()).unwrap_or_default()
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.board.get(x as isize, y as isize).unwrap_or(Cell::Empty)
    }

    fn apply_setup(&mut self) {
        let Some(record) = &self.record else { return };
        for (x, y) in record.black_setup() {
            self.board.set(x, y, Cell::Black);
        }
        for (x, y) in record.white_setup() {
            self.board.set(x, y, Cell::White);
        }
    }

    /// The board point of a move node, or `None` for passes and garbage.
    fn move_point(&self, node: &SgfNode) -> Option<(usize, usize)> {
        let (_, value) = node_move(node)?;
        if is_pass(value, self.board.size()) {
            return None;
        }
        sgf_to_coord(value)
    }

    fn play_node(&mut self, index: usize) {
        let Some(node) = self.moves().get(index) else { return };
        let Some((color, value)) = node_move(node) else { return };
        if is_pass(value, self.board.size()) {
            return;
        }
        let Some((x, y)) = sgf_to_coord(value) else {
            tracing::debug!(index, value, "skipping unreadable move coordinate");
            return;
        };
        if !self.board.play(x, y, color) {
            tracing::debug!(index, x, y, ?color, "move rejected during replay");
        }
    }
}

impl Default for GoGame {
    fn default() -> Self {
        Self::new(GoOptions::default())
    }
}

impl Replay for GoGame {
    fn cursor(&self) -> &MoveCursor {
        &self.cursor
    }

    fn replay_to(&mut self, index: isize) {
        let size = self.board.size();
        self.board.reset(size);
        self.apply_setup();
        for i in 0..=index {
            // `index` is at least -1, so `i` is never negative here.
            self.play_node(i as usize);
        }
        self.cursor.go_to(index);
    }
}

/// `B` wins over `W` when a node carries both.
fn node_move(node: &SgfNode) -> Option<(Stone, &str)> {
    node.get("B")
        .map(|v| (Stone::Black, v))
        .or_else(|| node.get("W").map(|v| (Stone::White, v)))
}

fn is_pass(value: &str, size: usize) -> bool {
    value.is_empty() || (value == "tt" && size <= 19)
}

fn add_node_markers(node: &SgfNode, markers: &mut BTreeMap<(usize, usize), Marker>) {
    for label in node.values("LB") {
        let (point, text) = label.split_once(':').unwrap_or((label.as_str(), ""));
        if let Some(point) = sgf_to_coord(point) {
            markers.insert(point, Marker::Label(text.to_string()));
        }
    }
    for (ident, marker) in [("TR", Marker::Triangle), ("SQ", Marker::Square), ("CR", Marker::Circle)] {
        for point in node.points(ident) {
            markers.insert(point, marker.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GAME: &str = "(;GM[1]SZ[9]AB[cc]AW[gg];B[ee];W[ef];B[df];W[dd]LB[ce:A]TR[ee];B[eg];W[tt];B[ff])";

    fn loaded(options: GoOptions) -> GoGame {
        let mut game = GoGame::new(options);
        assert!(game.load_sgf(GAME));
        game
    }

    #[test]
    fn load_shows_setup_only() {
        let game = loaded(GoOptions::default());
        assert_eq!(game.board().size(), 9);
        assert_eq!(game.current_move(), -1);
        assert_eq!(game.total_moves(), 7);
        assert_eq!(game.cell(2, 2), Cell::Black);
        assert_eq!(game.cell(6, 6), Cell::White);
        assert_eq!(game.cell(4, 4), Cell::Empty);
    }

    #[test]
    fn load_without_tree_keeps_state() {
        let mut game = loaded(GoOptions::default());
        game.go_to_move(2);
        assert!(!game.load_sgf("not sgf"));
        assert_eq!(game.current_move(), 2);
        assert_eq!(game.total_moves(), 7);
    }

    #[test]
    fn size_falls_back_to_options() {
        let mut game = GoGame::new(GoOptions { size: 13, ..GoOptions::default() });
        assert!(game.load_sgf("(;B[aa])"));
        assert_eq!(game.board().size(), 13);
    }

    #[test]
    fn initial_move_is_one_based() {
        let game = loaded(GoOptions { initial_move: Some(3), ..GoOptions::default() });
        assert_eq!(game.current_move(), 2);
        assert_eq!(game.cell(3, 5), Cell::Black);

        let game = loaded(GoOptions { initial_move: Some(0), ..GoOptions::default() });
        assert_eq!(game.current_move(), -1);

        let game = loaded(GoOptions { initial_move: Some(99), ..GoOptions::default() });
        assert_eq!(game.current_move(), -1);

        let game = loaded(GoOptions { initial_move: Some(usize::MAX), ..GoOptions::default() });
        assert_eq!(game.current_move(), -1);
    }

    #[test]
    fn oversized_sz_falls_back_to_options() {
        for text in ["(;SZ[53];B[aa])", "(;SZ[5000000000];B[aa])"] {
            let mut game = GoGame::new(GoOptions::default());
            assert!(game.load_sgf(text));
            assert_eq!(game.board().size(), 19);
            assert!(game.end());
            assert_eq!(game.cell(0, 0), Cell::Black);
        }
        let game = GoGame::new(GoOptions { size: 100_000, ..GoOptions::default() });
        assert_eq!(game.board().size(), 52);
    }

    #[test]
    fn out_of_range_seek_is_a_no_op() {
        let mut game = loaded(GoOptions::default());
        assert!(game.go_to_move(1));
        let before = game.snapshot();
        assert!(!game.go_to_move(7));
        assert!(!game.go_to_move(-2));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn navigation_commands() {
        let mut game = loaded(GoOptions::default());
        assert!(!game.prev());
        assert!(game.next());
        assert_eq!(game.current_move(), 0);
        assert!(game.end());
        assert_eq!(game.current_move(), 6);
        assert!(!game.next());
        assert!(game.apply(Navigate::Jump(3)));
        assert_eq!(game.current_move(), 3);
        assert!(game.start());
        assert_eq!(game.current_move(), -1);
    }

    #[test]
    fn pass_changes_nothing() {
        let mut game = loaded(GoOptions::default());
        game.go_to_move(4);
        let cells = game.board().cells().to_vec();
        game.go_to_move(5);
        assert_eq!(game.board().cells(), cells.as_slice());
        assert!(!game.markers().values().any(|m| *m == Marker::Last));
    }

    #[test]
    fn last_marker_and_node_markers() {
        let mut game = loaded(GoOptions::default());
        game.go_to_move(3);
        let markers = game.markers();
        assert_eq!(markers.get(&(3, 3)), Some(&Marker::Last));
        assert_eq!(markers.get(&(2, 4)), Some(&Marker::Label("A".into())));
        assert_eq!(markers.get(&(4, 4)), Some(&Marker::Triangle));
        assert_eq!(markers.len(), 3);
    }

    #[test]
    fn numbers_only_on_standing_stones() {
        // W[ef] at (4,5) is captured by the final B[ff].
        let mut game = loaded(GoOptions { show_move_numbers: MoveNumbers::All, ..GoOptions::default() });
        game.end();
        assert_eq!(game.cell(4, 5), Cell::Empty);
        assert_eq!(game.board().captures().black, 1);
        let markers = game.markers();
        assert_eq!(markers.get(&(4, 4)), Some(&Marker::Number(1)));
        assert_eq!(markers.get(&(4, 5)), None);
        assert_eq!(markers.get(&(5, 5)), Some(&Marker::Number(7)));
        assert!(!markers.values().any(|m| *m == Marker::Last));
    }

    #[test]
    fn last_n_and_range_windows() {
        assert_eq!(MoveNumbers::Last(2).window(4), Some((3, 4)));
        assert_eq!(MoveNumbers::Last(10).window(4), Some((0, 4)));
        assert_eq!(MoveNumbers::Range { start: 2, end: Some(3) }.window(6), Some((1, 2)));
        assert_eq!(MoveNumbers::Range { start: 5, end: None }.window(2), None);
        assert_eq!(MoveNumbers::Range { start: 1, end: Some(0) }.window(3), None);
        assert_eq!(MoveNumbers::Range { start: 1, end: Some(1) }.window(3), Some((0, 0)));
        assert_eq!(MoveNumbers::All.window(-1), None);
        assert_eq!(MoveNumbers::Off.window(5), None);
    }

    #[test]
    fn options_from_json() {
        let options: GoOptions = serde_json::from_str(r#"{"initial_move": 4, "show_move_numbers": true}"#).unwrap();
        assert_eq!(options.size, 19);
        assert_eq!(options.initial_move, Some(4));
        assert_eq!(options.show_move_numbers, MoveNumbers::All);

        let options: GoOptions = serde_json::from_str(r#"{"show_move_numbers": 5}"#).unwrap();
        assert_eq!(options.show_move_numbers, MoveNumbers::Last(5));
        let options: GoOptions = serde_json::from_str(r#"{"show_move_numbers": {"end": 10}}"#).unwrap();
        assert_eq!(options.show_move_numbers, MoveNumbers::Range { start: 1, end: Some(10) });
        let options: GoOptions = serde_json::from_str(r#"{"show_move_numbers": false}"#).unwrap();
        assert_eq!(options.show_move_numbers, MoveNumbers::Off);
    }

    #[test]
    fn snapshot_carries_board_furniture() {
        let mut game = loaded(GoOptions::default());
        game.go_to_move(0);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.size, 9);
        assert_eq!(snapshot.cells.len(), 81);
        assert_eq!(snapshot.move_index, 0);
        assert_eq!(snapshot.total_moves, 7);
        assert_eq!(snapshot.star_points.len(), 5);
        assert_eq!(snapshot.markers, [PlacedMarker { x: 4, y: 4, marker: Marker::Last }]);
    }

    proptest! {
        #[test]
        fn seek_is_path_independent(path in prop::collection::vec(-2isize..9, 1..20), target in -1isize..7) {
            let mut direct = loaded(GoOptions::default());
            direct.go_to_move(target);

            let mut wandering = loaded(GoOptions::default());
            for index in path {
                wandering.go_to_move(index);
            }
            wandering.go_to_move(target);

            prop_assert_eq!(wandering.board(), direct.board());
            prop_assert_eq!(wandering.snapshot(), direct.snapshot());
        }
    }
}
