use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    piece::Position,
    shape::{Shape, ShapeKind},
};

/// Number of columns on the board.
pub const COLS: usize = 10;
/// Number of rows on the board.
pub const ROWS: usize = 20;

/// Opaque appearance tag carried by filled cells.
///
/// The engine never looks inside it: collision and line clearing only care
/// whether a cell is filled. Presentation layers map tags to colours or glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Appearance(u8);

impl Appearance {
    /// Largest tag that survives the compact board text format (base-36 digit).
    pub const MAX_TAG: u8 = 35;

    /// Creates an appearance tag, or `None` if it exceeds [`Self::MAX_TAG`].
    #[must_use]
    pub const fn new(tag: u8) -> Option<Self> {
        if tag > Self::MAX_TAG {
            None
        } else {
            Some(Self(tag))
        }
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        self.0
    }

    /// Returns the shape kind this tag was assigned to, if it is one of the catalog tags.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.appearance() == self)
    }

    fn to_char(self) -> char {
        char::from_digit(u32::from(self.0), 36).unwrap_or('?')
    }

    /// Inverse of [`Self::to_char`]; accepts only `0-9a-z`.
    fn from_char(c: char) -> Option<Self> {
        if !matches!(c, '0'..='9' | 'a'..='z') {
            return None;
        }
        let tag = c.to_digit(36)?;
        u8::try_from(tag).ok().and_then(Self::new)
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    #[default]
    Empty,
    Filled(Appearance),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn appearance(self) -> Option<Appearance> {
        match self {
            Block::Empty => None,
            Block::Filled(appearance) => Some(appearance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardRow {
    cells: [Block; COLS],
}

impl BoardRow {
    const EMPTY: Self = Self {
        cells: [Block::Empty; COLS],
    };

    fn is_completed(&self) -> bool {
        self.cells.iter().all(|b| b.is_filled())
    }
}

impl fmt::Display for BoardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write as _;
        for cell in self.cells {
            let c = match cell {
                Block::Empty => '.',
                Block::Filled(appearance) => appearance.to_char(),
            };
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// Error returned when a board cannot be rebuilt from its text rows.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("expected {} rows, got {found}", ROWS)]
    RowCount { found: usize },
    #[display("row {row}: expected {} cells, got {found}", COLS)]
    RowWidth { row: usize, found: usize },
    #[display("row {row}, column {col}: invalid cell {ch:?}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// The persistent 10×20 grid of locked cells.
///
/// Row 0 is the top of the board, x grows to the right and y grows downward.
/// The grid never changes size; it is only mutated by [`Board::lock`] and
/// [`Board::clear_completed_rows`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Position, ShapeKind};
///
/// let mut board = Board::EMPTY;
/// let kind = ShapeKind::I;
/// board.lock(&kind.shape(), Position::new(0, 19), kind.appearance());
///
/// assert!(board.is_occupied(0, 19));
/// assert!(!board.is_occupied(4, 19));
/// assert!(board.is_occupied(-1, 0)); // left wall
/// assert!(!board.is_occupied(0, -1)); // above the top
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const COLS: usize = COLS;
    pub const ROWS: usize = ROWS;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; ROWS],
    };

    /// Builds a board from a full grid of cells.
    #[must_use]
    pub fn from_cells(cells: [[Block; COLS]; ROWS]) -> Self {
        Self {
            rows: cells.map(|cells| BoardRow { cells }),
        }
    }

    /// Parses rows in the compact text format: `.` is empty, a lowercase
    /// base-36 digit (`0-9a-z`) is a filled cell carrying that appearance tag.
    pub fn parse_rows<S>(rows: &[S]) -> Result<Self, BoardParseError>
    where
        S: AsRef<str>,
    {
        if rows.len() != ROWS {
            return Err(BoardParseError::RowCount { found: rows.len() });
        }
        let mut cells = [[Block::Empty; COLS]; ROWS];
        for (y, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            let found = text.chars().count();
            if found != COLS {
                return Err(BoardParseError::RowWidth { row: y, found });
            }
            for (x, ch) in text.chars().enumerate() {
                cells[y][x] = match ch {
                    '.' => Block::Empty,
                    _ => Block::Filled(Appearance::from_char(ch).ok_or(
                        BoardParseError::InvalidCell { row: y, col: x, ch },
                    )?),
                };
            }
        }
        Ok(Self::from_cells(cells))
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Block> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block; COLS]> {
        self.rows.iter().map(|row| &row.cells)
    }

    /// Returns the rows in the compact text format accepted by [`Board::parse_rows`].
    #[must_use]
    pub fn to_text_rows(&self) -> Vec<String> {
        self.rows.iter().map(ToString::to_string).collect()
    }

    /// Returns whether `(x, y)` blocks a piece cell.
    ///
    /// Anything left or right of the grid and anything at or below the bottom
    /// edge counts as occupied. Cells above the top edge (`y < 0`) are always
    /// free so that pieces can spawn partially off-board.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        let Ok(x) = usize::try_from(x) else {
            return true;
        };
        if x >= COLS {
            return true;
        }
        if y < 0 {
            return false;
        }
        match usize::try_from(y) {
            Ok(y) if y < ROWS => self.rows[y].cells[x].is_filled(),
            _ => true,
        }
    }

    /// Writes every filled cell of `shape` placed at `origin` into the board.
    ///
    /// Cells landing above the top edge are dropped. Placement is not
    /// validated; callers check collisions before locking.
    ///
    /// # Panics
    ///
    /// Panics if a cell lands outside the grid horizontally or below the bottom.
    pub fn lock(&mut self, shape: &Shape, origin: Position, appearance: Appearance) {
        for (dx, dy) in shape.filled_cells() {
            let pos = origin.offset(dx, dy);
            let Ok(y) = usize::try_from(pos.y) else {
                continue;
            };
            let x = usize::try_from(pos.x).expect("locked cell left of the board");
            self.rows[y].cells[x] = Block::Filled(appearance);
        }
    }

    /// Removes every completed row and returns how many were removed.
    ///
    /// Remaining rows keep their order and slide down; the same number of
    /// empty rows appear at the top.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..ROWS).rev() {
            if self.rows[y].is_completed() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Number of filled cells on the board.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows()
            .flat_map(|row| row.iter())
            .filter(|b| b.is_filled())
            .count()
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", ..., "0000111.22"] (one string per row, top first)
        serializer.collect_seq(self.rows.iter().map(ToString::to_string))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Board::parse_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(t: u8) -> Appearance {
        Appearance::new(t).unwrap()
    }

    fn fill_row(board: &mut Board, y: usize, appearance: Appearance) {
        board.rows[y].cells = [Block::Filled(appearance); COLS];
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(board.rows().count(), ROWS);
        assert!(board.rows().all(|row| row.iter().all(|b| b.is_empty())));
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_is_occupied_bounds() {
        let board = Board::EMPTY;
        assert!(board.is_occupied(-1, 5));
        assert!(board.is_occupied(10, 5));
        assert!(board.is_occupied(3, 20));
        assert!(board.is_occupied(3, 25));
        assert!(!board.is_occupied(0, 0));
        assert!(!board.is_occupied(9, 19));
        // Above the top edge is free, but the side walls still extend upward
        assert!(!board.is_occupied(4, -3));
        assert!(board.is_occupied(-1, -3));
        assert!(board.is_occupied(10, -1));
    }

    #[test]
    fn test_is_occupied_filled_cell() {
        let mut board = Board::EMPTY;
        board.rows[7].cells[2] = Block::Filled(tag(1));
        assert!(board.is_occupied(2, 7));
        assert!(!board.is_occupied(3, 7));
    }

    #[test]
    fn test_lock_drops_cells_above_top() {
        let mut board = Board::EMPTY;
        let kind = ShapeKind::T;
        // T is [[0,1,0],[1,1,1]]: its top cell sits at y = -1
        board.lock(&kind.shape(), Position::new(4, -1), kind.appearance());

        assert_eq!(board.filled_count(), 3);
        for x in 4..7 {
            assert_eq!(board.cell(x, 0), Some(Block::Filled(kind.appearance())));
        }
    }

    #[test]
    fn test_clear_completed_rows_none() {
        let mut board = Board::EMPTY;
        for x in 0..COLS - 1 {
            board.rows[19].cells[x] = Block::Filled(tag(0));
        }
        let before = board.clone();
        assert_eq!(board.clear_completed_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_completed_rows_keeps_order() {
        let mut board = Board::EMPTY;
        // Markers in otherwise empty rows so we can follow them
        board.rows[10].cells[0] = Block::Filled(tag(1));
        board.rows[15].cells[0] = Block::Filled(tag(2));
        board.rows[17].cells[0] = Block::Filled(tag(3));
        fill_row(&mut board, 16, tag(0));
        fill_row(&mut board, 18, tag(0));
        fill_row(&mut board, 19, tag(0));

        assert_eq!(board.clear_completed_rows(), 3);
        assert_eq!(board.rows().count(), ROWS);

        assert_eq!(board.cell(0, 19), Some(Block::Filled(tag(3))));
        assert_eq!(board.cell(0, 18), Some(Block::Filled(tag(2))));
        assert_eq!(board.cell(0, 13), Some(Block::Filled(tag(1))));
        assert_eq!(board.filled_count(), 3);
        for y in 0..3 {
            assert!(board.rows[y].cells.iter().all(|b| b.is_empty()));
        }
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::EMPTY;
        for y in 0..ROWS {
            fill_row(&mut board, y, tag(4));
        }
        assert_eq!(board.clear_completed_rows(), ROWS);
        assert_eq!(board, Board::EMPTY);
    }

    #[test]
    fn test_i_piece_row_scenario() {
        let mut board = Board::EMPTY;
        let i = ShapeKind::I;
        let o = ShapeKind::O;
        board.lock(&i.shape(), Position::new(0, 19), i.appearance());
        board.lock(&i.shape(), Position::new(4, 19), i.appearance());
        board.lock(&o.shape(), Position::new(8, 18), o.appearance());

        assert_eq!(board.clear_completed_rows(), 1);
        assert!(board.rows[0].cells.iter().all(|b| b.is_empty()));
        // The top half of the O drops into the bottom row
        assert_eq!(board.cell(8, 19), Some(Block::Filled(o.appearance())));
        assert_eq!(board.cell(9, 19), Some(Block::Filled(o.appearance())));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_text_rows_roundtrip() {
        let mut board = Board::EMPTY;
        board.rows[19].cells[0] = Block::Filled(tag(6));
        board.rows[19].cells[9] = Block::Filled(tag(35));
        let rows = board.to_text_rows();
        assert_eq!(rows[19], "6........z");
        assert_eq!(Board::parse_rows(&rows).unwrap(), board);
    }

    #[test]
    fn test_from_cells() {
        let mut cells = [[Block::Empty; COLS]; ROWS];
        cells[0][9] = Block::Filled(tag(2));
        cells[19][0] = Block::Filled(tag(5));
        let board = Board::from_cells(cells);

        assert_eq!(board.filled_count(), 2);
        assert_eq!(board.cell(9, 0), Some(Block::Filled(tag(2))));
        assert_eq!(board.cell(0, 19), Some(Block::Filled(tag(5))));
        assert!(board.is_occupied(9, 0));
        assert!(board.rows().eq(cells.iter()));
    }

    #[test]
    fn test_uppercase_tags_are_rejected() {
        let mut rows = vec![".........."; ROWS];
        rows[19] = "A.........";
        assert_eq!(
            Board::parse_rows(&rows),
            Err(BoardParseError::InvalidCell {
                row: 19,
                col: 0,
                ch: 'A'
            })
        );

        rows[19] = "a.........";
        assert_eq!(Board::parse_rows(&rows).unwrap().to_text_rows()[19], "a.........");
    }

    #[test]
    fn test_parse_rows_errors() {
        let rows = vec![".........."; ROWS - 1];
        assert_eq!(
            Board::parse_rows(&rows),
            Err(BoardParseError::RowCount { found: ROWS - 1 })
        );

        let mut rows = vec![".........."; ROWS];
        rows[3] = "...";
        assert_eq!(
            Board::parse_rows(&rows),
            Err(BoardParseError::RowWidth { row: 3, found: 3 })
        );

        rows[3] = "....#.....";
        assert_eq!(
            Board::parse_rows(&rows),
            Err(BoardParseError::InvalidCell {
                row: 3,
                col: 4,
                ch: '#'
            })
        );
    }

    #[test]
    fn test_board_serialization() {
        let mut board = Board::EMPTY;
        board.rows[19].cells[..4].fill(Block::Filled(tag(0)));
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with("[\"..........\""));
        assert!(json.ends_with("\"0000......\"]"));

        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);

        assert!(serde_json::from_str::<Board>("[\"..........\"]").is_err());
        assert!(serde_json::from_str::<Board>("\"..........\"").is_err());
    }

    #[test]
    fn test_appearance_bounds() {
        assert!(Appearance::new(35).is_some());
        assert!(Appearance::new(36).is_none());
        assert_eq!(ShapeKind::S.appearance().shape_kind(), Some(ShapeKind::S));
        assert_eq!(tag(30).shape_kind(), None);
    }
}
