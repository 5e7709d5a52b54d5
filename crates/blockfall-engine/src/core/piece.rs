use super::{
    board::{Appearance, Board, COLS},
    shape::{Shape, ShapeKind},
};

/// Board coordinate of a shape matrix's top-left cell.
///
/// Signed because pieces may sit partially above the board (`y < 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by a cell offset inside a shape matrix.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn offset(self, dx: usize, dy: usize) -> Self {
        Self::new(self.x + dx as i32, self.y + dy as i32)
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The piece currently under player control.
///
/// Every mutating operation validates against the [`Board`] and either
/// commits completely or leaves the piece exactly as it was.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, ShapeKind};
///
/// let mut board = Board::EMPTY;
/// let mut piece = ActivePiece::spawn(ShapeKind::T);
///
/// assert!(piece.try_move(-1, 0, &board));
/// assert!(piece.rotate(&board));
///
/// let ghost_row = piece.ghost_row(&board);
/// piece.hard_drop(&board);
/// assert_eq!(piece.origin().y, ghost_row);
///
/// piece.lock(&mut board);
/// assert_eq!(board.filled_count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: ShapeKind,
    shape: Shape,
    origin: Position,
}

impl ActivePiece {
    /// Creates a piece of `kind` centered horizontally on the top row.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub fn spawn(kind: ShapeKind) -> Self {
        let shape = kind.shape();
        let x = (COLS / 2 - shape.width() / 2) as i32;
        Self {
            kind,
            shape,
            origin: Position::new(x, 0),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn origin(&self) -> Position {
        self.origin
    }

    #[must_use]
    pub fn appearance(&self) -> Appearance {
        self.kind.appearance()
    }

    /// Board coordinates of every filled cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape
            .filled_cells()
            .into_iter()
            .map(move |(dx, dy)| self.origin.offset(dx, dy))
    }

    /// Returns whether the piece overlaps a wall, the floor or a filled cell.
    #[must_use]
    pub fn is_colliding(&self, board: &Board) -> bool {
        self.occupied_positions()
            .any(|pos| board.is_occupied(pos.x, pos.y))
    }

    /// Returns a copy shifted by `(dx, dy)`, without checking collisions.
    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            origin: self.origin.shifted(dx, dy),
            ..*self
        }
    }

    /// Returns a copy rotated 90° clockwise about the same origin, without
    /// checking collisions.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..*self
        }
    }

    /// Shifts the piece by `(dx, dy)` if the result does not collide.
    ///
    /// Returns `false` and leaves the piece untouched otherwise.
    pub fn try_move(&mut self, dx: i32, dy: i32, board: &Board) -> bool {
        self.commit_if_free(self.moved(dx, dy), board)
    }

    /// Rotates clockwise in place if the rotated shape fits at the current origin.
    ///
    /// There is no wall kick: a blocked rotation is rejected outright.
    pub fn rotate(&mut self, board: &Board) -> bool {
        self.commit_if_free(self.rotated(), board)
    }

    fn commit_if_free(&mut self, candidate: Self, board: &Board) -> bool {
        if candidate.is_colliding(board) {
            return false;
        }
        *self = candidate;
        true
    }

    /// Returns the piece as it would rest after dropping straight down.
    #[must_use]
    pub fn ghost(&self, board: &Board) -> Self {
        let mut ghost = *self;
        while ghost.try_move(0, 1, board) {}
        ghost
    }

    /// Returns the lowest row the origin can reach by moving straight down.
    #[must_use]
    pub fn ghost_row(&self, board: &Board) -> i32 {
        self.ghost(board).origin.y
    }

    /// Drops the piece until it rests on something and returns the rows travelled.
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut rows = 0;
        while self.try_move(0, 1, board) {
            rows += 1;
        }
        rows
    }

    /// Writes the piece into the board, ending its life as the active piece.
    pub fn lock(self, board: &mut Board) {
        board.lock(&self.shape, self.origin, self.appearance());
    }
}
