use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::board::Appearance;

/// Side length of the square that bounds every shape in any rotation.
const MAX_SHAPE_SIZE: usize = 4;

/// A piece shape as a boolean matrix of variable width and height.
///
/// Shapes are plain values: rotating one yields a new `Shape` and leaves the
/// catalog templates untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    #[expect(clippy::cast_possible_truncation)]
    const fn template<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        assert!(W <= MAX_SHAPE_SIZE && H <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W as u8,
            height: H as u8,
            cells,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Iterates over the matrix rows, top first, each trimmed to the shape width.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Offsets `(dx, dy)` of the filled cells, row by row.
    #[must_use]
    pub fn filled_cells(&self) -> ArrayVec<(usize, usize), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }> {
        let mut cells = ArrayVec::new();
        for (dy, row) in self.rows().enumerate() {
            for (dx, &filled) in row.iter().enumerate() {
                if filled {
                    cells.push((dx, dy));
                }
            }
        }
        cells
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// Transposes the matrix and reverses each resulting row, so a `w×h`
    /// shape becomes `h×w`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(width) {
            for (x, cell) in row.iter_mut().enumerate().take(height) {
                *cell = self.cells[height - 1 - x][y];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

/// The seven shapes of the catalog.
///
/// Each kind owns one immutable template and one appearance tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShapeKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

/// Uniform choice over all seven kinds, with repetition.
impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [ShapeKind; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    /// Returns the spawn-orientation template.
    #[must_use]
    pub const fn shape(self) -> Shape {
        SHAPE_TEMPLATES[self as usize]
    }

    /// Returns the appearance tag locked cells of this kind carry.
    #[must_use]
    pub const fn appearance(self) -> Appearance {
        Appearance::new(self as u8).expect("catalog tags fit the appearance range")
    }
}

const SHAPE_TEMPLATES: [Shape; ShapeKind::LEN] = [
    // I
    Shape::template([[1, 1, 1, 1]]),
    // J
    Shape::template([[1, 0, 0], [1, 1, 1]]),
    // L
    Shape::template([[0, 0, 1], [1, 1, 1]]),
    // O
    Shape::template([[1, 1], [1, 1]]),
    // S
    Shape::template([[0, 1, 1], [1, 1, 0]]),
    // T
    Shape::template([[0, 1, 0], [1, 1, 1]]),
    // Z
    Shape::template([[1, 1, 0], [0, 1, 1]]),
];
