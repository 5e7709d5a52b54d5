use blockfall_engine::{ActivePiece, Board, COLS, Position, ROWS};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::{
    skin::{CellLook, Skin},
    view::widgets::CellDisplay,
};

#[expect(clippy::cast_possible_truncation)]
const GRID_WIDTH: u16 = COLS as u16 * CellDisplay::WIDTH;
#[expect(clippy::cast_possible_truncation)]
const GRID_HEIGHT: u16 = ROWS as u16 * CellDisplay::HEIGHT;

/// The board with the optional ghost and falling piece drawn over it.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    skin: Skin,
    ghost: Option<ActivePiece>,
    falling_piece: Option<ActivePiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board, skin: Skin) -> Self {
        Self {
            board,
            skin,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: ActivePiece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: ActivePiece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        GRID_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        GRID_HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }

    fn looks(&self) -> [[CellLook; COLS]; ROWS] {
        let mut looks = [[self.skin.empty(); COLS]; ROWS];
        for (row, blocks) in looks.iter_mut().zip(self.board.rows()) {
            for (look, block) in row.iter_mut().zip(blocks) {
                if let Some(appearance) = block.appearance() {
                    *look = self.skin.filled(appearance);
                }
            }
        }
        if let Some(ghost) = self.ghost {
            for pos in ghost.occupied_positions() {
                if let Some(look) = look_at(&mut looks, pos) {
                    *look = self.skin.ghost();
                }
            }
        }
        if let Some(piece) = self.falling_piece {
            let filled = self.skin.filled(piece.appearance());
            for pos in piece.occupied_positions() {
                if let Some(look) = look_at(&mut looks, pos) {
                    *look = filled;
                }
            }
        }
        looks
    }
}

/// Cells above the top edge are not drawn.
fn look_at(looks: &mut [[CellLook; COLS]; ROWS], pos: Position) -> Option<&mut CellLook> {
    let x = usize::try_from(pos.x).ok()?;
    let y = usize::try_from(pos.y).ok()?;
    looks.get_mut(y)?.get_mut(x)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let left = area.x + area.width.saturating_sub(GRID_WIDTH) / 2;
        for (row, y) in self.looks().iter().zip(0u16..) {
            for (look, x) in row.iter().zip(0u16..) {
                let cell = Rect::new(
                    left + x * CellDisplay::WIDTH,
                    area.y + y * CellDisplay::HEIGHT,
                    CellDisplay::WIDTH,
                    CellDisplay::HEIGHT,
                )
                .intersection(area);
                if !cell.is_empty() {
                    CellDisplay::new(*look).render(cell, buf);
                }
            }
        }
    }
}
