use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

use crate::skin::CellLook;

/// One board cell, two terminal columns wide.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    look: CellLook,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub fn new(look: CellLook) -> Self {
        Self { look }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area with the style, not just the symbol cells
        Paragraph::new(self.look.symbol)
            .style(self.look.style)
            .render(area, buf);
    }
}
