use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Keys and what they do, e.g. `(&["←", "→"], "Move")`.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// A single centered help line listing key bindings.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
    key_style: Style,
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>], key_style: Style) -> Self {
        Self {
            bindings,
            key_style,
        }
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let dim = Style::new().add_modifier(Modifier::DIM);
        let mut spans = vec![];
        for (i, (keys, description)) in self.bindings.iter().copied().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", dim));
            }
            for (j, key) in keys.iter().copied().enumerate() {
                if j > 0 {
                    spans.push(Span::styled("/", dim));
                }
                spans.push(Span::styled(key, self.key_style));
            }
            spans.push(Span::raw(" "));
            spans.push(Span::raw(description));
        }
        spans
    }
}

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::from(self.spans()).centered().render(area, buf);
    }
}
