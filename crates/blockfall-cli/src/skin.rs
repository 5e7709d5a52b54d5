use blockfall_engine::{Appearance, ShapeKind};
use ratatui::style::{Color, Modifier, Style};

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(60, 60, 60);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const NEON_PINK: Color = Color::Rgb(255, 16, 240);
    pub const NEON_BLUE: Color = Color::Rgb(77, 77, 255);
    pub const NEON_GREEN: Color = Color::Rgb(57, 255, 20);
    pub const NEON_YELLOW: Color = Color::Rgb(224, 231, 34);
    pub const NEON_ORANGE: Color = Color::Rgb(255, 173, 0);
    pub const NEON_PURPLE: Color = Color::Rgb(188, 19, 254);
    pub const NEON_CYAN: Color = Color::Rgb(0, 254, 252);
}

const fn fg_bg(fg: Color, bg: Color) -> Style {
    Style::new().fg(fg).bg(bg)
}

const fn bg_only(color: Color) -> Style {
    Style::new().fg(color).bg(color)
}

/// How one board cell looks on screen: a style plus a two-column symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellLook {
    pub(crate) style: Style,
    pub(crate) symbol: &'static str,
}

impl CellLook {
    const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }
}

/// Visual theme. Skins only change colours, glyphs and the title; gameplay
/// is identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Skin {
    /// Solid coloured blocks
    #[default]
    Classic,
    /// Glowing outlines on black
    Neon,
    /// No colours, ASCII blocks
    Mono,
}

impl Skin {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Skin::Classic => "BLOCKFALL",
            Skin::Neon => "B L O C K F A L L",
            Skin::Mono => "[ blockfall ]",
        }
    }

    /// Style for text and frames.
    pub(crate) fn text(self) -> Style {
        match self {
            Skin::Classic => fg_bg(color::WHITE, color::BLACK),
            Skin::Neon => fg_bg(color::NEON_CYAN, color::BLACK).add_modifier(Modifier::BOLD),
            Skin::Mono => Style::new(),
        }
    }

    pub(crate) fn accent(self) -> Style {
        match self {
            Skin::Classic => fg_bg(color::YELLOW, color::BLACK),
            Skin::Neon => fg_bg(color::NEON_PINK, color::BLACK).add_modifier(Modifier::BOLD),
            Skin::Mono => Style::new().add_modifier(Modifier::REVERSED),
        }
    }

    pub(crate) fn empty(self) -> CellLook {
        match self {
            Skin::Classic => CellLook::new(fg_bg(color::GRAY, color::BLACK), " ."),
            Skin::Neon => CellLook::new(fg_bg(color::DARK_GRAY, color::BLACK), " ·"),
            Skin::Mono => CellLook::new(Style::new(), " ."),
        }
    }

    pub(crate) fn ghost(self) -> CellLook {
        match self {
            Skin::Classic => CellLook::new(fg_bg(color::GRAY, color::BLACK), "[]"),
            Skin::Neon => CellLook::new(fg_bg(color::NEON_CYAN, color::BLACK), "░░"),
            Skin::Mono => CellLook::new(Style::new(), "::"),
        }
    }

    /// Look of a filled cell carrying `appearance`.
    ///
    /// Tags outside the shape catalog, which can only come from hand-edited
    /// save files, are drawn in a neutral colour.
    pub(crate) fn filled(self, appearance: Appearance) -> CellLook {
        let kind = appearance.shape_kind();
        match self {
            Skin::Classic => {
                let color = kind.map_or(color::GRAY, |kind| match kind {
                    ShapeKind::I => color::CYAN,
                    ShapeKind::J => color::BLUE,
                    ShapeKind::L => color::ORANGE,
                    ShapeKind::O => color::YELLOW,
                    ShapeKind::S => color::GREEN,
                    ShapeKind::T => color::MAGENTA,
                    ShapeKind::Z => color::RED,
                });
                CellLook::new(bg_only(color), "  ")
            }
            Skin::Neon => {
                let color = kind.map_or(color::WHITE, |kind| match kind {
                    ShapeKind::I => color::NEON_CYAN,
                    ShapeKind::J => color::NEON_BLUE,
                    ShapeKind::L => color::NEON_ORANGE,
                    ShapeKind::O => color::NEON_YELLOW,
                    ShapeKind::S => color::NEON_GREEN,
                    ShapeKind::T => color::NEON_PURPLE,
                    ShapeKind::Z => color::NEON_PINK,
                });
                CellLook::new(fg_bg(color, color::BLACK), "██")
            }
            Skin::Mono => CellLook::new(Style::new(), "[]"),
        }
    }
}
