use std::iter;

use blockfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

/// Score, level, high score and line-clear counters of a session.
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    highscore: u64,
    style: Style,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    /// `highscore` is the stored best; the panel shows the session score
    /// instead once it is higher.
    pub fn new(session: &'a GameSession, highscore: u64, style: Style) -> Self {
        Self {
            session,
            highscore,
            style,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = fn(&GameSession, u64) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    Label(&'static str),
    Value(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::Label("SCORE:"),
    Row::Value(|session, _| session.score().to_string()),
    Row::Label("HIGH SCORE:"),
    Row::Value(|session, highscore| highscore.max(session.score()).to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", |session, _| session.level().to_string()),
    Row::LabelValue("LINES:", |session, _| {
        session.stats().cleared_lines().to_string()
    }),
    Row::LabelValue("PIECES:", |session, _| {
        session.stats().completed_pieces().to_string()
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", |session, _| {
        session.stats().line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", |session, _| {
        session.stats().line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", |session, _| {
        session.stats().line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("QUADS:", |session, _| {
        session.stats().line_cleared_counter()[4].to_string()
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let row_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), row_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::Label(label) => {
                    Line::styled(label, self.style)
                        .left_aligned()
                        .render(area, buf);
                }
                Row::Value(value) => {
                    Line::styled(value(self.session, self.highscore), self.style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, self.style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session, self.highscore), self.style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Board, PieceGenerator, Randomizer, SessionSnapshot};

    use super::*;

    fn rendered_text(display: StatsDisplay<'_>) -> Vec<String> {
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_owned())
                    .collect::<String>()
            })
            .collect()
    }

    fn session_with_score(score: u64) -> GameSession {
        let snapshot = SessionSnapshot {
            board: Board::EMPTY,
            score,
            level: 1,
        };
        GameSession::from_snapshot(snapshot, PieceGenerator::new(Randomizer::Uniform))
    }

    #[test]
    fn test_shows_score_and_level() {
        let session = session_with_score(1200);
        let lines = rendered_text(StatsDisplay::new(&session, 5000, Style::new()));
        assert_eq!(lines[1].trim(), "1200");
        assert_eq!(lines[3].trim(), "5000");
        assert!(lines[5].starts_with("LEVEL:"));
        assert!(lines[5].trim_end().ends_with('3'));
    }

    #[test]
    fn test_high_score_follows_a_better_session() {
        let session = session_with_score(700);
        let lines = rendered_text(StatsDisplay::new(&session, 300, Style::new()));
        assert_eq!(lines[3].trim(), "700");
    }
}
