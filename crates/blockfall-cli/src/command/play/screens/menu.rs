use blockfall_tui::{Runtime, Screen, Transition};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
};

use crate::{
    command::play::{Notices, PlayConfig, screens::GameScreen},
    view::widgets::{KeyBinding, KeyBindingDisplay},
};

const HELP: &[KeyBinding] = &[
    (&["1"], "Play"),
    (&["2"], "Exit"),
    (&["P"], "Pause"),
    (&["Space"], "Drop"),
];

/// Title screen: start a game or leave.
#[derive(Debug)]
pub(crate) struct MenuScreen {
    config: PlayConfig,
    notices: Notices,
    resume: bool,
    can_resume: bool,
    highscore: u64,
}

impl MenuScreen {
    /// With `resume` unset the first game ignores the save file; later games
    /// always resume what the previous one saved.
    pub(crate) fn new(config: PlayConfig, notices: Notices, resume: bool) -> Self {
        Self {
            config,
            notices,
            resume,
            can_resume: false,
            highscore: 0,
        }
    }

    fn refresh(&mut self) {
        self.highscore = self.config.store.load_highscore();
        self.can_resume = self.resume && self.config.store.load_session().is_some();
    }
}

impl Screen for MenuScreen {
    fn on_enter(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_interval(None);
        self.refresh();
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> Transition {
        let Some(key) = event
            .as_key_event()
            .filter(|key| key.kind == KeyEventKind::Press)
        else {
            return Transition::Stay;
        };
        match key.code {
            KeyCode::Char('1') | KeyCode::Enter => {
                let game = GameScreen::new(self.config.clone(), self.notices.clone(), self.resume);
                self.resume = true;
                Transition::Push(Box::new(game))
            }
            KeyCode::Char('2' | 'q') | KeyCode::Esc => Transition::Exit,
            _ => Transition::Stay,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let skin = self.config.skin;
        let play = if self.can_resume {
            "1. Play (resume saved game)"
        } else {
            "1. Play"
        };
        let menu = Text::from(vec![
            Line::styled(skin.title(), skin.accent()),
            Line::default(),
            Line::styled(play, skin.text()),
            Line::styled("2. Exit", skin.text()),
            Line::default(),
            Line::styled(format!("High score: {}", self.highscore), skin.text()),
        ])
        .centered();

        let [menu_area, _, help_area] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        frame.render_widget(menu, menu_area);
        frame.render_widget(KeyBindingDisplay::new(HELP, skin.accent()), help_area);
    }
}
