use std::time::Duration;

use blockfall_engine::{GameSession, Intent, PieceGenerator, SessionSnapshot, SessionState};
use blockfall_tui::{Leave, Runtime, Screen, Transition};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Margin},
    text::Line,
    widgets::{Block as BlockWidget, Clear, Paragraph},
};

use crate::{
    command::play::{Notices, PlayConfig},
    skin::Skin,
    store::Store,
    view::widgets::{BoardDisplay, KeyBinding, KeyBindingDisplay, StatsDisplay},
};

const TICK_INTERVAL: Duration = Duration::from_millis(16);
const FRAME_RATE: f64 = 60.0;

const PLAYING_HELP: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑"], "Rotate"),
    (&["Space"], "Drop"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_HELP: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const GAME_OVER_HELP: &[KeyBinding] = &[(&["Enter", "Q"], "Back to menu")];

fn intent_for(key: &KeyEvent) -> Option<Intent> {
    let intent = match key.code {
        KeyCode::Left => Intent::MoveLeft,
        KeyCode::Right => Intent::MoveRight,
        KeyCode::Down => Intent::SoftDrop,
        KeyCode::Up => Intent::Rotate,
        KeyCode::Char(' ') => Intent::HardDrop,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Intent::Quit,
        KeyCode::Char('p' | 'P') => Intent::TogglePause,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

/// One game from spawn to quit or game over.
///
/// Quitting saves the session. Game over records the high score and removes
/// the save file; the final board stays on screen until the player leaves.
#[derive(Debug)]
pub(crate) struct GameScreen {
    session: GameSession,
    skin: Skin,
    store: Store,
    notices: Notices,
    highscore: u64,
    finished: bool,
}

impl GameScreen {
    pub(crate) fn new(config: PlayConfig, notices: Notices, resume: bool) -> Self {
        let PlayConfig {
            skin,
            store,
            randomizer,
            seed,
        } = config;
        let snapshot = resume
            .then(|| store.load_session())
            .flatten()
            .unwrap_or_default();
        let generator = match seed {
            Some(seed) => PieceGenerator::with_seed(randomizer, seed),
            None => PieceGenerator::new(randomizer),
        };
        let session = GameSession::from_snapshot(snapshot, generator);
        let highscore = store.load_highscore();

        let mut screen = Self {
            session,
            skin,
            store,
            notices,
            highscore,
            finished: false,
        };
        // A resumed board can already be topped out
        screen.finish_if_over();
        screen
    }

    fn finish_if_over(&mut self) {
        if self.finished || !self.session.session_state().is_game_over() {
            return;
        }
        self.finished = true;

        let score = self.session.score();
        match self.store.record_highscore(score) {
            Ok(true) => self.notices.push(format!("New high score: {score}")),
            Ok(false) => {}
            Err(err) => self.notices.push(format!("{err:#}")),
        }
        if let Err(err) = self.store.discard_session() {
            self.notices.push(format!("{err:#}"));
        }
        self.notices.push(format!(
            "Replay this piece sequence with --seed {}",
            self.session.piece_seed()
        ));
    }

    fn save(&self) {
        match self.store.save_session(&self.session.snapshot()) {
            Ok(()) => self.notices.push(format!(
                "Session saved to {}",
                self.store.save_file().display()
            )),
            Err(err) => self.notices.push(format!("{err:#}")),
        }
    }
}

impl Screen for GameScreen {
    fn on_enter(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_interval(Some(TICK_INTERVAL));
        runtime.set_frame_rate(FRAME_RATE);
    }

    fn on_leave(&mut self, _runtime: &mut Runtime, leave: Leave) {
        if leave.is_closed() && !self.finished {
            self.save();
        }
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> Transition {
        let Some(key) = event
            .as_key_event()
            .filter(|key| key.kind == KeyEventKind::Press)
        else {
            return Transition::Stay;
        };
        if self.finished {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q' | 'Q') => Transition::Pop,
                _ => Transition::Stay,
            };
        }

        let Some(intent) = intent_for(&key) else {
            return Transition::Stay;
        };
        if intent == Intent::Quit {
            return Transition::Pop;
        }
        // Blocked moves and rotations are ignored
        let _ = self.session.apply_intent(intent);
        self.finish_if_over();
        Transition::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        if self.finished {
            return;
        }
        self.session.tick(elapsed);
        self.finish_if_over();
    }

    fn draw(&self, frame: &mut Frame) {
        let skin = self.skin;
        let state = self.session.session_state();

        let mut board = BoardDisplay::new(self.session.board(), skin).block(
            BlockWidget::bordered()
                .title(Line::from(skin.title()).centered())
                .style(skin.text()),
        );
        if !state.is_game_over() {
            board = board
                .ghost(self.session.ghost_piece())
                .falling_piece(*self.session.falling_piece());
        }
        let stats = StatsDisplay::new(&self.session, self.highscore, skin.text())
            .block(BlockWidget::bordered().title(" STATS ").style(skin.text()));

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(board.height()),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [board_area, _, stats_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(2),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .areas(main_area);
        let [stats_area, _] =
            Layout::vertical([Constraint::Length(stats.height()), Constraint::Fill(1)])
                .areas(stats_area);

        frame.render_widget(board, board_area);
        frame.render_widget(stats, stats_area);

        let (banner, help) = match state {
            SessionState::Playing => (None, PLAYING_HELP),
            SessionState::Paused => (Some("PAUSED"), PAUSED_HELP),
            SessionState::GameOver => (Some("GAME OVER"), GAME_OVER_HELP),
        };
        if let Some(banner) = banner {
            let [_, banner_area, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(3),
                Constraint::Fill(1),
            ])
            .areas(board_area.inner(Margin::new(2, 0)));
            frame.render_widget(Clear, banner_area);
            frame.render_widget(
                Paragraph::new(banner)
                    .centered()
                    .style(skin.accent())
                    .block(BlockWidget::bordered()),
                banner_area,
            );
        }
        frame.render_widget(KeyBindingDisplay::new(help, skin.accent()), help_area);
    }
}
