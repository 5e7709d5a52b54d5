use std::{fmt, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use crate::{App, Runtime};

/// Why a screen stops being the top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Leave {
    /// Another screen was pushed on top; this one comes back on pop.
    Covered,
    /// The screen is removed from the stack and dropped right after.
    Closed,
}

/// One screen of a [`ScreenStack`].
///
/// Only the top screen receives events, ticks and draw calls. A screen gets
/// [`on_enter`](Self::on_enter) every time it becomes the top (initially and
/// when a screen above it pops) and [`on_leave`](Self::on_leave) every time
/// it stops being the top.
///
/// Runtime settings such as the tick interval belong in `on_enter`, since the
/// previous top screen may have changed them.
///
/// ```rust
/// use std::time::Duration;
///
/// use blockfall_tui::{Runtime, Screen, Transition};
/// use crossterm::event::Event;
/// use ratatui::Frame;
///
/// #[derive(Debug)]
/// struct Clock {
///     total: Duration,
/// }
///
/// impl Screen for Clock {
///     fn on_enter(&mut self, runtime: &mut Runtime) {
///         runtime.set_tick_interval(Some(Duration::from_millis(100)));
///     }
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> Transition {
///         Transition::Pop
///     }
///
///     fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
///         self.total += elapsed;
///     }
///
///     fn draw(&self, _frame: &mut Frame) {}
/// }
/// ```
pub trait Screen: fmt::Debug {
    fn on_enter(&mut self, runtime: &mut Runtime);

    /// Called when the screen stops being the top one.
    ///
    /// With [`Leave::Closed`] this is the last call the screen receives,
    /// which makes it the place for final side effects such as saving.
    fn on_leave(&mut self, _runtime: &mut Runtime, _leave: Leave) {}

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> Transition;

    fn update(&mut self, _runtime: &mut Runtime, _elapsed: Duration) {}

    fn draw(&self, frame: &mut Frame);
}

/// What the stack should do after a screen handled an event.
#[derive(Debug, derive_more::IsVariant)]
pub enum Transition {
    Stay,
    /// Cover the current screen with a new one.
    Push(Box<dyn Screen>),
    /// Close the current screen and return to the one below.
    Pop,
    /// Close every screen and stop the runtime.
    Exit,
}

/// An [`App`] made of stacked screens.
///
/// The application exits once the last screen is popped or on [`Transition::Exit`].
#[derive(Debug)]
pub struct ScreenStack<'a> {
    screens: Vec<Box<dyn Screen + 'a>>,
    exiting: bool,
}

impl<'a> ScreenStack<'a> {
    #[must_use]
    pub fn new(root: Box<dyn Screen + 'a>) -> Self {
        Self {
            screens: vec![root],
            exiting: false,
        }
    }

    /// Number of screens currently on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    fn apply(&mut self, runtime: &mut Runtime, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Push(mut screen) => {
                if let Some(top) = self.screens.last_mut() {
                    top.on_leave(runtime, Leave::Covered);
                }
                screen.on_enter(runtime);
                self.screens.push(screen);
            }
            Transition::Pop => {
                if let Some(mut top) = self.screens.pop() {
                    top.on_leave(runtime, Leave::Closed);
                }
                if let Some(below) = self.screens.last_mut() {
                    below.on_enter(runtime);
                }
            }
            Transition::Exit => {
                while let Some(mut top) = self.screens.pop() {
                    top.on_leave(runtime, Leave::Closed);
                }
                self.exiting = true;
            }
        }
    }
}

impl App for ScreenStack<'_> {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(top) = self.screens.last_mut() {
            top.on_enter(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.exiting || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        let Some(top) = self.screens.last_mut() else {
            return;
        };
        let transition = top.handle_event(runtime, &event);
        self.apply(runtime, transition);
    }

    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration) {
        if let Some(top) = self.screens.last_mut() {
            top.update(runtime, elapsed);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(top) = self.screens.last() {
            top.draw(frame);
        }
    }
}
