use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Something [`Runtime::run`] can drive.
pub trait App {
    /// Called once before the first event, with the terminal already set up.
    fn init(&mut self, runtime: &mut Runtime);

    /// Checked before waiting for each event; `true` ends the loop.
    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Advances time-driven state by `elapsed`, the real time since the last tick.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}
