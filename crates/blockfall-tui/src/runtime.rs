use std::{
    io,
    time::{Duration, Instant},
};

use crate::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// Owns the terminal loop for an [`App`].
///
/// Ticks are off until someone asks for them with [`Runtime::set_tick_interval`];
/// screens without timed behavior simply wait for input.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(Instant::now()),
        }
    }

    /// Sets how often [`App::update`] runs, or stops ticking with `None`.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval, Instant::now());
    }

    /// Caps redraws at `rate` frames per second.
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events
            .set_frame_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Sets up the terminal and drives `app` until it asks to exit.
    ///
    /// The terminal is restored before this returns, including on error.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(elapsed) => app.update(&mut self, elapsed),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Input(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
