use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, PartialEq)]
pub(crate) enum TuiEvent {
    /// Time to advance the simulation; carries the time since the previous tick.
    Tick(Duration),
    /// Something changed and the frame interval has passed.
    Render,
    Input(Event),
}

/// Decides what happens next: a tick, a redraw, or waiting for input.
///
/// Redraws only happen after something changed (a tick or an input event),
/// at most once per frame interval.
#[derive(Debug)]
pub(crate) struct EventLoop {
    tick_interval: Option<Duration>,
    frame_interval: Duration,
    last_tick: Instant,
    last_frame: Option<Instant>,
    dirty: bool,
}

impl EventLoop {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            tick_interval: None,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            last_tick: now,
            last_frame: None,
            dirty: true,
        }
    }

    /// Enables, changes or disables (`None`) ticking.
    ///
    /// Elapsed time is measured from `now`, so time spent with ticks off is
    /// never reported to the next tick.
    pub(crate) fn set_tick_interval(&mut self, interval: Option<Duration>, now: Instant) {
        self.tick_interval = interval;
        self.last_tick = now;
    }

    pub(crate) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Blocks until the next event.
    pub(crate) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(due) = self.poll_due(now) {
                return Ok(due);
            }
            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }
            self.dirty = true;
            return Ok(TuiEvent::Input(event::read()?));
        }
    }

    fn poll_due(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(interval) = self.tick_interval {
            let elapsed = now.saturating_duration_since(self.last_tick);
            if elapsed >= interval {
                self.last_tick = now;
                self.dirty = true;
                return Some(TuiEvent::Tick(elapsed));
            }
        }

        let frame_due = self
            .last_frame
            .is_none_or(|at| now.saturating_duration_since(at) >= self.frame_interval);
        if self.dirty && frame_due {
            self.last_frame = Some(now);
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    /// How long input may be waited for before a tick or frame falls due.
    ///
    /// `None` means nothing is scheduled and input can be awaited forever.
    fn timeout(&self, now: Instant) -> Option<Duration> {
        let tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let frame_at = self
            .dirty
            .then(|| self.last_frame.map_or(now, |at| at + self.frame_interval));
        let at = [tick_at, frame_at].into_iter().flatten().min()?;
        Some(at.saturating_duration_since(now))
    }
}
