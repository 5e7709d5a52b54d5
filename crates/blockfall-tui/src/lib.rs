//! A small screen-stack runtime for ratatui applications.
//!
//! [`Runtime`] owns the terminal loop and feeds an [`App`] with input events,
//! timed ticks carrying the elapsed time, and redraw requests. [`ScreenStack`]
//! is the [`App`] most programs want: a stack of [`Screen`]s where only the top
//! one is live.

pub use self::{
    app::App,
    runtime::Runtime,
    screen::{Leave, Screen, ScreenStack, Transition},
};

mod app;
mod event_loop;
mod runtime;
mod screen;
