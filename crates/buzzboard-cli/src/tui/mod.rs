//! Minimal terminal runtime: a tick/render event loop, a monotonic clock
//! and a stack of screens.

mod app;
mod event;
mod event_loop;
mod runner;
mod screen;

pub use self::{
    app::App,
    runner::Tui,
    screen::{Screen, ScreenStack, ScreenTransition},
};
