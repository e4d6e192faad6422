use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for applications driven by [`Tui::run`].
pub trait App {
    /// Called once before the event loop starts.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, ...).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the current state as of `now` on the runtime clock.
    fn draw(&self, frame: &mut Frame, now: Duration);

    /// Advances time-dependent state (called on each tick).
    fn update(&mut self, tui: &mut Tui);
}
