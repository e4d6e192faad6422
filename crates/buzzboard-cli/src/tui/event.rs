use crossterm::event::Event as CrosstermEvent;

/// Events produced by the event loop.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Time to advance timers.
    Tick,
    /// Time to redraw.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
