use std::time::{Duration, Instant};

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Terminal runtime.
///
/// Owns the event loop and the clock every screen reads its `now` from: time
/// elapsed since the runtime was created.
#[derive(Debug)]
pub struct Tui {
    events: EventLoop,
    epoch: Instant,
}

impl Default for Tui {
    fn default() -> Self {
        Self::new()
    }
}

impl Tui {
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
            epoch: Instant::now(),
        }
    }

    /// Current instant on the runtime clock.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Sets the tick rate in Hz; `None` stops ticking.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Caps redraws to `rate` frames per second.
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events
            .set_min_render_gap(Duration::from_secs_f64(1.0 / rate));
    }

    /// Runs `app` until it asks to exit.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        let now = self.now();
                        terminal.draw(|f| app.draw(f, now))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
