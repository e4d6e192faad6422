use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Produces tick, render and terminal events.
///
/// Ticks fire at a fixed interval when one is set. Renders happen after any
/// state change (tick or terminal event), at most once per `min_render_gap`.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    min_render_gap: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(60)).unwrap_or(now);
        Self {
            tick_interval: None,
            min_render_gap: Duration::ZERO,
            last_tick: now,
            last_render: past_time,
            dirty: true, // first frame
        }
    }

    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_min_render_gap(&mut self, gap: Duration) {
        self.min_render_gap = gap;
    }

    /// Blocks until the next event.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty && now.duration_since(self.last_render) >= self.min_render_gap {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self.dirty.then(|| self.last_render + self.min_render_gap);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
