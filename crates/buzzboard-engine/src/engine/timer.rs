//! Cancellable timers driven by caller-supplied instants.
//!
//! Instants are `Duration`s measured from an arbitrary epoch chosen by the
//! caller. Nothing here reads a clock: the interactive front end feeds elapsed
//! wall-clock time and tests feed synthetic instants.

use std::time::Duration;

/// A one-shot deadline that can be armed, cancelled, and fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    #[must_use]
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer to fire `delay` after `now`, replacing any prior deadline.
    pub fn start(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarms the timer and returns `true` if it is due at `now`.
    pub fn fire(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Progress-reporting countdown for the buzz window.
///
/// The countdown expires once `now >= start + window`. It can be halted at
/// any tick; a halted countdown reports a frozen progress fraction and never
/// expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    started_at: Duration,
    window: Duration,
    frozen: Option<f64>,
}

impl Countdown {
    #[must_use]
    pub fn start(now: Duration, window: Duration) -> Self {
        Self {
            started_at: now,
            window,
            frozen: None,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.started_at.saturating_add(self.window)
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.frozen.is_some()
    }

    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        !self.is_halted() && now >= self.deadline()
    }

    /// Elapsed fraction of the window in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self, now: Duration) -> f64 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        if self.window.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.window.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Remaining time before expiry, zero once expired or halted.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        if self.is_halted() {
            return Duration::ZERO;
        }
        self.deadline().saturating_sub(now)
    }

    /// Stops the countdown with its progress indicator pinned to full.
    pub fn halt_full(&mut self) {
        self.frozen = Some(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_timer_fires_once() {
        let mut timer = Timer::idle();
        assert!(!timer.fire(ms(0)));
        timer.start(ms(100), ms(50));
        assert!(!timer.fire(ms(149)));
        assert!(timer.fire(ms(150)));
        assert!(!timer.fire(ms(151)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timer = Timer::idle();
        timer.start(ms(0), ms(10));
        timer.cancel();
        assert!(!timer.fire(ms(1_000)));
    }

    #[test]
    fn test_countdown_progress_and_expiry() {
        let countdown = Countdown::start(ms(2_000), ms(5_000));
        assert!(countdown.fraction(ms(2_000)).abs() < 1e-9);
        assert!((countdown.fraction(ms(4_500)) - 0.5).abs() < 1e-9);
        assert!(!countdown.is_expired(ms(6_999)));
        assert!(countdown.is_expired(ms(7_000)));
        assert!((countdown.fraction(ms(9_000)) - 1.0).abs() < 1e-9);
        assert_eq!(countdown.remaining(ms(6_000)), ms(1_000));
    }

    #[test]
    fn test_halted_countdown_is_frozen() {
        let mut countdown = Countdown::start(ms(0), ms(5_000));
        countdown.halt_full();
        assert!((countdown.fraction(ms(1_000)) - 1.0).abs() < 1e-9);
        assert!(!countdown.is_expired(ms(60_000)));
        assert_eq!(countdown.remaining(ms(1_000)), Duration::ZERO);
    }
}
