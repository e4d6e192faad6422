//! Narration (text-to-speech) interface and its completion gate.
//!
//! Real speech backends do not reliably report when they finish speaking, so
//! completion is decided by [`NarrationGate`], which resolves on the first of:
//!
//! 1. an explicit finished/failed signal from the backend,
//! 2. the backend reporting that it is no longer producing audio,
//! 3. a hard ceiling derived from the estimated speech duration.
//!
//! The clue countdown only starts once the gate has resolved.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("narration failed: {message}")]
pub struct NarrationError {
    message: String,
}

impl NarrationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A speech backend.
///
/// Implementations are selected by configuration (system voice, external
/// command, silent). `now` is the caller's current instant; backends that
/// track real playback may ignore it.
pub trait Narrator: fmt::Debug {
    /// Starts speaking `text` and returns a handle to the playback.
    fn speak(&mut self, text: &str, now: Duration) -> Result<Box<dyn Narration>, NarrationError>;
}

/// Handle to one in-progress narration.
pub trait Narration: fmt::Debug {
    /// Returns the backend's explicit completion signal, if it has fired.
    fn take_signal(&mut self, now: Duration) -> Option<Result<(), NarrationError>>;

    /// Returns whether the backend reports that audio is still playing.
    fn is_speaking(&mut self, now: Duration) -> bool;

    /// Stops playback. Must be safe to call more than once.
    fn cancel(&mut self);
}

/// How the narration gate resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum NarrationEnd {
    /// The backend signalled completion.
    Finished,
    /// The backend signalled a playback error.
    Failed,
    /// The backend could not start speaking at all.
    Unavailable,
    /// The backend stopped reporting audio without signalling completion.
    ObservedIdle,
    /// The ceiling timeout elapsed first.
    CeilingReached,
}

/// Speech duration estimate used to bound the wait for narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechEstimate {
    /// Time per spoken word (about 150 words per minute).
    pub per_word: Duration,
    pub min: Duration,
    pub max: Duration,
    /// Extra time allowed on top of the estimate before giving up.
    pub margin: Duration,
    /// Time after starting during which an idle backend is not trusted,
    /// since audio may not have begun yet.
    pub idle_grace: Duration,
}

impl Default for SpeechEstimate {
    fn default() -> Self {
        Self {
            per_word: Duration::from_millis(400),
            min: Duration::from_millis(1200),
            max: Duration::from_millis(12_000),
            margin: Duration::from_millis(500),
            idle_grace: Duration::from_millis(300),
        }
    }
}

impl SpeechEstimate {
    /// Estimated time to speak `text`, clamped to `min..=max`.
    #[must_use]
    pub fn estimate(&self, text: &str) -> Duration {
        let words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);
        self.per_word
            .saturating_mul(words)
            .clamp(self.min, self.max)
    }

    /// Absolute wait bound for narrating `text`.
    #[must_use]
    pub fn ceiling(&self, text: &str) -> Duration {
        self.estimate(text).saturating_add(self.margin)
    }
}

/// Awaitable narration with a timeout and secondary idle confirmation.
///
/// Poll it on every tick; once it resolves it stays resolved and releases the
/// backend handle.
#[derive(Debug)]
pub struct NarrationGate {
    narration: Option<Box<dyn Narration>>,
    started_at: Duration,
    ceiling: Duration,
    idle_grace: Duration,
    seen_speaking: bool,
    end: Option<NarrationEnd>,
}

impl NarrationGate {
    /// Asks `narrator` to speak `text` and starts guarding its completion.
    ///
    /// A backend that fails to start resolves the gate immediately.
    pub fn start(
        narrator: &mut dyn Narrator,
        text: &str,
        now: Duration,
        speech: &SpeechEstimate,
    ) -> Self {
        let (narration, end) = match narrator.speak(text, now) {
            Ok(narration) => (Some(narration), None),
            Err(err) => {
                tracing::warn!(error = %err, "narration unavailable, continuing without audio");
                (None, Some(NarrationEnd::Unavailable))
            }
        };
        Self {
            narration,
            started_at: now,
            ceiling: speech.ceiling(text),
            idle_grace: speech.idle_grace,
            seen_speaking: false,
            end,
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<NarrationEnd> {
        self.end
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.end.is_some()
    }

    /// Instant at which the gate resolves regardless of the backend.
    #[must_use]
    pub fn ceiling_at(&self) -> Duration {
        self.started_at.saturating_add(self.ceiling)
    }

    /// Checks the completion conditions at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<NarrationEnd> {
        if self.end.is_some() {
            return self.end;
        }
        let narration = self.narration.as_mut()?;

        let end = match narration.take_signal(now) {
            Some(Ok(())) => Some(NarrationEnd::Finished),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "narration failed, starting countdown");
                Some(NarrationEnd::Failed)
            }
            None => {
                if narration.is_speaking(now) {
                    self.seen_speaking = true;
                    None
                } else if self.seen_speaking
                    || now.saturating_sub(self.started_at) >= self.idle_grace
                {
                    tracing::debug!("narration went idle without a completion signal");
                    Some(NarrationEnd::ObservedIdle)
                } else {
                    None
                }
            }
        };
        let end = end.or_else(|| {
            (now >= self.ceiling_at()).then(|| {
                tracing::warn!(
                    ceiling_ms = self.ceiling.as_millis(),
                    "narration did not finish before its ceiling"
                );
                NarrationEnd::CeilingReached
            })
        });

        if let Some(end) = end {
            self.finish(end);
        }
        end
    }

    /// Stops playback without resolving the gate.
    pub fn cancel(&mut self) {
        if let Some(mut narration) = self.narration.take() {
            narration.cancel();
        }
    }

    fn finish(&mut self, end: NarrationEnd) {
        if let Some(mut narration) = self.narration.take()
            && end == NarrationEnd::CeilingReached
        {
            narration.cancel();
        }
        self.end = Some(end);
    }
}

/// Narrator used when speech is turned off: every narration completes
/// immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

#[derive(Debug)]
struct SilentNarration;

impl Narrator for SilentNarrator {
    fn speak(&mut self, _text: &str, _now: Duration) -> Result<Box<dyn Narration>, NarrationError> {
        Ok(Box::new(SilentNarration))
    }
}

impl Narration for SilentNarration {
    fn take_signal(&mut self, _now: Duration) -> Option<Result<(), NarrationError>> {
        Some(Ok(()))
    }

    fn is_speaking(&mut self, _now: Duration) -> bool {
        false
    }

    fn cancel(&mut self) {}
}

/// How a [`SimulatedNarrator`] playback behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulatedBehavior {
    /// Speaks for the configured duration, then signals completion.
    #[default]
    Completes,
    /// Speaks for the configured duration, then goes idle without a signal.
    StopsSilently,
    /// Speaks for the configured duration, then signals an error.
    Fails,
    /// Reports speaking forever and never signals.
    Hangs,
    /// Refuses to start.
    Unavailable,
}

/// Deterministic narrator that "speaks" for a fixed duration.
///
/// Keeps a record of every text it was asked to speak. Useful for headless
/// runs and for exercising the narration gate.
#[derive(Debug, Clone)]
pub struct SimulatedNarrator {
    duration: Duration,
    behavior: SimulatedBehavior,
    spoken: Vec<String>,
}

impl SimulatedNarrator {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self::with_behavior(duration, SimulatedBehavior::Completes)
    }

    #[must_use]
    pub fn with_behavior(duration: Duration, behavior: SimulatedBehavior) -> Self {
        Self {
            duration,
            behavior,
            spoken: Vec::new(),
        }
    }

    /// Texts spoken so far, oldest first.
    #[must_use]
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

#[derive(Debug)]
struct SimulatedNarration {
    ends_at: Duration,
    behavior: SimulatedBehavior,
    cancelled: bool,
}

impl Narrator for SimulatedNarrator {
    fn speak(&mut self, text: &str, now: Duration) -> Result<Box<dyn Narration>, NarrationError> {
        if self.behavior == SimulatedBehavior::Unavailable {
            return Err(NarrationError::new("simulated backend unavailable"));
        }
        self.spoken.push(text.to_owned());
        Ok(Box::new(SimulatedNarration {
            ends_at: now.saturating_add(self.duration),
            behavior: self.behavior,
            cancelled: false,
        }))
    }
}

impl Narration for SimulatedNarration {
    fn take_signal(&mut self, now: Duration) -> Option<Result<(), NarrationError>> {
        if self.cancelled || now < self.ends_at {
            return None;
        }
        match self.behavior {
            SimulatedBehavior::Completes => Some(Ok(())),
            SimulatedBehavior::Fails => Some(Err(NarrationError::new("simulated playback error"))),
            SimulatedBehavior::StopsSilently
            | SimulatedBehavior::Hangs
            | SimulatedBehavior::Unavailable => None,
        }
    }

    fn is_speaking(&mut self, now: Duration) -> bool {
        !self.cancelled && (self.behavior == SimulatedBehavior::Hangs || now < self.ends_at)
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn run_until_resolved(gate: &mut NarrationGate, step: Duration) -> (Duration, NarrationEnd) {
        let mut now = Duration::ZERO;
        loop {
            if let Some(end) = gate.poll(now) {
                return (now, end);
            }
            now += step;
            assert!(now < Duration::from_secs(60), "gate never resolved");
        }
    }

    #[test]
    fn test_estimate_is_clamped() {
        let speech = SpeechEstimate::default();
        assert_eq!(speech.estimate("one"), ms(1200));
        assert_eq!(speech.estimate("one two three four five"), ms(2000));
        let long = "word ".repeat(100);
        assert_eq!(speech.estimate(&long), ms(12_000));
        assert_eq!(speech.ceiling("one"), ms(1700));
    }

    #[test]
    fn test_explicit_signal_resolves() {
        let mut narrator = SimulatedNarrator::new(ms(800));
        let mut gate =
            NarrationGate::start(&mut narrator, "short", Duration::ZERO, &SpeechEstimate::default());
        let (at, end) = run_until_resolved(&mut gate, ms(100));
        assert_eq!(end, NarrationEnd::Finished);
        assert_eq!(at, ms(800));
        assert_eq!(narrator.spoken(), ["short"]);
    }

    #[test]
    fn test_idle_poll_resolves_missing_signal() {
        let mut narrator = SimulatedNarrator::with_behavior(ms(600), SimulatedBehavior::StopsSilently);
        let mut gate =
            NarrationGate::start(&mut narrator, "short", Duration::ZERO, &SpeechEstimate::default());
        let (at, end) = run_until_resolved(&mut gate, ms(100));
        assert_eq!(end, NarrationEnd::ObservedIdle);
        assert_eq!(at, ms(600));
    }

    #[test]
    fn test_ceiling_resolves_hung_backend() {
        let mut narrator = SimulatedNarrator::with_behavior(ms(0), SimulatedBehavior::Hangs);
        let speech = SpeechEstimate::default();
        let mut gate = NarrationGate::start(&mut narrator, "a b c", Duration::ZERO, &speech);
        let (at, end) = run_until_resolved(&mut gate, ms(100));
        assert_eq!(end, NarrationEnd::CeilingReached);
        assert_eq!(at, speech.ceiling("a b c"));
    }

    #[test]
    fn test_failure_is_not_fatal() {
        let mut narrator = SimulatedNarrator::with_behavior(ms(300), SimulatedBehavior::Fails);
        let mut gate =
            NarrationGate::start(&mut narrator, "x", Duration::ZERO, &SpeechEstimate::default());
        let (at, end) = run_until_resolved(&mut gate, ms(100));
        assert_eq!(end, NarrationEnd::Failed);
        assert_eq!(at, ms(300));
    }

    #[test]
    fn test_unavailable_backend_resolves_immediately() {
        let mut narrator = SimulatedNarrator::with_behavior(ms(300), SimulatedBehavior::Unavailable);
        let mut gate =
            NarrationGate::start(&mut narrator, "x", ms(50), &SpeechEstimate::default());
        assert_eq!(gate.poll(ms(50)), Some(NarrationEnd::Unavailable));
        assert!(narrator.spoken().is_empty());
    }

    #[test]
    fn test_idle_before_grace_is_not_trusted() {
        // A backend that has not started producing audio yet looks idle.
        #[derive(Debug)]
        struct LateStart;
        impl Narration for LateStart {
            fn take_signal(&mut self, now: Duration) -> Option<Result<(), NarrationError>> {
                (now >= ms(2_000)).then_some(Ok(()))
            }
            fn is_speaking(&mut self, now: Duration) -> bool {
                now >= ms(100) && now < ms(2_000)
            }
            fn cancel(&mut self) {}
        }
        #[derive(Debug)]
        struct LateStartNarrator;
        impl Narrator for LateStartNarrator {
            fn speak(
                &mut self,
                _text: &str,
                _now: Duration,
            ) -> Result<Box<dyn Narration>, NarrationError> {
                Ok(Box::new(LateStart))
            }
        }

        let mut gate = NarrationGate::start(
            &mut LateStartNarrator,
            "one two three four five six",
            Duration::ZERO,
            &SpeechEstimate::default(),
        );
        let (at, end) = run_until_resolved(&mut gate, ms(50));
        assert_eq!(end, NarrationEnd::Finished);
        assert_eq!(at, ms(2_000));
    }

    #[test]
    fn test_resolution_is_sticky() {
        let mut narrator = SilentNarrator;
        let mut gate =
            NarrationGate::start(&mut narrator, "x", Duration::ZERO, &SpeechEstimate::default());
        assert_eq!(gate.poll(Duration::ZERO), Some(NarrationEnd::Finished));
        assert_eq!(gate.poll(ms(10)), Some(NarrationEnd::Finished));
        assert!(gate.is_resolved());
    }
}
