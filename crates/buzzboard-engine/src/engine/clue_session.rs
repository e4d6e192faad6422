use std::{fmt, time::Duration};

use serde::Serialize;

use crate::{
    core::{CellRef, ClueRecord, OutcomeStatus},
    engine::{
        narration::{NarrationEnd, NarrationGate, Narrator},
        settings::Settings,
        timer::{Countdown, Timer},
    },
};

/// Unique identifier of a clue session within a game.
///
/// Every deferred input (buzz, scoring action, abandon) carries the id of the
/// session it was meant for and is ignored if that session is no longer the
/// active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why the response is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealKind {
    /// The player buzzed; they must mark themselves correct or wrong.
    Buzzed,
    /// The buzz window expired; the player can only acknowledge.
    TimedOut,
}

/// Lifecycle phase of a clue.
///
/// ```text
/// Init -> Narrating -> Countdown -+-> BlankDelay -> Revealed(Buzzed)   -+-> Terminal
///                                 +-> Expired    -> Revealed(TimedOut) -+
/// (any non-terminal phase) -> Abandoned -> Terminal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum CluePhase {
    Init,
    Narrating,
    Countdown,
    BlankDelay,
    Expired,
    Revealed(RevealKind),
    Abandoned,
    Terminal,
}

impl CluePhase {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Abandoned | Self::Terminal)
    }
}

/// Inputs accepted by the phase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueInput {
    Open,
    NarrationResolved,
    Buzz,
    Expire,
    BlankDelayElapsed,
    Reveal,
    MarkCorrect,
    MarkWrong,
    Acknowledge,
    Abandon,
    Finalize,
}

/// The clue phase table.
///
/// Returns the next phase, or `None` when `input` is not accepted in `phase`
/// (the input must then be ignored).
#[must_use]
pub fn next_phase(phase: CluePhase, input: ClueInput) -> Option<CluePhase> {
    use self::{ClueInput as I, CluePhase as P};

    let next = match (phase, input) {
        (P::Init, I::Open) => P::Narrating,
        (P::Narrating, I::NarrationResolved) => P::Countdown,
        (P::Countdown, I::Buzz) => P::BlankDelay,
        (P::Countdown, I::Expire) => P::Expired,
        (P::BlankDelay, I::BlankDelayElapsed) => P::Revealed(RevealKind::Buzzed),
        (P::Expired, I::Reveal) => P::Revealed(RevealKind::TimedOut),
        (P::Revealed(RevealKind::Buzzed), I::MarkCorrect | I::MarkWrong)
        | (P::Revealed(RevealKind::TimedOut), I::Acknowledge)
        | (P::Abandoned, I::Finalize) => P::Terminal,
        (phase, I::Abandon) if !phase.is_finished() => P::Abandoned,
        _ => return None,
    };
    Some(next)
}

/// Player's action on a revealed clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Verdict {
    Correct,
    Wrong,
    Acknowledge,
}

impl Verdict {
    fn input(self) -> ClueInput {
        match self {
            Self::Correct => ClueInput::MarkCorrect,
            Self::Wrong => ClueInput::MarkWrong,
            Self::Acknowledge => ClueInput::Acknowledge,
        }
    }

    fn status(self) -> OutcomeStatus {
        match self {
            Self::Correct => OutcomeStatus::Correct,
            Self::Wrong => OutcomeStatus::Wrong,
            Self::Acknowledge => OutcomeStatus::Skipped,
        }
    }
}

/// A phase transition, reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseChange {
    pub session: SessionId,
    pub from: CluePhase,
    pub to: CluePhase,
    pub at: Duration,
}

/// Drives one clue from selection to its terminal outcome.
///
/// The session never reads a clock; every time-dependent operation takes the
/// caller's current instant. Call [`advance`](Self::advance) on every tick.
#[derive(Debug)]
pub struct ClueSession {
    id: SessionId,
    cell: CellRef,
    category: String,
    clue: ClueRecord,
    phase: CluePhase,
    buzz_window: Duration,
    blank_delay: Duration,
    narration: Option<NarrationGate>,
    countdown: Option<Countdown>,
    blank_timer: Timer,
    resolution: Option<OutcomeStatus>,
    changes: Vec<PhaseChange>,
}

impl ClueSession {
    /// Opens a clue: shows it and starts narrating the clue text.
    ///
    /// Only the clue text is narrated, never the category or value.
    pub fn open(
        id: SessionId,
        cell: CellRef,
        category: impl Into<String>,
        clue: ClueRecord,
        settings: &Settings,
        narrator: &mut dyn Narrator,
        now: Duration,
    ) -> Self {
        let mut session = Self {
            id,
            cell,
            category: category.into(),
            clue,
            phase: CluePhase::Init,
            buzz_window: settings.buzz_window(),
            blank_delay: settings.blank_delay(),
            narration: None,
            countdown: None,
            blank_timer: Timer::idle(),
            resolution: None,
            changes: Vec::new(),
        };
        session.apply(ClueInput::Open, now);
        session.narration = Some(NarrationGate::start(
            narrator,
            session.clue.clue(),
            now,
            settings.speech(),
        ));
        session.advance(now);
        session
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn cell(&self) -> CellRef {
        self.cell
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.cell.value
    }

    #[must_use]
    pub fn clue(&self) -> &ClueRecord {
        &self.clue
    }

    #[must_use]
    pub fn phase(&self) -> CluePhase {
        self.phase
    }

    /// Terminal status, once the session has been resolved.
    #[must_use]
    pub fn resolution(&self) -> Option<OutcomeStatus> {
        self.resolution
    }

    #[must_use]
    pub fn narration_end(&self) -> Option<NarrationEnd> {
        self.narration.as_ref().and_then(NarrationGate::end)
    }

    /// Instant the buzz window opened, if it has.
    #[must_use]
    pub fn countdown_started_at(&self) -> Option<Duration> {
        self.countdown.as_ref().map(Countdown::started_at)
    }

    /// Countdown progress in `0.0..=1.0`; `None` before the countdown starts.
    #[must_use]
    pub fn countdown_fraction(&self, now: Duration) -> Option<f64> {
        self.countdown.as_ref().map(|c| c.fraction(now))
    }

    #[must_use]
    pub fn countdown_remaining(&self, now: Duration) -> Option<Duration> {
        self.countdown.as_ref().map(|c| c.remaining(now))
    }

    /// The response, once it may be shown.
    #[must_use]
    pub fn revealed_response(&self) -> Option<&str> {
        matches!(self.phase, CluePhase::Revealed(_) | CluePhase::Terminal)
            .then(|| self.clue.response())
    }

    /// Takes the phase changes recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<PhaseChange> {
        std::mem::take(&mut self.changes)
    }

    /// Fires every timer and narration condition that is due at `now`.
    pub fn advance(&mut self, now: Duration) {
        loop {
            let input = match self.phase {
                CluePhase::Narrating => {
                    let Some(end) = self.narration.as_mut().and_then(|gate| gate.poll(now)) else {
                        break;
                    };
                    tracing::debug!(session = %self.id, ?end, "narration resolved");
                    ClueInput::NarrationResolved
                }
                CluePhase::Countdown => {
                    if !self.countdown.is_some_and(|c| c.is_expired(now)) {
                        break;
                    }
                    ClueInput::Expire
                }
                CluePhase::Expired => ClueInput::Reveal,
                CluePhase::BlankDelay => {
                    if !self.blank_timer.fire(now) {
                        break;
                    }
                    ClueInput::BlankDelayElapsed
                }
                _ => break,
            };
            self.apply(input, now);
        }
    }

    /// Buzzes in.
    ///
    /// Due timers fire first, so a buzz at or after the expiry instant loses
    /// to the timeout. Returns whether the buzz was accepted.
    pub fn buzz(&mut self, now: Duration) -> bool {
        self.advance(now);
        if !self.apply(ClueInput::Buzz, now) {
            tracing::debug!(session = %self.id, phase = ?self.phase, "buzz ignored");
            return false;
        }
        true
    }

    /// Applies the player's scoring action.
    ///
    /// Returns the terminal status the first time a valid verdict is given and
    /// `None` afterwards or when the verdict does not fit the reveal.
    pub fn resolve(&mut self, verdict: Verdict, now: Duration) -> Option<OutcomeStatus> {
        if self.resolution.is_some() || !self.apply(verdict.input(), now) {
            return None;
        }
        let status = verdict.status();
        self.resolution = Some(status);
        Some(status)
    }

    /// Tears the session down before it was scored.
    ///
    /// Cancels narration and all timers. Returns [`OutcomeStatus::Skipped`]
    /// unless the session had already been resolved.
    pub fn abandon(&mut self, now: Duration) -> Option<OutcomeStatus> {
        if self.resolution.is_some() || !self.apply(ClueInput::Abandon, now) {
            return None;
        }
        self.cancel_pending();
        self.apply(ClueInput::Finalize, now);
        self.resolution = Some(OutcomeStatus::Skipped);
        self.resolution
    }

    fn cancel_pending(&mut self) {
        if let Some(gate) = &mut self.narration {
            gate.cancel();
        }
        if let Some(countdown) = &mut self.countdown {
            countdown.halt_full();
        }
        self.blank_timer.cancel();
    }

    fn apply(&mut self, input: ClueInput, now: Duration) -> bool {
        let Some(next) = next_phase(self.phase, input) else {
            return false;
        };
        match next {
            CluePhase::Countdown => {
                self.countdown = Some(Countdown::start(now, self.buzz_window));
            }
            CluePhase::BlankDelay => {
                if let Some(countdown) = &mut self.countdown {
                    countdown.halt_full();
                }
                self.blank_timer.start(now, self.blank_delay);
            }
            CluePhase::Expired => {
                if let Some(countdown) = &mut self.countdown {
                    countdown.halt_full();
                }
            }
            _ => {}
        }
        tracing::debug!(session = %self.id, from = ?self.phase, to = ?next, "clue phase");
        self.changes.push(PhaseChange {
            session: self.id,
            from: self.phase,
            to: next,
            at: now,
        });
        self.phase = next;
        true
    }
}

impl Drop for ClueSession {
    fn drop(&mut self) {
        if let Some(gate) = &mut self.narration {
            gate.cancel();
        }
    }
}
