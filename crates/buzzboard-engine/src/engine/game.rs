use std::time::Duration;

use crate::{
    BoardBuildError, OpenCellError,
    core::{Board, CellRef, ClueRecord, Outcome, OutcomeLog, OutcomeStatus},
    engine::{
        board_builder::{BoardBuilder, BoardSeed},
        clue_session::{CluePhase, ClueSession, PhaseChange, SessionId, Verdict},
        narration::{NarrationEnd, Narrator},
        settings::Settings,
        summary::Summary,
    },
};

/// Snapshot of the active clue for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClueView<'a> {
    pub session: SessionId,
    pub cell: CellRef,
    pub category: &'a str,
    pub value: u32,
    pub clue: &'a str,
    pub phase: CluePhase,
    pub narration: Option<NarrationEnd>,
    /// Countdown progress, `None` while narrating.
    pub countdown: Option<f64>,
    pub remaining: Option<Duration>,
    /// The response, once revealed.
    pub response: Option<&'a str>,
}

/// Game context: the current board, score, outcome log and active clue.
///
/// All state lives here; nothing is global. Score and outcome log change only
/// when a clue session is finalized.
#[derive(Debug)]
pub struct Game {
    settings: Settings,
    builder: BoardBuilder,
    narrator: Box<dyn Narrator>,
    board: Option<Board>,
    score: i64,
    outcomes: OutcomeLog,
    active: Option<ClueSession>,
    next_session: u64,
    changes: Vec<PhaseChange>,
}

impl Game {
    #[must_use]
    pub fn new(settings: Settings, narrator: Box<dyn Narrator>) -> Self {
        let builder = BoardBuilder::new().eligible_round(settings.eligible_round());
        Self::with_builder(settings, narrator, builder)
    }

    #[must_use]
    pub fn with_seed(settings: Settings, narrator: Box<dyn Narrator>, seed: BoardSeed) -> Self {
        let builder = BoardBuilder::with_seed(seed).eligible_round(settings.eligible_round());
        Self::with_builder(settings, narrator, builder)
    }

    fn with_builder(settings: Settings, narrator: Box<dyn Narrator>, builder: BoardBuilder) -> Self {
        Self {
            settings,
            builder,
            narrator,
            board: None,
            score: 0,
            outcomes: OutcomeLog::new(),
            active: None,
            next_session: 1,
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn outcomes(&self) -> &OutcomeLog {
        &self.outcomes
    }

    #[must_use]
    pub fn active(&self) -> Option<&ClueSession> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn active_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(ClueSession::id)
    }

    /// Builds a fresh board and resets score and outcomes.
    ///
    /// On failure the previous board, score and outcomes are left untouched.
    /// An active clue is abandoned at `now` without recording an outcome; its
    /// closing phase changes are kept for [`drain_changes`](Self::drain_changes).
    pub fn start_board(
        &mut self,
        pool: &[ClueRecord],
        now: Duration,
    ) -> Result<&Board, BoardBuildError> {
        let board = self.builder.build(
            pool,
            self.settings.category_count(),
            self.settings.value_ladder(),
        )?;
        self.changes.clear();
        if let Some(mut session) = self.active.take() {
            session.abandon(now);
            self.changes.extend(session.drain_changes());
            tracing::debug!(session = %session.id(), ?now, "session dropped by new board");
        }
        self.outcomes.clear();
        self.score = 0;
        Ok(self.board.insert(board))
    }

    /// Opens a cell and starts its clue session.
    ///
    /// Opening the cell of the active session returns its id. Opening another
    /// cell first abandons the active session, which is recorded as skipped.
    pub fn open_cell(&mut self, cell: CellRef, now: Duration) -> Result<SessionId, OpenCellError> {
        if let Some(session) = &self.active
            && session.cell() == cell
        {
            return Ok(session.id());
        }
        let no_such_cell = OpenCellError::NoSuchCell {
            category: cell.category,
            value: cell.value,
        };
        let board = self.board.as_ref().ok_or(no_such_cell)?;
        let (Some(category), Some(clue)) = (board.category(cell), board.clue(cell)) else {
            return Err(OpenCellError::NoSuchCell {
                category: cell.category,
                value: cell.value,
            });
        };
        if board.is_used(cell) {
            return Err(OpenCellError::AlreadyUsed {
                category: cell.category,
                value: cell.value,
            });
        }
        let name = category.name().to_owned();
        let clue = clue.clone();

        if let Some(id) = self.active_id() {
            self.abandon(id, now);
        }

        let id = SessionId::new(self.next_session);
        self.next_session += 1;
        if let Some(board) = &mut self.board {
            board.mark_used(cell);
        }
        let session = ClueSession::open(
            id,
            cell,
            name,
            clue,
            &self.settings,
            self.narrator.as_mut(),
            now,
        );
        tracing::info!(session = %id, category = session.category(), value = cell.value, "clue opened");
        self.active = Some(session);
        self.collect_changes();
        Ok(id)
    }

    /// Fires due timers and narration conditions of the active session.
    pub fn advance(&mut self, now: Duration) {
        if let Some(session) = &mut self.active {
            session.advance(now);
        }
        self.collect_changes();
    }

    /// Buzzes in on session `id`. Ignored unless `id` is the active session.
    pub fn buzz(&mut self, id: SessionId, now: Duration) -> bool {
        let accepted = self
            .active_mut(id)
            .is_some_and(|session| session.buzz(now));
        self.collect_changes();
        accepted
    }

    /// Scores the revealed clue of session `id`.
    ///
    /// Returns the logged outcome, or `None` when the verdict does not apply
    /// (stale id, clue not revealed, verdict already given).
    pub fn resolve(&mut self, id: SessionId, verdict: Verdict, now: Duration) -> Option<Outcome> {
        let status = self.active_mut(id)?.resolve(verdict, now);
        self.collect_changes();
        self.finalize(status?)
    }

    /// Abandons session `id`, recording it as skipped.
    pub fn abandon(&mut self, id: SessionId, now: Duration) -> Option<Outcome> {
        let status = self.active_mut(id)?.abandon(now);
        self.collect_changes();
        self.finalize(status?)
    }

    /// Whether every cell of the current board has been played.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.active.is_none() && self.board.as_ref().is_some_and(Board::is_exhausted)
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_outcomes(
            self.outcomes.as_slice(),
            self.board.as_ref().map_or(0, Board::total_cells),
            self.settings.weak_category_count(),
        )
    }

    #[must_use]
    pub fn view(&self, now: Duration) -> Option<ClueView<'_>> {
        let session = self.active.as_ref()?;
        Some(ClueView {
            session: session.id(),
            cell: session.cell(),
            category: session.category(),
            value: session.value(),
            clue: session.clue().clue(),
            phase: session.phase(),
            narration: session.narration_end(),
            countdown: session.countdown_fraction(now),
            remaining: session.countdown_remaining(now),
            response: session.revealed_response(),
        })
    }

    /// Takes the phase changes recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<PhaseChange> {
        std::mem::take(&mut self.changes)
    }

    fn active_mut(&mut self, id: SessionId) -> Option<&mut ClueSession> {
        match &mut self.active {
            Some(session) if session.id() == id => Some(session),
            _ => {
                tracing::debug!(session = %id, "stale session input ignored");
                None
            }
        }
    }

    fn collect_changes(&mut self) {
        if let Some(session) = &mut self.active {
            self.changes.extend(session.drain_changes());
        }
    }

    fn finalize(&mut self, status: OutcomeStatus) -> Option<Outcome> {
        let session = self.active.take()?;
        let outcome = Outcome {
            category: session.category().to_owned(),
            value: session.value(),
            clue: session.clue().clue().to_owned(),
            response: session.clue().response().to_owned(),
            status,
        };
        self.score += status.score_delta(outcome.value);
        self.outcomes.push(outcome.clone());
        tracing::info!(
            session = %session.id(),
            category = %outcome.category,
            value = outcome.value,
            ?status,
            score = self.score,
            "clue finalized"
        );
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashSet, rc::Rc};

    use crate::{
        core::{Round, ValueLadder},
        engine::narration::{Narration, NarrationError, SimulatedNarrator},
    };

    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[derive(Debug)]
    struct RecordingNarrator {
        inner: SimulatedNarrator,
        spoken: Rc<RefCell<Vec<String>>>,
    }

    impl Narrator for RecordingNarrator {
        fn speak(&mut self, text: &str, now: Duration) -> Result<Box<dyn Narration>, NarrationError> {
            self.spoken.borrow_mut().push(text.to_owned());
            self.inner.speak(text, now)
        }
    }

    fn pool(categories: usize) -> Vec<ClueRecord> {
        (0..categories)
            .flat_map(|c| {
                ValueLadder::STANDARD.map(|value| {
                    ClueRecord::new(
                        format!("{c}-{value}"),
                        Round::First,
                        &format!("Category {c}"),
                        value,
                        &format!("Clue for category {c} at {value}"),
                        &format!("Response {c} {value}"),
                    )
                    .unwrap()
                })
            })
            .collect()
    }

    fn game(narration: Duration) -> Game {
        let settings = Settings::default()
            .with_category_count(3)
            .with_buzz_window_secs(5.0)
            .with_blank_delay_ms(1000);
        let narrator = Box::new(SimulatedNarrator::new(narration));
        let mut game = Game::with_seed(settings, narrator, BoardSeed::from_bytes([9; 16]));
        game.start_board(&pool(4), Duration::ZERO).unwrap();
        game
    }

    /// Plays one cell to completion starting at `now`; returns the outcome and
    /// the instant the clue was finalized.
    fn play(game: &mut Game, cell: CellRef, now: Duration, verdict: Verdict) -> (Outcome, Duration) {
        let id = game.open_cell(cell, now).unwrap();
        let mut t = now + ms(500);
        game.advance(t);
        if verdict.is_acknowledge() {
            t += ms(5_000);
        } else {
            assert!(game.buzz(id, t));
            t += ms(1_000);
        }
        game.advance(t);
        let outcome = game.resolve(id, verdict, t).unwrap();
        (outcome, t)
    }

    #[test]
    fn test_full_board_outcome_cardinality_and_score() {
        let mut game = game(ms(400));
        let cells = game.board().unwrap().open_cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), 15);

        let verdicts = [Verdict::Correct, Verdict::Wrong, Verdict::Acknowledge];
        let mut now = Duration::ZERO;
        for (i, cell) in cells.iter().enumerate() {
            (_, now) = play(&mut game, *cell, now, verdicts[i % 3]);
        }

        assert!(game.is_over());
        let outcomes = game.outcomes().as_slice();
        assert_eq!(outcomes.len(), 15);
        let unique = outcomes
            .iter()
            .map(|o| (o.category.clone(), o.value))
            .collect::<HashSet<_>>();
        assert_eq!(unique.len(), 15);

        let expected: i64 = outcomes.iter().map(|o| o.status.score_delta(o.value)).sum();
        assert_eq!(game.score(), expected);
        assert_eq!(game.summary().review.len(), 10);
    }

    #[test]
    fn test_mark_wrong_subtracts_once() {
        let mut game = game(ms(400));
        let cell = CellRef::new(1, 400);
        let (outcome, now) = play(&mut game, cell, Duration::ZERO, Verdict::Wrong);
        assert_eq!(outcome.status, OutcomeStatus::Wrong);
        assert_eq!(game.score(), -400);
        assert_eq!(game.outcomes().len(), 1);

        assert!(matches!(
            game.open_cell(cell, now),
            Err(OpenCellError::AlreadyUsed { .. })
        ));
        assert_eq!(game.score(), -400);
        assert_eq!(game.outcomes().len(), 1);
    }

    #[test]
    fn test_all_correct_leaves_nothing_to_review() {
        let mut game = game(ms(100));
        let cells = game.board().unwrap().open_cells().collect::<Vec<_>>();
        let mut now = Duration::ZERO;
        for cell in cells {
            (_, now) = play(&mut game, cell, now, Verdict::Correct);
        }
        let summary = game.summary();
        assert!(summary.review.is_empty());
        assert_eq!(summary.correct, 15);
        assert_eq!(summary.score, 3 * 3000);
    }

    #[test]
    fn test_stale_session_inputs_are_ignored() {
        let mut game = game(ms(400));
        let first = game.open_cell(CellRef::new(0, 200), Duration::ZERO).unwrap();
        let second = game.open_cell(CellRef::new(0, 400), ms(100)).unwrap();
        assert_ne!(first, second);

        // The first session was abandoned when the second cell opened.
        assert_eq!(game.outcomes().len(), 1);
        assert_eq!(game.outcomes().as_slice()[0].status, OutcomeStatus::Skipped);
        assert!(game.board().unwrap().is_used(CellRef::new(0, 200)));

        game.advance(ms(600));
        assert!(!game.buzz(first, ms(700)));
        assert!(game.abandon(first, ms(700)).is_none());
        assert!(game.buzz(second, ms(700)));
        game.advance(ms(1_700));
        assert!(game.resolve(first, Verdict::Correct, ms(1_800)).is_none());
        assert!(game.resolve(second, Verdict::Correct, ms(1_800)).is_some());
        assert_eq!(game.score(), 400);
    }

    #[test]
    fn test_reopening_active_cell_keeps_session() {
        let mut game = game(ms(400));
        let cell = CellRef::new(2, 600);
        let id = game.open_cell(cell, Duration::ZERO).unwrap();
        assert_eq!(game.open_cell(cell, ms(50)).unwrap(), id);
        assert!(game.outcomes().is_empty());
    }

    #[test]
    fn test_timeline_with_two_second_narration() {
        let mut game = game(ms(2_000));
        let id = game.open_cell(CellRef::new(0, 200), Duration::ZERO).unwrap();
        game.advance(ms(1_999));
        assert_eq!(game.view(ms(1_999)).unwrap().countdown, None);
        assert!(!game.buzz(id, ms(1_999)));

        game.advance(ms(2_000));
        let view = game.view(ms(4_500)).unwrap();
        assert_eq!(view.phase, CluePhase::Countdown);
        assert!((view.countdown.unwrap() - 0.5).abs() < 1e-9);

        game.advance(ms(6_999));
        assert_eq!(game.view(ms(6_999)).unwrap().phase, CluePhase::Countdown);
        game.advance(ms(7_000));
        let view = game.view(ms(7_000)).unwrap();
        assert!(view.phase.is_revealed());
        assert!(view.response.is_some_and(|r| r.starts_with("Response ")));
        assert!(game.resolve(id, Verdict::Correct, ms(7_100)).is_none());
        let outcome = game.resolve(id, Verdict::Acknowledge, ms(7_100)).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Skipped);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_narration_excludes_category_and_value() {
        let spoken = Rc::new(RefCell::new(Vec::new()));
        let narrator = RecordingNarrator {
            inner: SimulatedNarrator::new(ms(100)),
            spoken: Rc::clone(&spoken),
        };
        let settings = Settings::default().with_category_count(3);
        let mut game = Game::with_seed(settings, Box::new(narrator), BoardSeed::from_bytes([1; 16]));
        game.start_board(&pool(3), Duration::ZERO).unwrap();
        let cell = CellRef::new(0, 800);
        game.open_cell(cell, Duration::ZERO).unwrap();

        let board = game.board().unwrap();
        let clue = board.clue(cell).unwrap().clue().to_owned();
        let category = board.categories()[0].name().to_owned();
        assert_eq!(*spoken.borrow(), [clue]);
        assert!(!spoken.borrow()[0].starts_with(&category));
        assert!(!spoken.borrow()[0].contains('$'));
    }

    #[test]
    fn test_failed_build_keeps_previous_board() {
        let mut game = game(ms(400));
        play(&mut game, CellRef::new(0, 200), Duration::ZERO, Verdict::Correct);
        let names = game
            .board()
            .unwrap()
            .categories()
            .iter()
            .map(|c| c.name().to_owned())
            .collect::<Vec<_>>();

        assert!(matches!(game.start_board(&[], Duration::ZERO), Err(BoardBuildError::EmptyDataset)));
        assert!(matches!(
            game.start_board(&pool(2), Duration::ZERO),
            Err(BoardBuildError::InsufficientCategories { .. })
        ));
        let kept = game
            .board()
            .unwrap()
            .categories()
            .iter()
            .map(|c| c.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(kept, names);
        assert_eq!(game.score(), 200);

        game.start_board(&pool(4), ms(9000)).unwrap();
        assert_eq!(game.score(), 0);
        assert!(game.outcomes().is_empty());
    }

    #[test]
    fn test_phase_changes_are_reported() {
        let mut game = game(ms(400));
        let id = game.open_cell(CellRef::new(0, 200), Duration::ZERO).unwrap();
        game.advance(ms(400));
        game.buzz(id, ms(500));
        let phases = game
            .drain_changes()
            .into_iter()
            .map(|change| change.to)
            .collect::<Vec<_>>();
        assert_eq!(
            phases,
            [CluePhase::Narrating, CluePhase::Countdown, CluePhase::BlankDelay]
        );
        assert!(game.drain_changes().is_empty());
    }

    #[test]
    fn test_new_board_abandons_at_caller_instant() {
        let mut game = game(ms(400));
        game.open_cell(CellRef::new(0, 200), Duration::ZERO).unwrap();
        game.advance(ms(400));
        game.drain_changes();

        game.start_board(&pool(4), ms(1200)).unwrap();
        assert!(game.active().is_none());
        assert!(game.outcomes().is_empty());
        let changes = game.drain_changes();
        assert!(!changes.is_empty());
        assert!(changes.iter().all(|change| change.at == ms(1200)));
        assert_eq!(changes.last().map(|change| change.to), Some(CluePhase::Terminal));
    }
}
