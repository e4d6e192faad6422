use std::time::Duration;

use buzzboard_engine::{CluePhase, RevealKind, SessionId, Verdict};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Spacing},
    symbols::merge::MergeStrategy,
    widgets::{Block as BlockWidget, Padding},
};

use crate::{
    DEFAULT_FRAME_RATE, DEFAULT_TICK_RATE,
    command::play::{screens::draw_footer, trainer::SharedTrainer},
    tui::{Screen, ScreenTransition, Tui},
    view::widgets::{ClueDisplay, KeyHint},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Buzz,
    Correct,
    Wrong,
    Acknowledge,
    Abandon,
    Quit,
}

impl Action {
    fn from_key_event(event: &KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Char(' ') => Some(Self::Buzz),
            KeyCode::Char('y') => Some(Self::Correct),
            KeyCode::Char('n') => Some(Self::Wrong),
            KeyCode::Enter => Some(Self::Acknowledge),
            KeyCode::Esc => Some(Self::Abandon),
            KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }

    fn hints(phase: CluePhase) -> [KeyHint<'static>; 6] {
        let buzzed = phase == CluePhase::Revealed(RevealKind::Buzzed);
        let timed_out = phase == CluePhase::Revealed(RevealKind::TimedOut);
        [
            KeyHint::new(&["Space"], "Buzz").enabled(phase.is_countdown()),
            KeyHint::new(&["y"], "Correct").enabled(buzzed),
            KeyHint::new(&["n"], "Wrong").enabled(buzzed),
            KeyHint::new(&["Enter"], "Continue").enabled(timed_out),
            KeyHint::new(&["Esc"], "Skip"),
            KeyHint::new(&["q"], "Quit"),
        ]
    }
}

/// One open clue, from narration to the player's verdict.
///
/// Pops back to the board once the clue is finalized.
#[derive(Debug)]
pub(super) struct ClueScreen {
    trainer: SharedTrainer,
    session: SessionId,
}

impl ClueScreen {
    pub(super) fn new(trainer: SharedTrainer, session: SessionId) -> Self {
        Self { trainer, session }
    }

    fn resolve(&self, verdict: Verdict, now: Duration) -> ScreenTransition {
        let outcome = self
            .trainer
            .borrow_mut()
            .game_mut()
            .resolve(self.session, verdict, now);
        if outcome.is_some() {
            ScreenTransition::Pop
        } else {
            ScreenTransition::Stay
        }
    }

    fn abandon(&self, now: Duration) {
        self.trainer
            .borrow_mut()
            .game_mut()
            .abandon(self.session, now);
    }

    fn is_current(&self) -> bool {
        self.trainer.borrow().game().active_id() == Some(self.session)
    }
}

impl Screen for ClueScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(Some(DEFAULT_TICK_RATE));
        tui.set_frame_rate(DEFAULT_FRAME_RATE);
    }

    fn on_inactive(&mut self, _tui: &mut Tui) {}

    fn on_close(&mut self, tui: &mut Tui) {
        // Leaving mid-clue counts as a skip.
        if self.is_current() {
            self.abandon(tui.now());
        }
    }

    fn handle_event(&mut self, tui: &mut Tui, event: &Event) -> ScreenTransition {
        let Some(action) = event
            .as_key_press_event()
            .and_then(|event| Action::from_key_event(&event))
        else {
            return ScreenTransition::Stay;
        };
        let now = tui.now();
        match action {
            Action::Buzz => {
                self.trainer
                    .borrow_mut()
                    .game_mut()
                    .buzz(self.session, now);
                ScreenTransition::Stay
            }
            Action::Correct => self.resolve(Verdict::Correct, now),
            Action::Wrong => self.resolve(Verdict::Wrong, now),
            Action::Acknowledge => self.resolve(Verdict::Acknowledge, now),
            Action::Abandon => {
                self.abandon(now);
                ScreenTransition::Pop
            }
            Action::Quit => ScreenTransition::Exit,
        }
    }

    fn update(&mut self, tui: &mut Tui) -> ScreenTransition {
        let mut trainer = self.trainer.borrow_mut();
        let game = trainer.game_mut();
        game.advance(tui.now());
        for change in game.drain_changes() {
            tracing::debug!(
                session = %change.session,
                from = ?change.from,
                to = ?change.to,
                at_ms = change.at.as_millis(),
                "clue phase changed"
            );
        }
        if game.active_id() == Some(self.session) {
            ScreenTransition::Stay
        } else {
            ScreenTransition::Pop
        }
    }

    fn draw(&self, frame: &mut Frame, now: Duration) {
        let trainer = self.trainer.borrow();
        let Some(view) = trainer.game().view(now) else {
            return;
        };
        let viewport = frame
            .area()
            .centered(Constraint::Max(100), Constraint::Max(30));
        let [clue_area, bottom_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)])
                .spacing(Spacing::Overlap(1))
                .areas(viewport);

        let clue = ClueDisplay::new(&view).block(
            BlockWidget::bordered()
                .padding(Padding::symmetric(2, 1))
                .merge_borders(MergeStrategy::Exact),
        );
        frame.render_widget(clue, clue_area);
        draw_footer(frame, bottom_area, &Action::hints(view.phase), trainer.message());
    }
}
