use std::time::Duration;

use buzzboard_engine::Summary;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, HorizontalAlignment, Layout, Spacing},
    symbols::merge::MergeStrategy,
    widgets::{Block as BlockWidget, Padding},
};

use crate::{
    DEFAULT_FRAME_RATE,
    command::play::{screens::draw_footer, trainer::SharedTrainer},
    tui::{Screen, ScreenTransition, Tui},
    view::widgets::{KeyHint, ReviewDisplay, SummaryDisplay},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    ScrollUp,
    ScrollDown,
    NewBoard,
    Back,
    Quit,
}

impl Action {
    fn from_key_event(event: &KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Char('k') | KeyCode::Up => Some(Self::ScrollUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::ScrollDown),
            KeyCode::Char('N') => Some(Self::NewBoard),
            KeyCode::Esc => Some(Self::Back),
            KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }

    fn hints() -> [KeyHint<'static>; 4] {
        [
            KeyHint::new(&["k", "j"], "Scroll"),
            KeyHint::new(&["N"], "New board"),
            KeyHint::new(&["Esc"], "Board"),
            KeyHint::new(&["q"], "Quit"),
        ]
    }
}

/// End-of-board summary and review feed.
#[derive(Debug)]
pub(super) struct ResultsScreen {
    trainer: SharedTrainer,
    /// Taken when the screen opens; the game moves on after a new board.
    summary: Summary,
    scroll: u16,
}

impl ResultsScreen {
    pub(super) fn new(trainer: SharedTrainer) -> Self {
        let summary = trainer.borrow().game().summary();
        Self {
            trainer,
            summary,
            scroll: 0,
        }
    }
}

impl Screen for ResultsScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(None);
        tui.set_frame_rate(DEFAULT_FRAME_RATE);
    }

    fn on_inactive(&mut self, _tui: &mut Tui) {}

    fn on_close(&mut self, _tui: &mut Tui) {}

    fn handle_event(&mut self, tui: &mut Tui, event: &Event) -> ScreenTransition {
        let Some(action) = event
            .as_key_press_event()
            .and_then(|event| Action::from_key_event(&event))
        else {
            return ScreenTransition::Stay;
        };
        match action {
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            Action::NewBoard => {
                if self.trainer.borrow_mut().new_board(tui.now()) {
                    return ScreenTransition::Pop;
                }
            }
            Action::Back => return ScreenTransition::Pop,
            Action::Quit => return ScreenTransition::Exit,
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _tui: &mut Tui) -> ScreenTransition {
        ScreenTransition::Stay
    }

    fn draw(&self, frame: &mut Frame, _now: Duration) {
        let trainer = self.trainer.borrow();
        let viewport = frame
            .area()
            .centered(Constraint::Max(100), Constraint::Max(40));

        let stats = SummaryDisplay::new(&self.summary).block(
            BlockWidget::bordered()
                .title("Board complete")
                .title_alignment(HorizontalAlignment::Center)
                .padding(Padding::symmetric(2, 0))
                .merge_borders(MergeStrategy::Exact),
        );
        let [top_area, mid_area, bottom_area] = Layout::vertical([
            Constraint::Length(stats.height()),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .spacing(Spacing::Overlap(1))
        .areas(viewport);

        let review = ReviewDisplay::new(&self.summary.review)
            .scroll(self.scroll)
            .block(
                BlockWidget::bordered()
                    .title(format!("Review ({})", self.summary.review.len()))
                    .padding(Padding::symmetric(1, 0))
                    .merge_borders(MergeStrategy::Exact),
            );

        frame.render_widget(stats, top_area);
        frame.render_widget(review, mid_area);
        draw_footer(frame, bottom_area, &Action::hints(), trainer.message());
    }
}
