use buzzboard_engine::{ClueView, CluePhase, RevealKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, LineGauge, Paragraph, Widget, Wrap},
};

use crate::view::widgets::{dollars, style};

/// The open clue: its text, the buzz-window countdown and the response once
/// revealed.
pub struct ClueDisplay<'a> {
    view: &'a ClueView<'a>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ClueDisplay<'a> {
    pub fn new(view: &'a ClueView<'a>) -> Self {
        Self { view, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

/// Status line under the clue.
pub fn phase_label(view: &ClueView<'_>) -> String {
    match view.phase {
        CluePhase::Init | CluePhase::Narrating => "Reading the clue...".to_owned(),
        CluePhase::Countdown => {
            let remaining = view.remaining.unwrap_or_default().as_secs_f64();
            format!("Buzz in! {remaining:.1}s")
        }
        CluePhase::BlankDelay => "Buzzed. Say your response...".to_owned(),
        CluePhase::Expired | CluePhase::Revealed(RevealKind::TimedOut) => "Time's up".to_owned(),
        CluePhase::Revealed(RevealKind::Buzzed) => "Were you right?".to_owned(),
        CluePhase::Abandoned | CluePhase::Terminal => String::new(),
    }
}

impl Widget for ClueDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        buf.set_style(area, style::CLUE);

        let [header_area, clue_area, status_area, gauge_area, response_area] =
            Layout::vertical([
                Constraint::Length(2),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .areas(area);

        if self.view.phase.is_blank_delay() {
            Line::styled(phase_label(self.view), style::CLUE)
                .centered()
                .render(status_area, buf);
            return;
        }

        let header = format!(
            "{} for {}",
            self.view.category.to_uppercase(),
            dollars(self.view.value)
        );
        Line::styled(header, style::VALUE)
            .centered()
            .render(header_area, buf);

        let clue_text_area = clue_area.centered_vertically(Constraint::Percentage(60));
        Paragraph::new(self.view.clue.to_uppercase())
            .style(style::CLUE)
            .centered()
            .wrap(Wrap { trim: true })
            .render(clue_text_area, buf);

        Line::styled(phase_label(self.view), style::CLUE)
            .centered()
            .render(status_area, buf);

        if let Some(fraction) = self.view.countdown {
            LineGauge::default()
                .ratio((1.0 - fraction).clamp(0.0, 1.0))
                .filled_style(style::COUNTDOWN)
                .unfilled_style(style::DIM)
                .label("")
                .render(gauge_area, buf);
        }

        if let Some(response) = self.view.response {
            Paragraph::new(response)
                .style(style::VALUE)
                .centered()
                .wrap(Wrap { trim: true })
                .render(response_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use buzzboard_engine::{
        CellRef, ClueRecord, Game, Round, Settings, SimulatedNarrator, ValueLadder,
    };

    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn game() -> Game {
        let pool = (0..3)
            .flat_map(|c| {
                ValueLadder::STANDARD.map(|value| {
                    ClueRecord::new(
                        format!("{c}-{value}"),
                        Round::First,
                        &format!("Topic {c}"),
                        value,
                        "This state is home to Mount Rainier",
                        "What is Washington?",
                    )
                    .unwrap()
                })
            })
            .collect::<Vec<_>>();
        let settings = Settings::default()
            .with_category_count(3)
            .with_buzz_window_secs(5.0)
            .with_blank_delay_ms(1000);
        let mut game = Game::new(settings, Box::new(SimulatedNarrator::new(ms(2000))));
        game.start_board(&pool, Duration::ZERO).unwrap();
        game
    }

    #[test]
    fn test_labels_follow_the_clue() {
        let mut game = game();
        let id = game.open_cell(CellRef::new(0, 400), ms(0)).unwrap();
        assert_eq!(phase_label(&game.view(ms(0)).unwrap()), "Reading the clue...");

        game.advance(ms(2000));
        assert_eq!(phase_label(&game.view(ms(3500)).unwrap()), "Buzz in! 3.5s");

        assert!(game.buzz(id, ms(3500)));
        assert_eq!(
            phase_label(&game.view(ms(3500)).unwrap()),
            "Buzzed. Say your response..."
        );

        game.advance(ms(4500));
        let view = game.view(ms(4500)).unwrap();
        assert_eq!(phase_label(&view), "Were you right?");
        assert_eq!(view.response, Some("What is Washington?"));
    }

    #[test]
    fn test_renders_clue_and_response() {
        let mut game = game();
        game.open_cell(CellRef::new(0, 400), ms(0)).unwrap();
        game.advance(ms(2000));
        game.advance(ms(7000));
        let view = game.view(ms(7000)).unwrap();
        assert_eq!(phase_label(&view), "Time's up");

        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        ClueDisplay::new(&view).render(area, &mut buf);
        let text = buf
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(text.contains("MOUNT RAINIER"));
        assert!(text.contains("What is Washington?"));
        assert!(text.contains("for $400"));
    }

    #[test]
    fn test_blank_delay_hides_the_clue() {
        let mut game = game();
        let id = game.open_cell(CellRef::new(0, 400), ms(0)).unwrap();
        game.advance(ms(2000));
        assert!(game.buzz(id, ms(2500)));
        game.advance(ms(2600));
        let view = game.view(ms(2600)).unwrap();
        assert_eq!(view.phase, CluePhase::BlankDelay);

        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        ClueDisplay::new(&view).render(area, &mut buf);
        let text = buf
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(!text.contains("MOUNT RAINIER"));
        assert!(!text.contains("$400"));
        assert!(text.contains("Buzzed. Say your response..."));
    }
}
