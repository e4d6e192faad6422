use buzzboard_engine::{OutcomeStatus, ReviewCard};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget, Wrap},
};

use crate::view::widgets::{dollars, style};

/// The review feed: missed and skipped clues with their responses.
pub struct ReviewDisplay<'a> {
    cards: &'a [ReviewCard],
    scroll: u16,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ReviewDisplay<'a> {
    pub fn new(cards: &'a [ReviewCard]) -> Self {
        Self {
            cards,
            scroll: 0,
            block: None,
        }
    }

    pub fn scroll(self, scroll: u16) -> Self {
        Self { scroll, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

const RETRIEVAL_HINT: &str = "Turn the clue into a one-line definition, then retrieve the proper noun. \
    If you hesitated, drill 5 fast prompts starting from the response.";
const DRILL: &str = "Say the response first, then justify it in one sentence. Repeat 3 times.";

fn card_lines(card: &ReviewCard) -> [Line<'_>; 6] {
    let label_style = match card.status {
        OutcomeStatus::Wrong => style::WRONG,
        OutcomeStatus::Correct | OutcomeStatus::Skipped => style::DIM,
    };
    [
        Line::from(vec![
            Span::styled(format!("[{}] ", card.label), label_style),
            Span::styled(format!("{} {}", card.category, dollars(card.value)), style::DEFAULT),
        ]),
        Line::styled(format!("  {}", card.clue), style::DEFAULT),
        Line::from(vec![
            Span::styled("  -> ", style::DIM),
            Span::styled(card.response.as_str(), style::CORRECT),
            Span::styled(format!("  (search: {})", card.search_query), style::DIM),
        ]),
        Line::from(vec![
            Span::styled("  Anchor: ", style::DIM),
            Span::styled(format!("{}. {RETRIEVAL_HINT}", card.anchor), style::DEFAULT),
        ]),
        Line::from(vec![
            Span::styled("  Drill: ", style::DIM),
            Span::styled(DRILL, style::DEFAULT),
        ]),
        Line::default(),
    ]
}

impl Widget for ReviewDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let text = if self.cards.is_empty() {
            Text::styled("Nothing to review. Clean board!", style::CORRECT)
        } else {
            Text::from_iter(self.cards.iter().flat_map(card_lines))
        };
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use buzzboard_engine::{Outcome, Summary};

    use super::*;

    fn rendered(cards: &[ReviewCard]) -> String {
        let area = Rect::new(0, 0, 200, 12);
        let mut buf = Buffer::empty(area);
        ReviewDisplay::new(cards).render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_card_shows_anchor_and_drill() {
        let outcomes = [Outcome {
            category: "Rivers".to_owned(),
            value: 400,
            clue: "Flows through Cairo".to_owned(),
            response: "What is the Nile?".to_owned(),
            status: OutcomeStatus::Wrong,
        }];
        let summary = Summary::from_outcomes(&outcomes, 20, 4);
        let text = rendered(&summary.review);
        assert!(text.contains("[MISSED] Rivers $400"));
        assert!(text.contains("Anchor: the Nile. Turn the clue"));
        assert!(text.contains("Drill: Say the response first"));
    }

    #[test]
    fn test_empty_feed() {
        assert!(rendered(&[]).contains("Nothing to review"));
    }
}
