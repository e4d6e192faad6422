use std::iter;

use buzzboard_engine::Summary;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{signed_dollars, style};

/// Score and counts of a finished board.
pub struct SummaryDisplay<'a> {
    summary: &'a Summary,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SummaryDisplay<'a> {
    pub fn new(summary: &'a Summary) -> Self {
        Self {
            summary,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    LabelValue(&'static str, &'static dyn Fn(&Summary) -> String),
}

const ROWS: &[Row] = &[
    Row::LabelValue("SCORE:", &|summary| signed_dollars(summary.score)),
    Row::Empty,
    Row::LabelValue("CLUES:", &|summary| {
        format!(
            "{}/{}",
            summary.correct + summary.wrong + summary.skipped,
            summary.total_cells
        )
    }),
    Row::LabelValue("BUZZED:", &|summary| summary.buzzed.to_string()),
    Row::LabelValue("CORRECT:", &|summary| summary.correct.to_string()),
    Row::LabelValue("WRONG:", &|summary| summary.wrong.to_string()),
    Row::LabelValue("SKIPPED:", &|summary| summary.skipped.to_string()),
    Row::LabelValue("ACCURACY:", &|summary| {
        format!("{:.0}%", summary.accuracy * 100.0)
    }),
    Row::Empty,
    Row::LabelValue("WEAK:", &|summary| {
        let weak = summary
            .weak_stats()
            .map(|stat| format!("{} {}/{}", stat.category, stat.correct, stat.total()))
            .collect::<Vec<_>>();
        if weak.is_empty() {
            "-".to_owned()
        } else {
            weak.join(", ")
        }
    }),
];

impl Widget for SummaryDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Length(10),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style::DEFAULT)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.summary), style::DEFAULT)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use buzzboard_engine::{Outcome, OutcomeStatus};

    use super::*;

    fn outcome(category: &str, value: u32, status: OutcomeStatus) -> Outcome {
        Outcome {
            category: category.to_owned(),
            value,
            clue: "clue".to_owned(),
            response: "response".to_owned(),
            status,
        }
    }

    #[test]
    fn test_weak_row_lists_counts() {
        use OutcomeStatus::{Correct, Skipped, Wrong};

        let outcomes = [
            outcome("Rivers", 200, Wrong),
            outcome("Rivers", 400, Correct),
            outcome("Rivers", 600, Skipped),
            outcome("Poets", 200, Correct),
            outcome("Poets", 400, Correct),
        ];
        let summary = Summary::from_outcomes(&outcomes, 20, 4);
        let display = SummaryDisplay::new(&summary);
        let area = Rect::new(0, 0, 60, display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        let text = buf
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(text.contains("Rivers 1/3, Poets 2/2"));
        assert!(text.contains("$800"));
    }
}
