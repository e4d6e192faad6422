use buzzboard_engine::{Board, CellRef};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect, Spacing},
    text::Text,
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget, Wrap},
};

use crate::view::widgets::{dollars, style};

const HEADER_HEIGHT: u16 = 3;

/// The board grid: one column per category, one row per ladder value.
pub struct BoardDisplay<'a> {
    board: &'a Board,
    cursor: Option<CellRef>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            cursor: None,
            block: None,
        }
    }

    pub fn cursor(self, cursor: CellRef) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

/// Text of one cell: its value while open, blank once played.
fn cell_label(board: &Board, cell: CellRef) -> String {
    if board.is_used(cell) {
        String::new()
    } else {
        dollars(cell.value)
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let categories = self.board.categories();
        let columns = Layout::horizontal(categories.iter().map(|_| Constraint::Fill(1)))
            .spacing(Spacing::Space(1))
            .split(area);
        let rows = Layout::vertical(
            std::iter::once(Constraint::Length(HEADER_HEIGHT))
                .chain(self.board.ladder().iter().map(|_| Constraint::Fill(1))),
        )
        .spacing(Spacing::Space(1));

        for (index, (category, column)) in categories.iter().zip(columns.iter()).enumerate() {
            let areas = rows.split(*column);
            let Some((header_area, cell_areas)) = areas.split_first() else {
                continue;
            };

            Paragraph::new(category.name().to_uppercase())
                .style(style::CATEGORY)
                .centered()
                .wrap(Wrap { trim: true })
                .render(*header_area, buf);

            for (value, cell_area) in self.board.ladder().iter().zip(cell_areas) {
                let cell = CellRef::new(index, value);
                let cell_style = if self.cursor == Some(cell) {
                    style::CURSOR
                } else if self.board.is_used(cell) {
                    style::USED
                } else {
                    style::VALUE
                };
                let label_area = cell_area.centered_vertically(Constraint::Length(1));
                buf.set_style(*cell_area, cell_style);
                Text::from(cell_label(self.board, cell))
                    .centered()
                    .style(cell_style)
                    .render(label_area, buf);
            }
        }
    }
}
