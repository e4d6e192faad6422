pub(super) use self::board::BoardScreen;

mod board;
mod clue;
mod results;

use ratatui::{
    Frame,
    layout::Rect,
    symbols::merge::MergeStrategy,
    widgets::{Block as BlockWidget, Padding},
};

use crate::view::widgets::{KeyHint, KeyHintDisplay};

/// Renders the footer shared by the play screens: key hints, with the
/// trainer's status message as the title.
fn draw_footer(frame: &mut Frame, area: Rect, hints: &[KeyHint<'_>], message: Option<&str>) {
    let mut block = BlockWidget::bordered()
        .padding(Padding::horizontal(1))
        .merge_borders(MergeStrategy::Exact);
    if let Some(message) = message {
        block = block.title(message.to_owned());
    }
    frame.render_widget(KeyHintDisplay::new(hints).block(block), area);
}
