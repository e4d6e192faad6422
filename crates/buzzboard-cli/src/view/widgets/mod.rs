use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, clue_display::*, key_hint_display::*, review_display::*,
    summary_display::*,
};

mod board_display;
mod clue_display;
mod key_hint_display;
mod review_display;
mod summary_display;

mod color {
    use ratatui::style::Color;

    pub const BOARD_BLUE: Color = Color::Rgb(6, 12, 160);
    pub const VALUE_GOLD: Color = Color::Rgb(255, 204, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GRAY: Color = Color::Rgb(110, 110, 110);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 200, 80);
    pub const RED: Color = Color::Rgb(230, 40, 40);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = Style::new().fg(color::WHITE);
    pub const CATEGORY: Style = fg_bg(color::WHITE, color::BOARD_BLUE).add_modifier(Modifier::BOLD);
    pub const VALUE: Style = fg_bg(color::VALUE_GOLD, color::BOARD_BLUE).add_modifier(Modifier::BOLD);
    pub const USED: Style = fg_bg(color::GRAY, color::BOARD_BLUE);
    pub const CURSOR: Style = fg_bg(color::BOARD_BLUE, color::VALUE_GOLD).add_modifier(Modifier::BOLD);
    pub const CLUE: Style = fg_bg(color::WHITE, color::BOARD_BLUE).add_modifier(Modifier::BOLD);
    pub const DIM: Style = Style::new().fg(color::GRAY);
    pub const CORRECT: Style = Style::new().fg(color::GREEN);
    pub const WRONG: Style = Style::new().fg(color::RED);
    pub const COUNTDOWN: Style = fg_bg(color::VALUE_GOLD, color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

/// Formats a clue value the way the board shows it.
#[must_use]
pub fn dollars(value: u32) -> String {
    format!("${value}")
}

/// Formats a score, keeping the sign in front of the dollar sign.
#[must_use]
pub fn signed_dollars(score: i64) -> String {
    if score < 0 {
        format!("-${}", score.unsigned_abs())
    } else {
        format!("${score}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(dollars(400), "$400");
        assert_eq!(signed_dollars(1200), "$1200");
        assert_eq!(signed_dollars(-400), "-$400");
        assert_eq!(signed_dollars(0), "$0");
    }
}
