use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

/// One key binding shown in a screen's footer.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint<'a> {
    pub keys: &'a [&'a str],
    pub description: &'a str,
    /// Whether the action applies in the current state.
    pub enabled: bool,
}

impl<'a> KeyHint<'a> {
    pub const fn new(keys: &'a [&'a str], description: &'a str) -> Self {
        Self {
            keys,
            description,
            enabled: true,
        }
    }

    #[must_use]
    pub const fn enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

/// Footer line of key hints; disabled hints are dimmed.
#[derive(Debug)]
pub struct KeyHintDisplay<'a> {
    hints: &'a [KeyHint<'a>],
    block: Option<BlockWidget<'a>>,
}

impl<'a> KeyHintDisplay<'a> {
    pub fn new(hints: &'a [KeyHint<'a>]) -> Self {
        Self { hints, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const DISABLED_STYLE: Style = Style::new().fg(Color::DarkGray);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

fn hint_spans<'a>(hints: &[KeyHint<'a>]) -> Vec<Span<'a>> {
    let mut spans = vec![];
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", SEPARATOR_STYLE));
        }
        let (key_style, description_style) = if hint.enabled {
            (KEY_STYLE, DESCRIPTION_STYLE)
        } else {
            (DISABLED_STYLE, DISABLED_STYLE)
        };
        for (j, key) in hint.keys.iter().copied().enumerate() {
            if j > 0 {
                spans.push(Span::styled("/", SEPARATOR_STYLE));
            }
            spans.push(Span::styled(key, key_style));
        }
        spans.push(Span::from(" "));
        spans.push(Span::styled(hint.description, description_style));
    }
    spans
}

impl Widget for KeyHintDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Line::from(hint_spans(self.hints)).centered().render(area, buf);
    }
}
