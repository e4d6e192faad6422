use std::time::Duration;

use buzzboard_engine::{Board, CellRef};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, HorizontalAlignment, Layout, Spacing},
    symbols::merge::MergeStrategy,
    text::Line,
    widgets::{Block as BlockWidget, Padding},
};

use crate::{
    DEFAULT_FRAME_RATE,
    command::play::{
        screens::{clue::ClueScreen, draw_footer, results::ResultsScreen},
        trainer::SharedTrainer,
    },
    tui::{Screen, ScreenTransition, Tui},
    view::widgets::{BoardDisplay, KeyHint, signed_dollars},
};

/// How often the board checks whether it is finished.
const BOARD_TICK_RATE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Up,
    Down,
    Left,
    Right,
    Open,
    NewBoard,
    Quit,
}

impl Action {
    fn from_key_event(event: &KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Char('k') | KeyCode::Up => Some(Self::Up),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::Down),
            KeyCode::Char('h') | KeyCode::Left => Some(Self::Left),
            KeyCode::Char('l') | KeyCode::Right => Some(Self::Right),
            KeyCode::Enter => Some(Self::Open),
            KeyCode::Char('N') => Some(Self::NewBoard),
            KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }

    fn hints() -> [KeyHint<'static>; 4] {
        [
            KeyHint::new(&["hjkl", "←↑↓→"], "Move"),
            KeyHint::new(&["Enter"], "Open"),
            KeyHint::new(&["N"], "New board"),
            KeyHint::new(&["q"], "Quit"),
        ]
    }
}

/// Board cursor: a category column and a ladder row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor {
    column: usize,
    row: usize,
}

impl Cursor {
    fn cell(self, board: &Board) -> Option<CellRef> {
        let value = board.ladder().values().get(self.row)?;
        (self.column < board.categories().len()).then(|| CellRef::new(self.column, *value))
    }

    fn step(self, action: Action, board: &Board) -> Self {
        let last_column = board.categories().len().saturating_sub(1);
        let last_row = board.ladder().len().saturating_sub(1);
        match action {
            Action::Up => Self {
                row: self.row.saturating_sub(1),
                ..self
            },
            Action::Down => Self {
                row: (self.row + 1).min(last_row),
                ..self
            },
            Action::Left => Self {
                column: self.column.saturating_sub(1),
                ..self
            },
            Action::Right => Self {
                column: (self.column + 1).min(last_column),
                ..self
            },
            Action::Open | Action::NewBoard | Action::Quit => self,
        }
    }

    /// Moves to the first open cell, row by row, if the current one is played.
    fn settle(self, board: &Board) -> Self {
        if self.cell(board).is_some_and(|cell| !board.is_used(cell)) {
            return self;
        }
        board
            .open_cells()
            .next()
            .and_then(|cell| {
                let row = board.ladder().position(cell.value)?;
                Some(Self {
                    column: cell.category,
                    row,
                })
            })
            .unwrap_or(self)
    }
}

#[derive(Debug)]
pub(in crate::command::play) struct BoardScreen {
    trainer: SharedTrainer,
    cursor: Cursor,
    /// The results screen was already shown for the current board.
    results_shown: bool,
}

impl BoardScreen {
    pub(in crate::command::play) fn new(trainer: SharedTrainer) -> Self {
        Self {
            trainer,
            cursor: Cursor::default(),
            results_shown: false,
        }
    }

    fn open(&mut self, now: Duration) -> ScreenTransition {
        let mut trainer = self.trainer.borrow_mut();
        let Some(cell) = trainer.game().board().and_then(|b| self.cursor.cell(b)) else {
            return ScreenTransition::Stay;
        };
        match trainer.game_mut().open_cell(cell, now) {
            Ok(id) => {
                trainer.clear_message();
                drop(trainer);
                ScreenTransition::Push(Box::new(ClueScreen::new(self.trainer.clone(), id)))
            }
            Err(e) => {
                trainer.set_message(e.to_string());
                ScreenTransition::Stay
            }
        }
    }
}

impl Screen for BoardScreen {
    fn on_active(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(Some(BOARD_TICK_RATE));
        tui.set_frame_rate(DEFAULT_FRAME_RATE);
        let trainer = self.trainer.borrow();
        if !trainer.game().is_over() {
            self.results_shown = false;
        }
        if let Some(board) = trainer.game().board() {
            self.cursor = self.cursor.settle(board);
        }
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
            Action::Up | Action::Down | Action::Left | Action::Right => {
                if let Some(board) = self.trainer.borrow().game().board() {
                    self.cursor = self.cursor.step(action, board);
                }
            }
            Action::Open => return self.open(tui.now()),
            Action::NewBoard => {
                let mut trainer = self.trainer.borrow_mut();
                if trainer.new_board(tui.now()) {
                    self.cursor = Cursor::default();
                    self.results_shown = false;
                }
            }
            Action::Quit => return ScreenTransition::Exit,
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _tui: &mut Tui) -> ScreenTransition {
        if self.results_shown || !self.trainer.borrow().game().is_over() {
            return ScreenTransition::Stay;
        }
        self.results_shown = true;
        self.trainer.borrow_mut().finish_board();
        ScreenTransition::Push(Box::new(ResultsScreen::new(self.trainer.clone())))
    }

    fn draw(&self, frame: &mut Frame, _now: Duration) {
        let trainer = self.trainer.borrow();
        let game = trainer.game();
        let viewport = frame
            .area()
            .centered(Constraint::Max(120), Constraint::Max(40));

        let [top_area, mid_area, bottom_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .spacing(Spacing::Overlap(1))
        .areas(viewport);

        let remaining = game.board().map_or(0, Board::remaining);
        let status = Line::from(format!(
            "Score: {}    Clues left: {remaining}",
            signed_dollars(game.score())
        ))
        .centered();
        let top_block = BlockWidget::bordered()
            .title("Buzzboard")
            .title_alignment(HorizontalAlignment::Center)
            .merge_borders(MergeStrategy::Exact);
        frame.render_widget(status, top_block.inner(top_area));
        frame.render_widget(top_block, top_area);

        let board_block = BlockWidget::bordered()
            .padding(Padding::symmetric(1, 0))
            .merge_borders(MergeStrategy::Exact);
        if let Some(board) = game.board() {
            let mut display = BoardDisplay::new(board).block(board_block);
            if let Some(cell) = self.cursor.cell(board) {
                display = display.cursor(cell);
            }
            frame.render_widget(display, mid_area);
        } else {
            frame.render_widget(board_block, mid_area);
        }

        draw_footer(frame, bottom_area, &Action::hints(), trainer.message());
    }
}

#[cfg(test)]
mod tests {
    use buzzboard_engine::{ClueRecord, Game, Round, Settings, SilentNarrator, ValueLadder};

    use super::*;

    fn board() -> Board {
        let pool = (0..3)
            .flat_map(|c| {
                ValueLadder::STANDARD.map(|value| {
                    ClueRecord::new(
                        format!("{c}-{value}"),
                        Round::First,
                        &format!("Topic {c}"),
                        value,
                        "clue",
                        "response",
                    )
                    .unwrap()
                })
            })
            .collect::<Vec<_>>();
        let mut game = Game::new(
            Settings::default().with_category_count(3),
            Box::new(SilentNarrator),
        );
        game.start_board(&pool, Duration::ZERO).unwrap().clone()
    }

    #[test]
    fn test_cursor_stays_on_the_board() {
        let board = board();
        let mut cursor = Cursor::default();
        cursor = cursor.step(Action::Up, &board).step(Action::Left, &board);
        assert_eq!(cursor, Cursor::default());
        for _ in 0..10 {
            cursor = cursor.step(Action::Right, &board).step(Action::Down, &board);
        }
        assert_eq!(cursor, Cursor { column: 2, row: 4 });
        assert_eq!(cursor.cell(&board), Some(CellRef::new(2, 1000)));
    }

    #[test]
    fn test_key_mapping() {
        let key = |code| KeyEvent::from(code);
        assert_eq!(Action::from_key_event(&key(KeyCode::Char('j'))), Some(Action::Down));
        assert_eq!(Action::from_key_event(&key(KeyCode::Enter)), Some(Action::Open));
        assert_eq!(Action::from_key_event(&key(KeyCode::Char('N'))), Some(Action::NewBoard));
        assert_eq!(Action::from_key_event(&key(KeyCode::Char('n'))), None);
    }
}
