use std::{fmt, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::{App, Tui};

/// One screen of the trainer (board, clue, results, ...).
///
/// # Lifecycle
///
/// 1. **[`on_active`]** - the screen comes to the foreground
/// 2. **Active** - the screen handles events, updates and draws
/// 3. **[`on_inactive`]** - the screen goes to the background or is being removed
/// 4. **[`on_close`]** - the screen is removed from the stack (Pop/Replace/Exit only)
///
/// Screens configure the [`Tui`] tick and frame rates in [`on_active`].
///
/// [`on_active`]: Self::on_active
/// [`on_inactive`]: Self::on_inactive
/// [`on_close`]: Self::on_close
pub trait Screen: fmt::Debug {
    fn on_active(&mut self, tui: &mut Tui);

    fn on_inactive(&mut self, tui: &mut Tui);

    /// Called once when the screen leaves the stack for good.
    fn on_close(&mut self, tui: &mut Tui);

    fn handle_event(&mut self, tui: &mut Tui, event: &Event) -> ScreenTransition;

    /// Advances time-dependent state; returns a transition when the screen
    /// should hand over on its own (e.g. the clue reached its end).
    fn update(&mut self, tui: &mut Tui) -> ScreenTransition;

    fn draw(&self, frame: &mut Frame, now: Duration);
}

/// What the stack does after an event or update.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Put a screen on top; the current one goes to the background.
    Push(Box<dyn Screen>),
    /// Remove the current screen and reactivate the previous one.
    Pop,
    /// Swap the current screen for a new one.
    Replace(Box<dyn Screen>),
    Exit,
}

#[derive(Debug)]
pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
    should_exit: bool,
}

impl ScreenStack {
    pub fn new(initial: Box<dyn Screen>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    fn apply_transition(&mut self, tui: &mut Tui, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut new_screen) => {
                if let Some(current) = self.screens.last_mut() {
                    current.on_inactive(tui);
                }
                new_screen.on_active(tui);
                self.screens.push(new_screen);
            }
            ScreenTransition::Pop => {
                if let Some(mut old_screen) = self.screens.pop() {
                    old_screen.on_inactive(tui);
                    old_screen.on_close(tui);
                }
                if let Some(prev_screen) = self.screens.last_mut() {
                    prev_screen.on_active(tui);
                }
            }
            ScreenTransition::Replace(mut new_screen) => {
                if let Some(mut old_screen) = self.screens.pop() {
                    old_screen.on_inactive(tui);
                    old_screen.on_close(tui);
                }
                new_screen.on_active(tui);
                self.screens.push(new_screen);
            }
            ScreenTransition::Exit => {
                while let Some(mut screen) = self.screens.pop() {
                    screen.on_inactive(tui);
                    screen.on_close(tui);
                }
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack {
    fn init(&mut self, tui: &mut Tui) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(tui);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.handle_event(tui, &event);
            self.apply_transition(tui, transition);
        }
    }

    fn draw(&self, frame: &mut Frame, now: Duration) {
        if let Some(current) = self.screens.last() {
            current.draw(frame, now);
        }
    }

    fn update(&mut self, tui: &mut Tui) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.update(tui);
            self.apply_transition(tui, transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    #[derive(Debug, Clone, Default)]
    struct LifecycleLog {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl LifecycleLog {
        fn log(&self, msg: impl Into<String>) {
            self.calls.borrow_mut().push(msg.into());
        }

        fn take(&self) -> Vec<String> {
            self.calls.borrow_mut().drain(..).collect()
        }
    }

    #[derive(Debug)]
    struct TestScreen {
        name: &'static str,
        log: LifecycleLog,
        on_event: Option<ScreenTransition>,
        on_update: Option<ScreenTransition>,
    }

    impl TestScreen {
        fn new(name: &'static str, log: &LifecycleLog) -> Self {
            Self {
                name,
                log: log.clone(),
                on_event: None,
                on_update: None,
            }
        }

        fn on_event(mut self, transition: ScreenTransition) -> Self {
            self.on_event = Some(transition);
            self
        }

        fn on_update(mut self, transition: ScreenTransition) -> Self {
            self.on_update = Some(transition);
            self
        }
    }

    impl Screen for TestScreen {
        fn on_active(&mut self, _tui: &mut Tui) {
            self.log.log(format!("{}: on_active", self.name));
        }

        fn on_inactive(&mut self, _tui: &mut Tui) {
            self.log.log(format!("{}: on_inactive", self.name));
        }

        fn on_close(&mut self, _tui: &mut Tui) {
            self.log.log(format!("{}: on_close", self.name));
        }

        fn handle_event(&mut self, _tui: &mut Tui, _event: &Event) -> ScreenTransition {
            self.log.log(format!("{}: handle_event", self.name));
            self.on_event.take().unwrap_or(ScreenTransition::Stay)
        }

        fn update(&mut self, _tui: &mut Tui) -> ScreenTransition {
            self.log.log(format!("{}: update", self.name));
            self.on_update.take().unwrap_or(ScreenTransition::Stay)
        }

        fn draw(&self, _frame: &mut Frame, _now: Duration) {}
    }

    fn key() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE))
    }

    #[test]
    fn test_push_then_pop_from_event() {
        let log = LifecycleLog::default();
        let clue = TestScreen::new("clue", &log).on_event(ScreenTransition::Pop);
        let board = TestScreen::new("board", &log).on_event(ScreenTransition::Push(Box::new(clue)));
        let mut stack = ScreenStack::new(Box::new(board));
        let mut tui = Tui::new();

        stack.init(&mut tui);
        stack.handle_event(&mut tui, key());
        assert_eq!(
            log.take(),
            [
                "board: on_active",
                "board: handle_event",
                "board: on_inactive",
                "clue: on_active",
            ]
        );

        stack.handle_event(&mut tui, key());
        assert_eq!(
            log.take(),
            [
                "clue: handle_event",
                "clue: on_inactive",
                "clue: on_close",
                "board: on_active",
            ]
        );
        assert!(!stack.should_exit());
    }

    #[test]
    fn test_update_can_replace_screen() {
        let log = LifecycleLog::default();
        let results = TestScreen::new("results", &log);
        let board =
            TestScreen::new("board", &log).on_update(ScreenTransition::Replace(Box::new(results)));
        let mut stack = ScreenStack::new(Box::new(board));
        let mut tui = Tui::new();

        stack.init(&mut tui);
        log.take();
        stack.update(&mut tui);
        assert_eq!(
            log.take(),
            [
                "board: update",
                "board: on_inactive",
                "board: on_close",
                "results: on_active",
            ]
        );
        stack.update(&mut tui);
        assert_eq!(log.take(), ["results: update"]);
    }

    #[test]
    fn test_exit_closes_every_screen() {
        let log = LifecycleLog::default();
        let clue = TestScreen::new("clue", &log).on_event(ScreenTransition::Exit);
        let board = TestScreen::new("board", &log);
        let mut stack = ScreenStack::new(Box::new(board));
        let mut tui = Tui::new();

        stack.init(&mut tui);
        stack.apply_transition(&mut tui, ScreenTransition::Push(Box::new(clue)));
        log.take();
        stack.handle_event(&mut tui, key());
        assert_eq!(
            log.take(),
            [
                "clue: handle_event",
                "clue: on_inactive",
                "clue: on_close",
                "board: on_inactive",
                "board: on_close",
            ]
        );
        assert!(stack.should_exit());
    }

    #[test]
    fn test_popping_last_screen_exits() {
        let log = LifecycleLog::default();
        let board = TestScreen::new("board", &log).on_event(ScreenTransition::Pop);
        let mut stack = ScreenStack::new(Box::new(board));
        let mut tui = Tui::new();

        stack.init(&mut tui);
        assert!(!stack.should_exit());
        stack.handle_event(&mut tui, key());
        assert!(stack.should_exit());
    }

    #[test]
    fn test_stay_is_silent() {
        let log = LifecycleLog::default();
        let mut stack = ScreenStack::new(Box::new(TestScreen::new("board", &log)));
        let mut tui = Tui::new();

        stack.init(&mut tui);
        log.take();
        stack.apply_transition(&mut tui, ScreenTransition::Stay);
        assert!(log.take().is_empty());
    }
}
