use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use buzzboard_engine::{ClueRecord, Game};

use crate::util;

pub(super) type SharedTrainer = Rc<RefCell<Trainer>>;

/// State shared by the play screens.
#[derive(Debug)]
pub(super) struct Trainer {
    game: Game,
    pool: Vec<ClueRecord>,
    summary_dir: Option<PathBuf>,
    boards_played: usize,
    /// Status line shown in the footer.
    message: Option<String>,
}

impl Trainer {
    pub(super) fn new(game: Game, pool: Vec<ClueRecord>, summary_dir: Option<PathBuf>) -> Self {
        Self {
            game,
            pool,
            summary_dir,
            boards_played: 0,
            message: None,
        }
    }

    pub(super) fn game(&self) -> &Game {
        &self.game
    }

    pub(super) fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub(super) fn boards_played(&self) -> usize {
        self.boards_played
    }

    pub(super) fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(super) fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub(super) fn clear_message(&mut self) {
        self.message = None;
    }

    /// Builds a new board from the pool. On failure the current board stays
    /// and the error is shown.
    pub(super) fn new_board(&mut self, now: Duration) -> bool {
        match self.game.start_board(&self.pool, now) {
            Ok(_) => {
                self.message = None;
                true
            }
            Err(e) => {
                tracing::warn!("new board failed: {e}");
                self.message = Some(e.to_string());
                false
            }
        }
    }

    /// Counts the finished board and saves its summary when enabled.
    pub(super) fn finish_board(&mut self) {
        self.boards_played += 1;
        let Some(dir) = &self.summary_dir else {
            return;
        };
        match util::save_summary(&self.game.summary(), dir) {
            Ok(path) => self.message = Some(format!("Summary saved to {}", path.display())),
            Err(e) => {
                tracing::warn!("{e:#}");
                self.message = Some(format!("{e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use buzzboard_engine::{Round, Settings, SilentNarrator};

    use super::*;

    fn record(category: &str, value: u32) -> ClueRecord {
        ClueRecord::new(
            format!("{category}-{value}"),
            Round::First,
            category,
            value,
            "clue",
            "response",
        )
        .unwrap()
    }

    #[test]
    fn test_failed_new_board_keeps_message() {
        let pool = vec![record("Only", 200)];
        let game = Game::new(Settings::default(), Box::new(SilentNarrator));
        let mut trainer = Trainer::new(game, pool, None);
        assert!(!trainer.new_board(Duration::ZERO));
        assert!(trainer.message().unwrap().contains("not enough complete categories"));
        assert!(trainer.game().board().is_none());

        trainer.finish_board();
        assert_eq!(trainer.boards_played(), 1);
    }
}
