//! Trainer logic built on the board data model.
//!
//! - [`BoardBuilder`] - Random board generation under completeness constraints
//! - [`BoardSeed`] - Seed for deterministic board generation
//! - [`ClueSession`] - One clue driven from selection to its outcome
//! - [`NarrationGate`] - Decides when narration is over
//! - [`Game`] - Board, score, outcome log and active clue
//! - [`Summary`] - End-of-board statistics and review feed
//! - [`next_round_pool`] - Weak-biased clue pool for the next round
//!
//! # Clue Flow
//!
//! 1. The player opens a cell with [`Game::open_cell`]
//! 2. The clue text is shown and narrated
//! 3. Once narration is over, the buzz window opens
//! 4. A buzz starts the blank delay; no buzz lets the window expire
//! 5. The response is revealed and the player scores themselves
//!
//! Nothing reads a clock. Time flows in through the `now` argument and
//! [`Game::advance`] must be called on every tick.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use buzzboard_engine::{
//!     CellRef, ClueRecord, Game, Round, Settings, SimulatedNarrator, ValueLadder, Verdict,
//! };
//!
//! let pool = (0..3)
//!     .flat_map(|c| {
//!         ValueLadder::STANDARD.map(|value| {
//!             ClueRecord::new(
//!                 format!("{c}-{value}"),
//!                 Round::First,
//!                 &format!("Category {c}"),
//!                 value,
//!                 "This clue is read aloud",
//!                 "What is the response?",
//!             )
//!             .unwrap()
//!         })
//!     })
//!     .collect::<Vec<_>>();
//!
//! let narrator = Box::new(SimulatedNarrator::new(Duration::from_secs(1)));
//! let mut game = Game::new(Settings::default().with_category_count(3), narrator);
//! game.start_board(&pool, Duration::ZERO).unwrap();
//!
//! let id = game.open_cell(CellRef::new(0, 200), Duration::ZERO).unwrap();
//! game.advance(Duration::from_secs(1));
//! assert!(game.buzz(id, Duration::from_millis(1500)));
//! game.advance(Duration::from_millis(3500));
//! game.resolve(id, Verdict::Correct, Duration::from_millis(3600));
//! assert_eq!(game.score(), 200);
//! ```

pub use self::{
    board_builder::*, clue_session::*, game::*, narration::*, review::*, settings::*,
    summary::*, timer::*,
};

mod board_builder;
mod clue_session;
mod game;
mod narration;
mod review;
mod settings;
mod summary;
mod timer;
