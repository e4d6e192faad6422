//! Board data model: clue records, value ladders, boards and outcomes.

pub use self::{board::*, ladder::*, outcome::*, record::*};

pub(crate) mod board;
pub(crate) mod ladder;
pub(crate) mod outcome;
pub(crate) mod record;
