pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InvalidClueError {
    #[display("clue {id:?} has empty clue text")]
    EmptyClue { id: String },
    #[display("clue {id:?} has empty response text")]
    EmptyResponse { id: String },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InvalidLadderError {
    #[display("value ladder is empty")]
    Empty,
    #[display("value ladder contains a zero value")]
    ZeroValue,
    #[display("value ladder is not strictly increasing")]
    NotIncreasing,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BoardBuildError {
    #[display("no clues available; import a dataset first")]
    EmptyDataset,
    #[display(
        "not enough complete categories for a {requested}-category board (found {found})"
    )]
    InsufficientCategories { requested: usize, found: usize },
    #[display("category {category} has no clue for value {value}")]
    IncompleteCategory { category: String, value: u32 },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum OpenCellError {
    #[display("no cell at category {category} with value {value}")]
    NoSuchCell { category: usize, value: u32 },
    #[display("cell at category {category} with value {value} was already played")]
    AlreadyUsed { category: usize, value: u32 },
}
