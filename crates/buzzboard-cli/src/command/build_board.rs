use std::path::PathBuf;

use buzzboard_engine::{Board, BoardBuilder, BoardSeed};
use rand::Rng as _;
use serde::Serialize;

use crate::{
    command::{DatasetArg, SettingsArg},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BuildBoardArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    pub(super) settings: SettingsArg,
    /// Board seed as 32 hex digits; random when omitted
    #[clap(long)]
    seed: Option<BoardSeed>,
    /// Write the board here instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BuiltBoard {
    seed: BoardSeed,
    board: Board,
}

pub(crate) fn run(arg: &BuildBoardArg) -> anyhow::Result<()> {
    let BuildBoardArg {
        dataset,
        settings,
        seed,
        output,
    } = arg;

    let settings = settings.load()?;
    let records = dataset.records()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let board = BoardBuilder::with_seed(seed)
        .eligible_round(settings.eligible_round())
        .build(
            &records,
            settings.category_count(),
            settings.value_ladder(),
        )?;
    Output::save_json(&BuiltBoard { seed, board }, output.clone())
}
