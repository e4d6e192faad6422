use std::path::PathBuf;

use buzzboard_engine::{ClueRecord, RoundPlan, Summary, next_round_pool};
use serde::Serialize;

use crate::{
    command::DatasetArg,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct NextRoundArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    /// Summary JSON saved by `play --save-summary`
    #[clap(long)]
    summary: PathBuf,
    /// Number of clues in the round
    #[clap(long, default_value_t = RoundPlan::default().length)]
    length: usize,
    /// Share of the round drawn from weak categories (0.0 to 1.0)
    #[clap(long, default_value_t = RoundPlan::default().review_ratio)]
    review_ratio: f64,
    /// Write the round here instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct NextRound {
    weak_categories: Vec<String>,
    plan: RoundPlan,
    clues: Vec<ClueRecord>,
}

pub(crate) fn run(arg: &NextRoundArg) -> anyhow::Result<()> {
    let NextRoundArg {
        dataset,
        summary,
        length,
        review_ratio,
        output,
    } = arg;

    let summary: Summary = util::read_json_file("summary", summary)?;
    let records = dataset.records()?;
    let plan = RoundPlan {
        length: *length,
        review_ratio: *review_ratio,
    };
    let clues = next_round_pool(
        &records,
        &summary.weak_categories,
        &plan,
        &mut rand::rng(),
    );
    tracing::info!(
        clues = clues.len(),
        weak = summary.weak_categories.len(),
        "next round drawn"
    );
    let round = NextRound {
        weak_categories: summary.weak_categories,
        plan,
        clues,
    };
    Output::save_json(&round, output.clone())
}
