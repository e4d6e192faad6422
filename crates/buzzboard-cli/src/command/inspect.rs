use std::path::PathBuf;

use buzzboard_engine::{Round, complete_category_names, eligible_count};
use serde::Serialize;

use crate::{
    command::{DatasetArg, SettingsArg},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    settings: SettingsArg,
    /// Write the report here instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    dataset: PathBuf,
    format: String,
    imported: usize,
    discarded: usize,
    eligible_round: Round,
    /// Clues of the eligible round whose value is on the ladder.
    eligible: usize,
    /// Boards need this many complete categories.
    category_count: usize,
    complete_categories: Vec<String>,
    playable: bool,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg {
        dataset,
        settings,
        output,
    } = arg;

    let settings = settings.load()?;
    let report = dataset.import()?;
    let ladder = settings.value_ladder();
    let round = settings.eligible_round();
    let complete_categories = complete_category_names(&report.records, ladder, round);

    let inspect = InspectReport {
        dataset: dataset.dataset.clone(),
        format: report.format.to_string(),
        imported: report.records.len(),
        discarded: report.discarded,
        eligible_round: round,
        eligible: eligible_count(&report.records, ladder, round),
        category_count: settings.category_count(),
        playable: complete_categories.len() >= settings.category_count(),
        complete_categories,
    };
    Output::save_json(&inspect, output.clone())
}
