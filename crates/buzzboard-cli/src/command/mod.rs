use std::path::PathBuf;

use anyhow::Context as _;
use buzzboard_engine::{ClueRecord, Round, Settings, SettingsFile};
use buzzboard_import::{DatasetFormat, ImportReport};
use clap::{Parser, Subcommand};

use crate::{logging, util};

use self::{
    build_board::BuildBoardArg, inspect::InspectArg, next_round::NextRoundArg, play::PlayArg,
};

mod build_board;
mod inspect;
mod next_round;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play boards interactively in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Report what a dataset contains
    Inspect(#[clap(flatten)] InspectArg),
    /// Generate one board and print it as JSON
    BuildBoard(#[clap(flatten)] BuildBoardArg),
    /// Draw the next round's clues, biased toward a summary's weak categories
    NextRound(#[clap(flatten)] NextRoundArg),
}

/// Where clues come from.
#[derive(Default, Debug, Clone, clap::Args)]
struct DatasetArg {
    /// Clue dataset (CSV, Jeopardy archive TSV or JSON)
    #[clap(long)]
    dataset: PathBuf,
    /// Dataset format; detected from the extension and content when omitted
    #[clap(long)]
    format: Option<DatasetFormat>,
}

impl DatasetArg {
    fn import(&self) -> anyhow::Result<ImportReport> {
        let path = &self.dataset;
        let report = match self.format {
            Some(format) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
                buzzboard_import::import_str(&text, format)
            }
            None => buzzboard_import::import_path(path),
        };
        report.with_context(|| format!("Failed to import dataset: {}", path.display()))
    }

    fn records(&self) -> anyhow::Result<Vec<ClueRecord>> {
        Ok(self.import()?.records)
    }
}

/// Trainer settings; flags override the settings file.
#[derive(Default, Debug, Clone, clap::Args)]
struct SettingsArg {
    /// JSON settings file
    #[clap(long)]
    settings: Option<PathBuf>,
    /// Categories per board (3 to 6)
    #[clap(long)]
    categories: Option<i64>,
    /// Buzz window in seconds (1 to 15)
    #[clap(long)]
    buzz_window: Option<f64>,
    /// Delay between buzz and reveal in milliseconds (250 to 5000)
    #[clap(long)]
    blank_delay: Option<i64>,
    /// Round whose clues are eligible for boards
    #[clap(long)]
    round: Option<Round>,
}

impl SettingsArg {
    fn load(&self) -> anyhow::Result<Settings> {
        let mut file = match &self.settings {
            Some(path) => util::read_json_file::<SettingsFile, _>("settings", path)?,
            None => SettingsFile::default(),
        };
        file.category_count = self.categories.or(file.category_count);
        file.buzz_window_seconds = self.buzz_window.or(file.buzz_window_seconds);
        file.blank_delay_ms = self.blank_delay.or(file.blank_delay_ms);
        file.eligible_round = self.round.or(file.eligible_round);
        let settings = Settings::from(file);
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Inspect(arg) => {
            logging::init_stderr()?;
            inspect::run(&arg)?;
        }
        Mode::BuildBoard(arg) => {
            logging::init_stderr()?;
            build_board::run(&arg)?;
        }
        Mode::NextRound(arg) => {
            logging::init_stderr()?;
            next_round::run(&arg)?;
        }
    }
    Ok(())
}
