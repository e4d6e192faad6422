use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use buzzboard_engine::{BoardSeed, Game, Narrator, SilentNarrator};

use crate::{
    command::{DatasetArg, SettingsArg},
    logging,
    narration::CommandNarrator,
    tui::{ScreenStack, Tui},
    view::widgets::signed_dollars,
};

use self::{screens::BoardScreen, trainer::Trainer};

mod screens;
mod trainer;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(super) dataset: DatasetArg,
    #[clap(flatten)]
    pub(super) settings: SettingsArg,
    /// Board seed as 32 hex digits; random when omitted
    #[clap(long)]
    seed: Option<BoardSeed>,
    /// Program that speaks the clue text passed as its last argument
    #[clap(long, default_value = "espeak")]
    tts_command: String,
    /// Extra argument for the speech program (repeatable)
    #[clap(long = "tts-arg", allow_hyphen_values = true)]
    tts_args: Vec<String>,
    /// Do not speak clues; the buzz window opens as soon as a clue is shown
    #[clap(long)]
    no_tts: bool,
    /// Log file (the terminal is taken by the UI)
    #[clap(long, default_value = "./buzzboard.log")]
    log_file: PathBuf,
    /// Save the summary of each finished board
    #[clap(long)]
    save_summary: bool,
    /// Directory to save summary files
    #[clap(long, default_value = "./data/summaries/")]
    summary_dir: PathBuf,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        dataset,
        settings,
        seed,
        tts_command,
        tts_args,
        no_tts,
        log_file,
        save_summary,
        summary_dir,
    } = arg;

    logging::init_file(log_file)?;
    let settings = settings.load()?;
    let pool = dataset.records()?;

    let narrator: Box<dyn Narrator> = if *no_tts {
        Box::new(SilentNarrator)
    } else {
        Box::new(CommandNarrator::new(tts_command.clone(), tts_args.clone()))
    };
    let mut game = match seed {
        Some(seed) => Game::with_seed(settings, narrator, *seed),
        None => Game::new(settings, narrator),
    };
    game.start_board(&pool, Duration::ZERO)?;

    let trainer = Rc::new(RefCell::new(Trainer::new(
        game,
        pool,
        save_summary.then(|| summary_dir.clone()),
    )));
    let mut app = ScreenStack::new(Box::new(BoardScreen::new(Rc::clone(&trainer))));
    Tui::new().run(&mut app)?;

    let trainer = trainer.borrow();
    println!(
        "Boards played: {}, final score: {}",
        trainer.boards_played(),
        signed_dollars(trainer.game().score())
    );
    Ok(())
}
