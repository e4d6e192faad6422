mod command;
mod logging;
mod narration;
mod tui;
mod util;
mod view;

const DEFAULT_FRAME_RATE: f64 = 30.0;
const DEFAULT_TICK_RATE: f64 = 30.0;

fn main() -> anyhow::Result<()> {
    command::run()
}
