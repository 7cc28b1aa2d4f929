use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pomo::{
    config::{Args, Config},
    control::{TerminalInput, TimerControl},
    session::{RunOutcome, run_pomodoro},
    timer::Timer,
    ui::TerminalScreen,
};

fn main() -> Result<()> {
    // Errors only unless RUST_LOG says otherwise; anything louder would
    // scribble over the countdown screen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::default_path()
        .map(|path| Config::load(&path))
        .unwrap_or_default()
        .apply_args(&args);
    let store = config.stats_store();

    if args.stats {
        print!("{}", store.render_summary());
        return Ok(());
    }

    if let Err(e) = args.validate() {
        e.exit();
    }

    let session = config.session();
    let control = TimerControl::new();
    let mut input = TerminalInput;
    let mut screen = TerminalScreen::enter()?;

    let res = {
        let settings = config.timer_settings();
        let mut timer = Timer::new(&mut screen, &mut input, &control, &store, settings);
        run_pomodoro(&mut timer, &session)
    };

    screen.restore()?;

    match res? {
        RunOutcome::Completed(summary) => println!("{summary}"),
        RunOutcome::Cancelled => println!("\nExiting Pomodoro Timer"),
    }

    Ok(())
}
