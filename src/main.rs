//! Matrix rain runner (default binary).
//!
//! Parses the command line, puts the terminal in raw mode on the alternate
//! screen and drives the animation until a quit key or a termination signal.

use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;

use matrix_rain::cli::{read_when_ready, Args, Inputs, Resolved, SEED_ENV, STDIN_WAIT};
use matrix_rain::core::Engine;
use matrix_rain::term::{wait_until, FrameDriver, Interrupt, TerminalRenderer};
use matrix_rain::types::TICK_MS;

fn main() -> Result<()> {
    let args = Args::parse();
    let inputs = Inputs {
        piped: read_piped_stdin(&args)?,
        env_seed: std::env::var(SEED_ENV).ok(),
    };
    let Resolved { config, notes } = args.resolve(&inputs)?;
    let interrupt = Interrupt::register()?;

    let mut driver = FrameDriver::new(Engine::new(config));
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let started = Instant::now();
    let result = run(&mut term, &mut driver, &interrupt);

    // Always try to restore terminal state.
    driver.shutdown();
    let _ = term.exit();

    for note in &notes {
        eprintln!("[matrix-rain] {note}");
    }
    if args.verbose {
        let stats = driver.stats();
        let secs = started.elapsed().as_secs_f64();
        eprintln!(
            "[matrix-rain] {} frames in {:.1}s ({:.1} fps), {} resizes, {} glyphs written",
            stats.frames,
            secs,
            stats.frames as f64 / secs.max(f64::EPSILON),
            stats.resizes,
            stats.glyphs
        );
    }
    result
}

fn run(term: &mut TerminalRenderer, driver: &mut FrameDriver, interrupt: &Interrupt) -> Result<()> {
    let tick = Duration::from_millis(TICK_MS);
    let mut last = Instant::now();

    while !interrupt.is_set() {
        let now = Instant::now();
        let elapsed = now - last;
        last = now;

        // A failed size query counts as "no change" for this frame.
        let size = crossterm::terminal::size().ok();
        driver.frame(size, elapsed, term.begin_frame())?;
        term.present()?;

        wait_until(now + tick, interrupt)?;
    }
    Ok(())
}

/// Piped stdin becomes the character source, like `ls | matrix-rain`.
///
/// Skipped when `--stream` already names the source. A pipe that has nothing to
/// say within [`STDIN_WAIT`] is ignored rather than waited on.
fn read_piped_stdin(args: &Args) -> Result<Option<String>> {
    if args.stream.is_some() {
        return Ok(None);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    read_when_ready(stdin, STDIN_WAIT)
}
