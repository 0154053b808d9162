// SPDX-License-Identifier: MIT
//
// n-snow — interactive ASCII snowfall over a colored tree.
//
// This is the main binary that wires together all the crates:
//
//   n-term  → terminal session, teardown, key polling, stdout surface
//   n-theme → random source, palettes, tree art and its coloring
//   n-flake → simulation, emitter, controls, per-tick driver
//
// Each tick flows through:
//
//   poll key (bounded wait = frame clock) → render tree → advance flakes
//   → auto-spawn → dispatch key → flush
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ snow grid + tree             │  ← rows - 6 rows
//   ├──────────────────────────────┤
//   │ legend (3 lines)             │
//   │ status (placement report)    │
//   └──────────────────────────────┘
//
// Exit status: 0 on Escape, Ctrl-C and termination signals; 1 when the
// terminal fails under us.

mod config;

use std::fs::File;
use std::process;

use anyhow::{Context, Result};
use log::{info, warn};

use n_flake::session::{self, State};
use n_flake::{Emitter, GridSize, Phase};
use n_term::output::StdoutSurface;
use n_term::reader::KeyPoller;
use n_term::terminal::{self, Terminal};
use n_theme::Xorshift32;

use crate::config::Config;

fn main() {
    let config = Config::from_env();

    if let Err(err) = init_logging(&config) {
        eprintln!("n-snow: {err:#}");
        process::exit(1);
    }
    for (var, value) in &config.rejected {
        warn!("ignoring {var}={value:?}, using the default");
    }

    if let Err(err) = run(&config) {
        terminal::teardown();
        eprintln!("n-snow: {err:#}");
        process::exit(1);
    }
}

/// Route `log` output to the configured file. Without one, logging stays
/// off: stdout and stderr belong to the animation.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(config: &Config) -> Result<()> {
    let size = GridSize::for_terminal(terminal::query_dimensions());
    let mut rng = config.seed.map_or_else(Xorshift32::from_clock, Xorshift32::new);
    info!(
        "starting: grid {}x{}, tick {:?}, seed {:?}",
        size.width, size.height, config.tick, config.seed
    );

    terminal::install_interrupt_handler().context("cannot install signal handlers")?;
    let mut term = Terminal::new();
    term.enter().context("cannot set up the terminal")?;

    let mut keys = KeyPoller::spawn();
    let mut emitter = Emitter::new(StdoutSurface::stdout());
    let mut state = State::new(size, config.auto_spawn, &mut rng);
    session::start(&state, &mut emitter).context("cannot draw the screen")?;

    loop {
        let key = keys.poll_key(config.tick);
        let phase = session::tick(&mut state, key, &mut emitter, &mut rng)
            .context("cannot draw the screen")?;
        if phase == Phase::Exiting {
            break;
        }
    }

    info!("exit requested");
    keys.stop();
    term.leave();
    Ok(())
}
