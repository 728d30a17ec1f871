#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host for the Coding Playground demos.

mod autopilot;
mod layout_transfer;
mod session;
mod settings;
mod terminal;

use std::{io, path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use playground_core::{SortAlgorithm, WELCOME_BANNER};
use tracing_subscriber::EnvFilter;

use crate::{
    layout_transfer::MazeLayout,
    session::{parse_moves, DiveRun, MazeRun, SortRun},
    settings::Settings,
    terminal::TerminalBackend,
};

/// Pause between frames in realtime mode.
const REALTIME_FRAME_DELAY: Duration = Duration::from_millis(120);

#[derive(Debug, Parser)]
#[command(
    name = "playground",
    about = "Maze robot, treasure dive and sorting visualizer in the terminal",
    version
)]
struct Cli {
    /// TOML settings file overriding the built-in tuning.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sleep between frames instead of printing them all at once.
    #[arg(long, global = true)]
    realtime: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk the maze robot by hand or let it find the shortest path.
    Maze {
        /// Layout code produced by `--export`; defaults to the classic maze.
        #[arg(long)]
        layout: Option<String>,

        /// Manual moves to play first, e.g. `DDRR`.
        #[arg(long, default_value = "")]
        moves: String,

        /// Solve with breadth-first search and replay the path.
        #[arg(long)]
        auto: bool,

        /// Print the layout code of the maze after the session.
        #[arg(long)]
        export: bool,
    },
    /// Dive for treasure until the clock or the lives run out.
    Dive {
        /// Seed for obstacle and treasure placement.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Length of the run in seconds.
        #[arg(long)]
        seconds: Option<u32>,

        /// Steer toward the nearest treasure automatically.
        #[arg(long)]
        autopilot: bool,
    },
    /// Animate a sorting algorithm over a random array.
    Sort {
        /// Algorithm to run.
        #[arg(long, default_value = "bubble")]
        algorithm: SortAlgorithm,

        /// Seed for the generated array.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Entry point for the Coding Playground command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let frame_delay = cli.realtime.then_some(REALTIME_FRAME_DELAY);
    let stdout = io::stdout();
    let mut backend = TerminalBackend::new(stdout.lock(), frame_delay);
    backend.line(WELCOME_BANNER)?;

    match cli.command {
        Command::Maze {
            layout,
            moves,
            auto,
            export,
        } => {
            let run = MazeRun {
                layout,
                moves: parse_moves(&moves)?,
                auto,
            };
            let pathfinder = session::run_maze(&run, &settings, &mut backend)?;
            if export {
                let snapshot = pathfinder.snapshot();
                let code =
                    MazeLayout::capture(pathfinder.grid(), snapshot.start, snapshot.goal).encode()?;
                backend.line(&code)?;
            }
        }
        Command::Dive {
            seed,
            seconds,
            autopilot,
        } => {
            let run = DiveRun {
                seed,
                seconds,
                autopilot,
            };
            let runner = session::run_dive(&run, &settings, &mut backend)?;
            tracing::info!(score = runner.run().score, "dive finished");
        }
        Command::Sort { algorithm, seed } => {
            let run = SortRun { algorithm, seed };
            let _animator = session::run_sort(&run, &settings, &mut backend)?;
        }
    }

    Ok(())
}
