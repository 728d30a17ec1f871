//! Drives each demo from the command line, feeding simulated time and
//! forwarding frames and notices to a [`RenderingBackend`].

use anyhow::{bail, Context, Result};
use playground_core::{
    Direction, DiveEvent, GameState, MazeEvent, SolverState, SortAlgorithm, SortEvent, SortState,
};
use playground_rendering::{
    bars_frame, dive_notice, maze_frame, maze_notice, sort_notice, ArenaViewport,
    RenderingBackend,
};
use playground_system_diving::BuoyancyRunner;
use playground_system_pathfinder::{AutoSolve, GridPathfinder};
use playground_system_sorting::{RunOutcome, SortAnimator};
use tracing::{debug, info};

use crate::{autopilot, layout_transfer::MazeLayout, settings::Settings};

/// Parses a move script such as `"RRDD"` or `"r, r, d"`.
///
/// Whitespace and commas are ignored.
pub(crate) fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    script
        .chars()
        .filter(|glyph| !glyph.is_whitespace() && *glyph != ',')
        .map(|glyph| match glyph.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            other => bail!("unknown move `{other}`, expected one of U, D, L, R"),
        })
        .collect()
}

/// Options of the `maze` subcommand.
#[derive(Clone, Debug, Default)]
pub(crate) struct MazeRun {
    pub(crate) layout: Option<String>,
    pub(crate) moves: Vec<Direction>,
    pub(crate) auto: bool,
}

/// Plays the scripted moves, optionally auto-solves, and returns the finished session.
pub(crate) fn run_maze<B>(
    run: &MazeRun,
    settings: &Settings,
    backend: &mut B,
) -> Result<GridPathfinder>
where
    B: RenderingBackend,
{
    let config = settings.maze_config();
    let mut pathfinder = match &run.layout {
        Some(code) => {
            let layout = MazeLayout::decode(code).context("failed to decode maze layout")?;
            let grid = layout.grid()?;
            GridPathfinder::new(grid, layout.start, layout.goal, config)
                .context("maze layout has invalid landmarks")?
        }
        None => GridPathfinder::classic(config),
    };

    let mut events = Vec::new();
    present_maze(&pathfinder, backend)?;

    for direction in &run.moves {
        let result = pathfinder.try_move(*direction, &mut events);
        debug!(?direction, ?result, "scripted move");
        notify_maze(&mut events, backend)?;
        present_maze(&pathfinder, backend)?;
    }

    if run.auto {
        match pathfinder.auto_solve(&mut events) {
            AutoSolve::Started { steps } => info!(steps, "replaying shortest path"),
            AutoSolve::NotFound => info!("maze has no solution"),
            AutoSolve::Rejected => info!(solver = ?pathfinder.solver(), "auto-solve ignored"),
        }
        notify_maze(&mut events, backend)?;
        present_maze(&pathfinder, backend)?;

        while pathfinder.solver() == SolverState::AutoSolving {
            pathfinder.advance(config.replay_interval(), &mut events);
            notify_maze(&mut events, backend)?;
            present_maze(&pathfinder, backend)?;
        }
    }

    Ok(pathfinder)
}

fn present_maze<B: RenderingBackend>(pathfinder: &GridPathfinder, backend: &mut B) -> Result<()> {
    backend.present(&maze_frame(pathfinder.grid().view(), &pathfinder.snapshot()))
}

fn notify_maze<B: RenderingBackend>(
    events: &mut Vec<MazeEvent>,
    backend: &mut B,
) -> Result<()> {
    for notice in events.drain(..).filter_map(|event| maze_notice(&event)) {
        backend.notify(&notice)?;
    }
    Ok(())
}

/// Options of the `dive` subcommand.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DiveRun {
    pub(crate) seed: u64,
    pub(crate) seconds: Option<u32>,
    pub(crate) autopilot: bool,
}

/// Plays one run to its end, redrawing once per countdown second.
pub(crate) fn run_dive<B>(run: &DiveRun, settings: &Settings, backend: &mut B) -> Result<BuoyancyRunner>
where
    B: RenderingBackend,
{
    let mut tuning = settings.tuning();
    if let Some(seconds) = run.seconds {
        tuning.time_limit = seconds;
    }
    if tuning.time_limit == 0 {
        bail!("a dive needs at least one second on the clock");
    }

    let viewport = ArenaViewport::new(
        settings.display.arena_columns,
        settings.display.arena_rows,
    )
    .context("invalid display settings")?;
    let mut runner = BuoyancyRunner::new(tuning, run.seed).context("invalid dive settings")?;

    let mut events = Vec::new();
    runner.start(&mut events);
    backend.present(&viewport.arena_frame(&runner.snapshot()))?;

    while runner.state() == GameState::Running {
        if run.autopilot {
            runner.set_input(autopilot::steer(&runner.snapshot()));
        }
        runner.advance(tuning.tick_interval, &mut events);

        let mut redraw = false;
        for event in events.drain(..) {
            redraw |= matches!(event, DiveEvent::TimeRemaining { .. });
            if let Some(notice) = dive_notice(&event) {
                backend.notify(&notice)?;
            }
        }
        if redraw {
            backend.present(&viewport.arena_frame(&runner.snapshot()))?;
        }
    }

    Ok(runner)
}

/// Options of the `sort` subcommand.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SortRun {
    pub(crate) algorithm: SortAlgorithm,
    pub(crate) seed: u64,
}

/// Animates one sort, redrawing after every applied step.
pub(crate) fn run_sort<B>(run: &SortRun, settings: &Settings, backend: &mut B) -> Result<SortAnimator>
where
    B: RenderingBackend,
{
    let config = settings.sort_config();
    let bar_height = settings.display.bar_height;
    let mut animator = SortAnimator::new(config, run.seed);
    let mut events = Vec::new();

    backend.present(&bars_frame(animator.values(), &[], bar_height, animator.state()))?;

    match animator.run(run.algorithm, &mut events) {
        RunOutcome::Started { steps } => debug!(steps, algorithm = %run.algorithm, "sort planned"),
        RunOutcome::Rejected => bail!("sort animator is busy"),
    }

    // Compares may run at half pace, so time advances in half intervals.
    let quantum = config.step_interval() / 2;
    loop {
        for event in events.drain(..) {
            if let Some(notice) = sort_notice(&event) {
                backend.notify(&notice)?;
            }
            if let SortEvent::StepApplied { step } = event {
                backend.present(&bars_frame(
                    animator.values(),
                    &step.highlighted(),
                    bar_height,
                    animator.state(),
                ))?;
            }
        }

        if animator.state() != SortState::Animating {
            break;
        }
        animator.advance(quantum, &mut events);
    }

    backend.present(&bars_frame(animator.values(), &[], bar_height, animator.state()))?;
    Ok(animator)
}
