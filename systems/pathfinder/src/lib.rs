#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze-escape robot: manual moves, breadth-first solving and timed replay.

use std::{collections::VecDeque, slice, time::Duration};

use playground_core::{
    CellCoord, Direction, MazeCommand, MazeEvent, MazeSnapshot, MoveResult, SolverState,
};
use playground_scheduler::{Scheduler, TaskHandle};
use playground_world::{navigation, Grid, GridError, CLASSIC_GOAL, CLASSIC_START};
use tracing::{debug, info};

const DEFAULT_REPLAY_INTERVAL: Duration = Duration::from_millis(500);

/// Configuration parameters required to construct the pathfinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    replay_interval: Duration,
}

impl Config {
    /// Creates a configuration using the provided replay cadence.
    #[must_use]
    pub const fn new(replay_interval: Duration) -> Self {
        Self { replay_interval }
    }

    /// Delay between consecutive replay steps.
    #[must_use]
    pub const fn replay_interval(&self) -> Duration {
        self.replay_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_INTERVAL)
    }
}

/// Ordered cells leading from the robot to the goal.
///
/// The robot's own cell is not included; the goal is the last cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Number of steps along the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the robot already stands on the goal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells of the path in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Iterates over the cells in travel order.
    pub fn iter(&self) -> slice::Iter<'_, CellCoord> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a CellCoord;
    type IntoIter = slice::Iter<'a, CellCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of a breadth-first solve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// A shortest path to the goal.
    Found(Path),
    /// The goal is walled off from the robot.
    NotFound,
}

impl Solution {
    /// Path carried by a successful solve.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound => None,
        }
    }
}

/// Outcome of an auto-solve request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum AutoSolve {
    /// Replay began; the first step has already been taken.
    Started {
        /// Total number of replay steps, including the first.
        steps: u32,
    },
    /// No path leads to the goal; the solver stays idle.
    NotFound,
    /// The solver is already replaying or complete.
    Rejected,
}

#[derive(Clone, Copy, Debug)]
struct ReplayStep;

/// Pure state machine behind the maze-escape robot.
#[derive(Debug)]
pub struct GridPathfinder {
    grid: Grid,
    start: CellCoord,
    goal: CellCoord,
    agent: CellCoord,
    move_count: u32,
    solver: SolverState,
    config: Config,
    scheduler: Scheduler<ReplayStep>,
    replay: VecDeque<CellCoord>,
    replay_task: Option<TaskHandle>,
}

impl GridPathfinder {
    /// Creates a pathfinder over `grid`, validating both landmarks.
    pub fn new(
        grid: Grid,
        start: CellCoord,
        goal: CellCoord,
        config: Config,
    ) -> Result<Self, GridError> {
        grid.ensure_open(start)?;
        grid.ensure_open(goal)?;

        Ok(Self {
            grid,
            start,
            goal,
            agent: start,
            move_count: 0,
            solver: SolverState::Idle,
            config,
            scheduler: Scheduler::new(),
            replay: VecDeque::new(),
            replay_task: None,
        })
    }

    /// Pathfinder over the classic 10x7 maze.
    #[must_use]
    pub fn classic(config: Config) -> Self {
        Self {
            grid: Grid::classic(),
            start: CLASSIC_START,
            goal: CLASSIC_GOAL,
            agent: CLASSIC_START,
            move_count: 0,
            solver: SolverState::Idle,
            config,
            scheduler: Scheduler::new(),
            replay: VecDeque::new(),
            replay_task: None,
        }
    }

    /// Applies a host command, appending the resulting events to `out`.
    pub fn apply(&mut self, command: MazeCommand, out: &mut Vec<MazeEvent>) {
        match command {
            MazeCommand::Step { direction } => {
                let _ = self.try_move(direction, out);
            }
            MazeCommand::AutoSolve => {
                let _ = self.auto_solve(out);
            }
            MazeCommand::Reset => self.reset(out),
            MazeCommand::Tick { dt } => self.advance(dt, out),
        }
    }

    /// Attempts to move the robot one cell.
    pub fn try_move(&mut self, direction: Direction, out: &mut Vec<MazeEvent>) -> MoveResult {
        if self.solver != SolverState::Idle {
            debug!(?direction, solver = ?self.solver, "manual move rejected");
            return MoveResult::Rejected;
        }

        let target = self
            .agent
            .step(direction)
            .filter(|cell| self.grid.is_open(*cell));

        match target {
            Some(cell) => {
                self.enter(cell, out);
                MoveResult::Moved
            }
            None => {
                debug!(?direction, from = ?self.agent, "move blocked");
                out.push(MazeEvent::MoveBlocked {
                    from: self.agent,
                    direction,
                });
                MoveResult::Blocked
            }
        }
    }

    /// Runs breadth-first search from the robot to the goal.
    #[must_use]
    pub fn solve(&self) -> Solution {
        match navigation::shortest_path(self.grid.view(), self.agent, self.goal) {
            Some(cells) => Solution::Found(Path { cells }),
            None => Solution::NotFound,
        }
    }

    /// Solves the maze and starts replaying the path.
    ///
    /// The first step is taken immediately; the rest follow one per replay
    /// interval as the host advances time.
    pub fn auto_solve(&mut self, out: &mut Vec<MazeEvent>) -> AutoSolve {
        if self.solver != SolverState::Idle {
            return AutoSolve::Rejected;
        }

        let path = match self.solve() {
            Solution::Found(path) => path,
            Solution::NotFound => {
                info!(from = ?self.agent, goal = ?self.goal, "no path to goal");
                out.push(MazeEvent::PathNotFound);
                return AutoSolve::NotFound;
            }
        };

        let steps = u32::try_from(path.len()).unwrap_or(u32::MAX);
        debug!(steps, "auto-solve started");
        self.solver = SolverState::AutoSolving;
        self.replay = path.cells.into();
        out.push(MazeEvent::AutoSolveStarted { steps });

        self.replay_step(out);
        if self.solver == SolverState::AutoSolving {
            self.replay_task = Some(
                self.scheduler
                    .schedule_repeating(self.config.replay_interval, ReplayStep),
            );
        }

        AutoSolve::Started { steps }
    }

    /// Advances the replay clock, taking every step that falls due.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<MazeEvent>) {
        self.scheduler.advance(dt);
        while let Some(ReplayStep) = self.scheduler.pop_due() {
            self.replay_step(out);
        }
    }

    /// Returns the robot to the start and cancels any replay.
    pub fn reset(&mut self, out: &mut Vec<MazeEvent>) {
        self.stop_replay();
        self.agent = self.start;
        self.move_count = 0;
        self.solver = SolverState::Idle;
        out.push(self.state_changed());
    }

    /// Captures the presentation state of the session.
    #[must_use]
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            start: self.start,
            goal: self.goal,
            agent: self.agent,
            move_count: self.move_count,
            solver: self.solver,
        }
    }

    /// Maze the robot explores.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell currently occupied by the robot.
    #[must_use]
    pub fn agent(&self) -> CellCoord {
        self.agent
    }

    /// Accepted moves since the last reset.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Current solver state.
    #[must_use]
    pub fn solver(&self) -> SolverState {
        self.solver
    }

    fn replay_step(&mut self, out: &mut Vec<MazeEvent>) {
        if self.solver != SolverState::AutoSolving {
            return;
        }

        match self.replay.pop_front() {
            Some(cell) => self.enter(cell, out),
            None => self.finish(out),
        }
    }

    fn enter(&mut self, cell: CellCoord, out: &mut Vec<MazeEvent>) {
        self.agent = cell;
        self.move_count = self.move_count.saturating_add(1);

        if cell == self.goal {
            self.finish(out);
        } else {
            out.push(self.state_changed());
        }
    }

    fn finish(&mut self, out: &mut Vec<MazeEvent>) {
        self.stop_replay();
        self.solver = SolverState::Complete;
        info!(move_count = self.move_count, "goal reached");
        out.push(self.state_changed());
        out.push(MazeEvent::GoalReached {
            move_count: self.move_count,
        });
    }

    fn stop_replay(&mut self) {
        if let Some(task) = self.replay_task.take() {
            task.cancel();
        }
        self.scheduler.cancel_all();
        self.replay.clear();
    }

    fn state_changed(&self) -> MazeEvent {
        MazeEvent::StateChanged {
            agent: self.agent,
            move_count: self.move_count,
            solver: self.solver,
        }
    }
}
