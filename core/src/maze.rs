//! Message surface of the maze-escape robot.

use std::time::Duration;

use crate::{CellCoord, Direction};

/// Commands the host may submit to the maze pathfinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeCommand {
    /// Requests a single manual step of the robot.
    Step {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the pathfinder solve the maze and replay the result.
    AutoSolve,
    /// Returns the robot to the start and clears progress.
    Reset,
    /// Advances the pathfinder clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Outcome of a manual move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub enum MoveResult {
    /// The robot advanced into the target cell.
    Moved,
    /// The target cell is a wall or outside the grid; nothing changed.
    Blocked,
    /// Manual input is not accepted in the current solver state; nothing changed.
    Rejected,
}

/// Lifecycle of a maze session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SolverState {
    /// Accepting manual moves and auto-solve requests.
    #[default]
    Idle,
    /// Replaying a computed path; manual moves are rejected.
    AutoSolving,
    /// The robot reached the goal; only a reset continues the session.
    Complete,
}

/// Events broadcast by the pathfinder after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeEvent {
    /// The robot position, move count or solver state changed.
    StateChanged {
        /// Cell occupied by the robot after the change.
        agent: CellCoord,
        /// Accepted moves since the last reset.
        move_count: u32,
        /// Solver state after the change.
        solver: SolverState,
    },
    /// A manual move ran into a wall or the grid edge.
    MoveBlocked {
        /// Cell the robot occupied when the move was attempted.
        from: CellCoord,
        /// Direction of the rejected move.
        direction: Direction,
    },
    /// A path was found and its replay began.
    AutoSolveStarted {
        /// Number of steps the replay will take.
        steps: u32,
    },
    /// The robot arrived at the goal.
    GoalReached {
        /// Accepted moves it took to arrive.
        move_count: u32,
    },
    /// Breadth-first search could not reach the goal from the robot's cell.
    PathNotFound,
}

/// Immutable snapshot of a maze session used for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeSnapshot {
    /// Cell the robot starts from and returns to on reset.
    pub start: CellCoord,
    /// Cell the robot must reach.
    pub goal: CellCoord,
    /// Cell currently occupied by the robot.
    pub agent: CellCoord,
    /// Accepted moves since the last reset.
    pub move_count: u32,
    /// Current solver state.
    pub solver: SolverState,
}
