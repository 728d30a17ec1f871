#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Coding Playground hosts.
//!
//! Demo snapshots are turned into character [`Frame`]s and outcome events into
//! [`Notice`]s; a [`RenderingBackend`] decides where both end up.

use anyhow::Result as AnyResult;
use glam::Vec2;
use playground_core::{
    ArenaSnapshot, CellState, DiveEvent, GameOverReason, GameState, GridView, MazeEvent,
    MazeSnapshot, SolverState, SortEvent, SortState,
};
use std::{error::Error, fmt};

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';
const START_GLYPH: char = 'S';
const GOAL_GLYPH: char = 'G';
const ROBOT_GLYPH: char = '@';
const AIR_GLYPH: char = ' ';
const WATER_GLYPH: char = '~';
const SEABED_GLYPH: char = '_';
const OBSTACLE_GLYPH: char = 'X';
const TREASURE_GLYPH: char = '$';
const DIVER_GLYPH: char = 'D';
const BAR_GLYPH: char = '|';
const HIGHLIGHT_GLYPH: char = '*';

/// Text frame produced from a demo snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Title shown above the frame body.
    pub title: String,
    /// Body rows, top to bottom.
    pub lines: Vec<String>,
    /// One-line summary shown below the body.
    pub status: String,
}

impl Frame {
    /// Constructs a frame from its parts.
    #[must_use]
    pub fn new<T>(title: T, lines: Vec<String>, status: String) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            lines,
            status,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", self.status)
    }
}

/// Tone of a host notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Neutral progress information.
    Info,
    /// A goal was reached.
    Success,
    /// Something went wrong for the player.
    Warning,
}

/// Short message the host surfaces next to the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Tone of the message.
    pub tone: Tone,
    /// Message text.
    pub message: String,
}

impl Notice {
    fn new<T>(tone: Tone, message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            tone,
            message: message.into(),
        }
    }
}

/// Rendering backend capable of presenting playground frames.
pub trait RenderingBackend {
    /// Presents a freshly rendered frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;

    /// Surfaces a notification derived from an outcome event.
    fn notify(&mut self, notice: &Notice) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The viewport must have at least one column and one row.
    InvalidViewport {
        /// Requested column count.
        columns: usize,
        /// Requested row count.
        rows: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { columns, rows } => {
                write!(
                    f,
                    "viewport must be at least 1x1 characters (received {columns}x{rows})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

/// Draws the maze with the robot, start and goal overlaid.
#[must_use]
pub fn maze_frame(grid: GridView<'_>, snapshot: &MazeSnapshot) -> Frame {
    let (columns, _) = grid.dimensions();
    let mut canvas: Vec<Vec<char>> = grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    CellState::Wall => WALL_GLYPH,
                    CellState::Open => FLOOR_GLYPH,
                })
                .collect()
        })
        .collect();

    for (cell, glyph) in [
        (snapshot.start, START_GLYPH),
        (snapshot.goal, GOAL_GLYPH),
        (snapshot.agent, ROBOT_GLYPH),
    ] {
        let Ok(column) = usize::try_from(cell.column()) else {
            continue;
        };
        let Ok(row) = usize::try_from(cell.row()) else {
            continue;
        };
        if let Some(slot) = canvas.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = glyph;
        }
    }

    let solver = match snapshot.solver {
        SolverState::Idle => "idle",
        SolverState::AutoSolving => "auto-solving",
        SolverState::Complete => "complete",
    };

    Frame::new(
        format!("Maze escape ({columns} columns)"),
        canvas.into_iter().map(String::from_iter).collect(),
        format!(
            "position ({}, {})  moves {}  [{solver}]",
            snapshot.agent.column(),
            snapshot.agent.row(),
            snapshot.move_count
        ),
    )
}

/// Character grid the diving arena is scaled onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaViewport {
    columns: usize,
    rows: usize,
}

impl ArenaViewport {
    /// Viewport used by the terminal host.
    pub const DEFAULT: Self = Self {
        columns: 60,
        rows: 20,
    };

    /// Creates a viewport, rejecting zero-sized dimensions.
    pub fn new(columns: usize, rows: usize) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::InvalidViewport { columns, rows });
        }

        Ok(Self { columns, rows })
    }

    /// Arena units covered by a single character.
    #[must_use]
    pub fn scale(&self, arena_size: Vec2) -> Vec2 {
        arena_size / Vec2::new(self.columns as f32, self.rows as f32)
    }

    /// Character cell containing an arena point, clamped into the viewport.
    #[must_use]
    pub fn project(&self, point: Vec2, arena_size: Vec2) -> (usize, usize) {
        let scaled = (point / self.scale(arena_size)).floor().max(Vec2::ZERO);
        let column = (scaled.x as usize).min(self.columns - 1);
        let row = (scaled.y as usize).min(self.rows - 1);
        (column, row)
    }

    /// Draws the arena with its water line, entities and run status.
    #[must_use]
    pub fn arena_frame(&self, snapshot: &ArenaSnapshot) -> Frame {
        let size = snapshot.size;
        let seabed_depth = snapshot.seabed_depth;
        let (_, water_row) = self.project(Vec2::new(0.0, snapshot.water_line), size);
        let (_, seabed_row) = self.project(Vec2::new(0.0, size.y - seabed_depth), size);

        let mut canvas: Vec<Vec<char>> = (0..self.rows)
            .map(|row| {
                let glyph = if row >= seabed_row && seabed_depth > 0.0 {
                    SEABED_GLYPH
                } else if row >= water_row {
                    WATER_GLYPH
                } else {
                    AIR_GLYPH
                };
                vec![glyph; self.columns]
            })
            .collect();

        for obstacle in &snapshot.obstacles {
            self.fill(&mut canvas, obstacle.origin(), obstacle.size(), size, OBSTACLE_GLYPH);
        }
        for treasure in &snapshot.treasures {
            self.fill(
                &mut canvas,
                treasure.bounds.origin(),
                treasure.bounds.size(),
                size,
                TREASURE_GLYPH,
            );
        }
        self.fill(
            &mut canvas,
            snapshot.diver.origin(),
            snapshot.diver.size(),
            size,
            DIVER_GLYPH,
        );

        let state = match snapshot.state {
            GameState::NotStarted => "ready",
            GameState::Running => "running",
            GameState::Paused => "paused",
            GameState::Over => "over",
        };

        Frame::new(
            "Treasure dive",
            canvas.into_iter().map(String::from_iter).collect(),
            format!(
                "score {}  lives {}  time {}s  [{state}]",
                snapshot.run.score, snapshot.run.lives, snapshot.run.time_remaining
            ),
        )
    }

    fn fill(&self, canvas: &mut [Vec<char>], origin: Vec2, extent: Vec2, size: Vec2, glyph: char) {
        let scale = self.scale(size);
        let (left, top) = self.project(origin, size);
        let far = ((origin + extent) / scale).ceil() - Vec2::ONE;
        let right = (far.x.max(0.0) as usize).clamp(left, self.columns - 1);
        let bottom = (far.y.max(0.0) as usize).clamp(top, self.rows - 1);

        for line in canvas.iter_mut().take(bottom + 1).skip(top) {
            for slot in line.iter_mut().take(right + 1).skip(left) {
                *slot = glyph;
            }
        }
    }
}

impl Default for ArenaViewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Draws the array as vertical bars, marking highlighted positions.
#[must_use]
pub fn bars_frame(
    values: &[u32],
    highlighted: &[usize],
    max_height: usize,
    state: SortState,
) -> Frame {
    let tallest = values.iter().copied().max().unwrap_or(0).max(1);
    let max_height = max_height.max(1);
    let heights: Vec<usize> = values
        .iter()
        .map(|value| {
            let scaled = u64::from(*value) * max_height as u64 / u64::from(tallest);
            usize::try_from(scaled).unwrap_or(max_height).max(1)
        })
        .collect();

    let mut lines: Vec<String> = (0..max_height)
        .rev()
        .map(|level| {
            heights
                .iter()
                .enumerate()
                .map(|(index, height)| {
                    let glyph = if *height > level {
                        if highlighted.contains(&index) {
                            HIGHLIGHT_GLYPH
                        } else {
                            BAR_GLYPH
                        }
                    } else {
                        ' '
                    };
                    format!(" {glyph}{glyph} ")
                })
                .collect()
        })
        .collect();
    lines.push(values.iter().map(|value| format!("{value:^4}")).collect());

    let state = match state {
        SortState::Idle => "idle",
        SortState::Animating => "sorting",
        SortState::Sorted => "sorted",
    };

    Frame::new("Sorting", lines, format!("{} values  [{state}]", values.len()))
}

/// Notification worth surfacing for a maze event.
#[must_use]
pub fn maze_notice(event: &MazeEvent) -> Option<Notice> {
    match event {
        MazeEvent::GoalReached { move_count } => Some(Notice::new(
            Tone::Success,
            format!("Goal reached in {move_count} moves!"),
        )),
        MazeEvent::AutoSolveStarted { steps } => Some(Notice::new(
            Tone::Info,
            format!("Shortest path found: {steps} steps"),
        )),
        MazeEvent::PathNotFound => Some(Notice::new(Tone::Warning, "No path leads to the goal")),
        MazeEvent::MoveBlocked { .. } => Some(Notice::new(Tone::Warning, "A wall is in the way")),
        MazeEvent::StateChanged { .. } => None,
    }
}

/// Notification worth surfacing for a diving event.
#[must_use]
pub fn dive_notice(event: &DiveEvent) -> Option<Notice> {
    match event {
        DiveEvent::TreasureCollected { value, total_score } => Some(Notice::new(
            Tone::Success,
            format!("+{value} treasure (score {total_score})"),
        )),
        DiveEvent::LifeLost { remaining_lives } => Some(Notice::new(
            Tone::Warning,
            format!("Hit an obstacle, {remaining_lives} lives left"),
        )),
        DiveEvent::GameOver {
            reason,
            final_score,
        } => {
            let cause = match reason {
                GameOverReason::Time => "time is up",
                GameOverReason::Lives => "out of lives",
            };
            Some(Notice::new(
                Tone::Info,
                format!("Game over, {cause}. Final score {final_score}"),
            ))
        }
        DiveEvent::GameStateChanged { .. }
        | DiveEvent::StateChanged { .. }
        | DiveEvent::TreasureSpawned { .. }
        | DiveEvent::TimeRemaining { .. } => None,
    }
}

/// Notification worth surfacing for a sorting event.
#[must_use]
pub fn sort_notice(event: &SortEvent) -> Option<Notice> {
    match event {
        SortEvent::SortStarted { algorithm, steps } => Some(Notice::new(
            Tone::Info,
            format!("Running {algorithm} sort ({steps} steps)"),
        )),
        SortEvent::SortFinished {
            algorithm,
            comparisons,
            writes,
        } => Some(Notice::new(
            Tone::Success,
            format!("{algorithm} sort done: {comparisons} comparisons, {writes} writes"),
        )),
        SortEvent::ArrayGenerated { .. } | SortEvent::ArrayReset | SortEvent::StepApplied { .. } => {
            None
        }
    }
}
