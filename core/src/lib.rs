#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Coding Playground demos.
//!
//! This crate defines the message surface that connects the host shell with
//! the pure demo state machines. Hosts submit command values describing the
//! player's intent, each state machine applies them through its `apply` entry
//! point and appends outcome events, and the host then reads an immutable
//! snapshot to redraw. Nothing in here renders, sleeps or performs I/O.

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod dive;
mod maze;
mod sort;

pub use dive::{
    ArenaSnapshot, DiveCommand, DiveEvent, GameOverReason, GameState, HeldDirections, RunState,
    TreasureId, TreasureSnapshot,
};
pub use maze::{MazeCommand, MazeEvent, MazeSnapshot, MoveResult, SolverState};
pub use sort::{SortAlgorithm, SortCommand, SortEvent, SortState, SortStep, StepPace};

/// Canonical banner emitted when the playground boots.
pub const WELCOME_BANNER: &str = "Welcome to the Coding Playground.";

/// Cardinal movement directions accepted from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Every direction in the fixed enumeration order used by neighbour scans.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Column and row offsets applied when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Unit vector pointing in this direction in screen space (y grows downward).
    #[must_use]
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell in the provided direction.
    ///
    /// Only the lower bound is checked here; callers own the grid and reject
    /// cells past its far edges.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }
}

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Traversable floor.
    Open,
    /// Impassable wall.
    Wall,
}

/// Read-only view into a dense row-major maze grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellState],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the state of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell lies inside the grid and is open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.cell(cell) == Some(CellState::Open)
    }

    /// Iterates over the grid one row at a time, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [CellState]> + 'a {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        let cells = self.cells;
        cells.chunks(width)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle expressed in arena units.
///
/// The origin is the top-left corner; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    origin: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Constructs a box from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Top-left corner of the box.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the box.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Geometric centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Strict overlap test; boxes that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.origin.x < other.origin.x + other.size.x
            && self.origin.x + self.size.x > other.origin.x
            && self.origin.y < other.origin.y + other.size.y
            && self.origin.y + self.size.y > other.origin.y
    }
}
