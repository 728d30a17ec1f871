#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static worlds the playground demos run inside.
//!
//! The maze [`Grid`] is built once and never mutated while a robot explores
//! it; [`navigation`] answers shortest-path queries over it. The diving
//! [`arena::Arena`] describes the water tank and [`arena::LayoutGenerator`]
//! scatters obstacles and treasure across it from a seed.

pub mod arena;
pub mod navigation;

use playground_core::{CellCoord, CellState, GridView};
use thiserror::Error;

/// Start cell of the classic maze.
pub const CLASSIC_START: CellCoord = CellCoord::new(1, 1);
/// Goal cell of the classic maze.
pub const CLASSIC_GOAL: CellCoord = CellCoord::new(8, 5);

const CLASSIC_COLUMNS: u32 = 10;
const CLASSIC_ROWS: u32 = 7;
const CLASSIC_LAYOUT: [[u8; 10]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 1, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Reasons a maze layout may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The layout has no cells.
    #[error("maze layout must contain at least one cell")]
    Empty,
    /// The cell buffer does not match the declared dimensions.
    #[error("maze layout declares {expected} cells but provides {actual}")]
    DimensionMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually provided.
        actual: usize,
    },
    /// A row is shorter or longer than the first row.
    #[error("maze row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A layout picture contains a character that is neither wall nor floor.
    #[error("unknown maze glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based row of the character.
        row: usize,
        /// Zero-based column of the character.
        column: usize,
    },
    /// A landmark lies outside the grid.
    #[error("cell ({}, {}) lies outside the maze", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A landmark sits on a wall.
    #[error("cell ({}, {}) is a wall", .cell.column(), .cell.row())]
    Walled {
        /// Offending cell.
        cell: CellCoord,
    },
}

/// Dense row-major occupancy grid of a maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid from a row-major cell buffer.
    pub fn new(columns: u32, rows: u32, cells: Vec<CellState>) -> Result<Self, GridError> {
        let expected_u64 = u64::from(columns) * u64::from(rows);
        let expected = usize::try_from(expected_u64).unwrap_or(usize::MAX);
        if expected == 0 {
            return Err(GridError::Empty);
        }
        if cells.len() != expected {
            return Err(GridError::DimensionMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Creates a grid from rows of `0` (open) and non-zero (wall) values.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[u8]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(width * rows.len());

        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row.iter().map(|value| {
                if *value == 0 {
                    CellState::Open
                } else {
                    CellState::Wall
                }
            }));
        }

        let columns = u32::try_from(width).unwrap_or(u32::MAX);
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        Self::new(columns, row_count, cells)
    }

    /// Parses an ASCII picture where `#` is a wall and `.` is open floor.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(picture: &str) -> Result<Self, GridError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for line in picture.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row_index = rows.len();
            let mut row = Vec::with_capacity(line.len());
            for (column, glyph) in line.chars().enumerate() {
                match glyph {
                    '#' => row.push(1),
                    '.' => row.push(0),
                    _ => {
                        return Err(GridError::UnknownGlyph {
                            glyph,
                            row: row_index,
                            column,
                        })
                    }
                }
            }
            rows.push(row);
        }

        Self::from_rows(&rows)
    }

    /// The 10x7 maze the robot demo ships with.
    #[must_use]
    pub fn classic() -> Self {
        let cells = CLASSIC_LAYOUT
            .iter()
            .flatten()
            .map(|value| {
                if *value == 0 {
                    CellState::Open
                } else {
                    CellState::Wall
                }
            })
            .collect();

        Self {
            columns: CLASSIC_COLUMNS,
            rows: CLASSIC_ROWS,
            cells,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Read-only view over the grid cells.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    /// Reports whether the cell lies inside the grid and is open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.view().is_open(cell)
    }

    /// Verifies that a landmark such as a start or goal sits on open floor.
    pub fn ensure_open(&self, cell: CellCoord) -> Result<(), GridError> {
        match self.view().cell(cell) {
            None => Err(GridError::OutOfBounds { cell }),
            Some(CellState::Wall) => Err(GridError::Walled { cell }),
            Some(CellState::Open) => Ok(()),
        }
    }

    /// Rows of `0` (open) and `1` (wall) values, top to bottom.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.view()
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| u8::from(*cell == CellState::Wall))
                    .collect()
            })
            .collect()
    }
}
