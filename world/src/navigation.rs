//! Breadth-first shortest paths over a maze grid.

use std::collections::VecDeque;

use playground_core::{CellCoord, Direction, GridView};

/// Computes a shortest 4-connected path between two open cells.
///
/// The returned cells exclude `from` and include `to`, so the path is empty
/// when both are the same cell. Neighbours are expanded in the order of
/// [`Direction::ALL`] (up, right, down, left) and each cell keeps the parent
/// that discovered it first, so the same grid always yields the same path
/// among equally short candidates. Returns `None` when `to` cannot be reached
/// or either endpoint is not open floor.
#[must_use]
pub fn shortest_path(grid: GridView<'_>, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
    if !grid.is_open(from) || !grid.is_open(to) {
        return None;
    }

    let (width, height) = grid.dimensions();
    let width_usize = usize::try_from(width).ok()?;
    let cell_count = width_usize.checked_mul(usize::try_from(height).ok()?)?;

    let mut parents: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();

    visited[index(width_usize, from)?] = true;
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            return Some(unwind(&parents, width_usize, from, to));
        }

        for neighbor in neighbors(cell, width, height) {
            if !grid.is_open(neighbor) {
                continue;
            }

            let Some(neighbor_index) = index(width_usize, neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    None
}

fn unwind(
    parents: &[Option<CellCoord>],
    width: usize,
    from: CellCoord,
    to: CellCoord,
) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut cursor = to;

    while cursor != from {
        path.push(cursor);
        let parent = index(width, cursor).and_then(|offset| parents.get(offset).copied().flatten());
        match parent {
            Some(parent) => cursor = parent,
            None => break,
        }
    }

    path.reverse();
    path
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction))
        .filter(move |next| next.column() < width && next.row() < height)
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
