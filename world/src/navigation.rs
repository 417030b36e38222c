//! Breadth-first shortest-path search over the expanded grid.

use std::collections::VecDeque;

use maze_runner_core::{GridCoord, MazeError};

use crate::grid::ExpandedGrid;

/// Computes the shortest 4-connected route across open tiles.
///
/// The returned path excludes `start` and ends with `goal`; it is empty when
/// both coincide. Neighbors are expanded in down, up, right, left order, so
/// ties between equally short routes are broken deterministically.
///
/// # Errors
///
/// Returns [`MazeError::NoPath`] when either endpoint is off-grid or a wall,
/// or when the goal cannot be reached from the start.
pub fn shortest_path(
    grid: &ExpandedGrid,
    start: GridCoord,
    goal: GridCoord,
) -> Result<Vec<GridCoord>, MazeError> {
    let no_path = MazeError::NoPath { start, goal };
    if !grid.is_open(start) || !grid.is_open(goal) {
        return Err(no_path);
    }
    if start == goal {
        return Ok(Vec::new());
    }

    let width = usize::try_from(grid.columns()).map_err(|_| no_path)?;
    let height = usize::try_from(grid.rows()).map_err(|_| no_path)?;
    let cell_count = width.checked_mul(height).ok_or(no_path)?;

    let mut visited = vec![false; cell_count];
    let mut predecessors: Vec<Option<GridCoord>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    let start_index = index(width, start).ok_or(no_path)?;
    visited[start_index] = true;
    queue.push_back(start);

    let mut reached = false;
    while let Some(current) = queue.pop_front() {
        if current == goal {
            reached = true;
            break;
        }

        for neighbor in neighbors(current) {
            if !grid.is_open(neighbor) {
                continue;
            }
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };
            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            predecessors[neighbor_index] = Some(current);
            queue.push_back(neighbor);
        }
    }

    if !reached {
        return Err(no_path);
    }

    let mut path = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        path.push(cursor);
        cursor = index(width, cursor)
            .and_then(|offset| predecessors[offset])
            .ok_or(no_path)?;
    }
    path.reverse();
    Ok(path)
}

fn neighbors(cell: GridCoord) -> impl Iterator<Item = GridCoord> {
    let row = cell.row();
    let column = cell.column();
    [
        row.checked_add(1).map(|row| GridCoord::new(row, column)),
        row.checked_sub(1).map(|row| GridCoord::new(row, column)),
        column.checked_add(1).map(|column| GridCoord::new(row, column)),
        column.checked_sub(1).map(|column| GridCoord::new(row, column)),
    ]
    .into_iter()
    .flatten()
}

fn index(width: usize, cell: GridCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
