// Breadth-first search over the occupancy grid
//
// Used to find which of our pieces can reach a grid cell (typically a wall gap) in the
// fewest cell steps, with opponent cells treated as impassable.

use std::collections::VecDeque;

use crate::grid::{Cell, OccupancyGrid};
use crate::types::{CellPos, Direction, PieceId};

/// Shortest grid route from a start cell to one of our pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPath {
    /// Cell where the piece was found
    pub target: CellPos,
    /// Piece occupying `target`
    pub piece: PieceId,
    /// Directions to follow from the start cell to reach `target`
    pub steps: Vec<Direction>,
}

impl GridPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Finds the nearest own-piece cell reachable from `start`
///
/// Expands four-connected, in-bounds, unvisited, non-opponent cells. The first dequeued
/// cell other than `start` that holds one of our pieces ends the search.
///
/// # Returns
/// The shortest path to that cell, or None when no own piece is reachable
pub fn nearest_occupied_cell(grid: &OccupancyGrid, start: CellPos) -> Option<GridPath> {
    let rows = grid.rows();
    let cols = grid.cols();
    let start_index = grid.index(&start)?;

    let mut visited = vec![false; rows * cols];
    let mut came_from: Vec<Option<Direction>> = vec![None; rows * cols];
    let mut queue = VecDeque::new();

    visited[start_index] = true;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if cell != start {
            if let Some(Cell::Owned(piece)) = grid.get(&cell) {
                return Some(GridPath {
                    target: cell,
                    piece,
                    steps: reconstruct(grid, &came_from, start, cell),
                });
            }
        }

        for dir in Direction::all() {
            let Some(next) = dir.apply(&cell, rows, cols) else {
                continue;
            };
            let Some(i) = grid.index(&next) else {
                continue;
            };
            if visited[i] || grid.is_opponent(&next) {
                continue;
            }
            visited[i] = true;
            came_from[i] = Some(dir);
            queue.push_back(next);
        }
    }

    None
}

/// Walks the recorded directions backwards from `end` to `start`
fn reconstruct(
    grid: &OccupancyGrid,
    came_from: &[Option<Direction>],
    start: CellPos,
    end: CellPos,
) -> Vec<Direction> {
    let mut steps = Vec::new();
    let mut cell = end;
    while cell != start {
        let Some(dir) = grid.index(&cell).and_then(|i| came_from[i]) else {
            break;
        };
        steps.push(dir);
        match dir.opposite().apply(&cell, grid.rows(), grid.cols()) {
            Some(prev) => cell = prev,
            None => break,
        }
    }
    steps.reverse();
    steps
}
