// Reachable-space analysis (flood fill)

use std::collections::VecDeque;

use crate::grid::{Grid, Obstacles};
use crate::types::Cell;

/// Counts the cells reachable from `start` without crossing an obstacle.
///
/// Breadth-first; the start cell is always counted, even when it is itself
/// marked as an obstacle. Result lies in `1..=grid.cardinality()`.
pub fn reachable_space(grid: &Grid, start: Cell, obstacles: &Obstacles) -> usize {
    assert!(
        grid.in_bounds(&start),
        "flood fill start ({}, {}) lies outside the grid",
        start.x,
        start.y
    );

    let mut visited = vec![false; grid.cardinality()];
    let mut queue = VecDeque::with_capacity(grid.cardinality());
    visited[grid.index(&start)] = true;
    queue.push_back(start);

    let mut count = 0;
    while let Some(cell) = queue.pop_front() {
        count += 1;
        for (_, next) in grid.neighbors(&cell).iter() {
            if !grid.in_bounds(next) || obstacles.contains(next) {
                continue;
            }
            let idx = grid.index(next);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(*next);
            }
        }
    }

    count
}

/// Space available to a snake whose head is `body[0]`; the rest of the body blocks
pub fn space_from_head(grid: &Grid, body: &[Cell]) -> usize {
    assert!(!body.is_empty(), "snake body must contain at least one cell");
    let obstacles = Obstacles::from_cells(grid, &body[1..]);
    reachable_space(grid, body[0], &obstacles)
}
