// Path safety: would eating the food along this path strand the snake?

use crate::grid::{Grid, Obstacles};
use crate::space::reachable_space;
use crate::types::{Cell, Direction};

/// Replays `path` with growth (no tail removal) and checks the space left
/// from the food cell afterwards.
///
/// Unsafe when the reachable space is smaller than the grown body length plus
/// `margin`. A heuristic, not a survival proof.
pub fn is_path_safe(
    grid: &Grid,
    body: &[Cell],
    food: Cell,
    path: &[Direction],
    margin: usize,
) -> bool {
    let grown = grow_along(body, path);
    let space = post_consumption_space(grid, &grown, food);
    space >= grown.len() + margin
}

/// Body after following `path`, prepending every visited cell
pub fn grow_along(body: &[Cell], path: &[Direction]) -> Vec<Cell> {
    assert!(!body.is_empty(), "snake body must contain at least one cell");
    let mut grown = Vec::with_capacity(body.len() + path.len());
    let mut head = body[0];
    let mut prefix = Vec::with_capacity(path.len());
    for dir in path {
        head = dir.apply(&head);
        prefix.push(head);
    }
    grown.extend(prefix.into_iter().rev());
    grown.extend_from_slice(body);
    grown
}

fn post_consumption_space(grid: &Grid, grown: &[Cell], food: Cell) -> usize {
    let in_grid: Vec<Cell> = grown[1..]
        .iter()
        .copied()
        .filter(|c| grid.in_bounds(c))
        .collect();
    let obstacles = Obstacles::from_cells(grid, &in_grid);
    reachable_space(grid, food, &obstacles)
}
