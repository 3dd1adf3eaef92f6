// Greedy survival: one-step lookahead scored by the space left afterwards

use log::debug;

use crate::grid::{Grid, Obstacles};
use crate::rules::hits_body;
use crate::space::reachable_space;
use crate::types::{Cell, Direction};

/// Picks the non-reversing move that leaves the most reachable space.
///
/// Candidates that leave the grid or hit the body (the tail excepted) are
/// skipped. Ties go to the earlier direction in enumeration order. When every
/// candidate is fatal the current facing is returned unchanged.
pub fn survival_move(grid: &Grid, body: &[Cell], facing: Direction) -> Direction {
    assert!(!body.is_empty(), "snake body must contain at least one cell");
    let head = body[0];
    let reverse = facing.opposite();

    let mut best: Option<(Direction, usize)> = None;
    for dir in Direction::all().iter().copied().filter(|d| *d != reverse) {
        let next = dir.apply(&head);
        if !grid.in_bounds(&next) || hits_body(&next, body) {
            continue;
        }

        // new head + body without its tail; the head itself does not block
        let remaining = &body[..body.len() - 1];
        let obstacles = Obstacles::from_cells(grid, remaining);
        let space = reachable_space(grid, next, &obstacles);

        match best {
            Some((_, best_space)) if space <= best_space => {}
            _ => best = Some((dir, space)),
        }
    }

    match best {
        Some((dir, space)) => {
            debug!("Survival picked {} with space {}", dir, space);
            dir
        }
        None => {
            debug!("Survival found no safe move, keeping {}", facing);
            facing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_open_side() {
        // Vertical wall of body at x = 3; head just right of it going down
        let grid = Grid::new(10, 6, 1.0);
        let body: Vec<Cell> = vec![
            Cell::new(4, 2),
            Cell::new(4, 1),
            Cell::new(3, 1),
            Cell::new(3, 2),
            Cell::new(3, 3),
            Cell::new(3, 4),
            Cell::new(3, 5),
        ];
        let dir = survival_move(&grid, &body, Direction::Down);
        // Left is blocked by the body, Down and Right both reach the open side
        assert_ne!(dir, Direction::Left);
        assert_ne!(dir, Direction::Up);
    }

    #[test]
    fn test_single_safe_move_is_taken() {
        let grid = Grid::new(6, 3, 1.0);
        let body = vec![
            Cell::new(2, 0),
            Cell::new(3, 0),
            Cell::new(3, 1),
            Cell::new(2, 1),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ];
        // Up is wall, Down is body, Right is the reversal
        let dir = survival_move(&grid, &body, Direction::Left);
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_ties_follow_enumeration_order() {
        let grid = Grid::new(9, 9, 1.0);
        let body = vec![Cell::new(4, 4)];
        // Up, Down, Left all leave the whole board open; Right is the reversal
        assert_eq!(survival_move(&grid, &body, Direction::Left), Direction::Up);
    }

    #[test]
    fn test_trapped_snake_keeps_facing() {
        let grid = Grid::new(3, 3, 1.0);
        let body = vec![
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(0, 0),
        ];
        // Left onto the vacating tail leaves 1 cell, Right leaves 5
        assert_eq!(survival_move(&grid, &body, Direction::Up), Direction::Right);

        let boxed = vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 1),
            Cell::new(1, 0),
            Cell::new(2, 0),
        ];
        // Head in the corner facing up: Up and Left are walls, Right is body
        assert_eq!(survival_move(&grid, &boxed, Direction::Up), Direction::Up);
    }
}
