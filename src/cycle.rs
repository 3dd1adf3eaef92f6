// Full-coverage cycle: a serpentine tour that visits every cell once
//
// Layout for an even number of rows (x grows right, y grows down):
//
//   > > > > > v
//   ^ v < < < <
//   ^ > > > > v
//   ^ < < < < <
//
// The first row runs the full width, the remaining rows snake across
// columns 1.., and column 0 carries the tour back to the start. With an odd
// number of rows but an even number of columns the same layout is used on
// the transposed board. When both dimensions are odd no closed tour exists;
// the serpentine is then left open and its last cell has no successor.

use log::warn;

use crate::grid::Grid;
use crate::types::{Cell, Direction};

/// Precomputed tour, built once per grid geometry
#[derive(Debug, Clone)]
pub struct CoverageCycle {
    grid: Grid,
    order: Vec<Cell>,
    next: Vec<Option<Direction>>,
    closed: bool,
}

impl CoverageCycle {
    pub fn new(grid: &Grid) -> Self {
        let (order, closed) = if grid.height % 2 == 0 && grid.width >= 2 {
            (Self::row_tour(grid.width, grid.height), true)
        } else if grid.width % 2 == 0 && grid.height >= 2 {
            let transposed = Self::row_tour(grid.height, grid.width);
            (
                transposed.into_iter().map(|c| Cell::new(c.y, c.x)).collect(),
                true,
            )
        } else {
            warn!(
                "No closed coverage cycle exists on a {}x{} grid, using an open sweep",
                grid.width, grid.height
            );
            (Self::open_sweep(grid.width, grid.height), false)
        };

        let mut next = vec![None; grid.cardinality()];
        let steps = if closed { order.len() } else { order.len().saturating_sub(1) };
        for i in 0..steps {
            let from = order[i];
            let to = order[(i + 1) % order.len()];
            next[grid.index(&from)] = Direction::between(&from, &to);
        }

        CoverageCycle {
            grid: *grid,
            order,
            next,
            closed,
        }
    }

    /// Tour for an even `height`, `width >= 2`
    fn row_tour(width: i32, height: i32) -> Vec<Cell> {
        let mut order = Vec::with_capacity((width * height) as usize);
        for x in 0..width {
            order.push(Cell::new(x, 0));
        }
        for y in 1..height {
            if y % 2 == 1 {
                for x in (1..width).rev() {
                    order.push(Cell::new(x, y));
                }
            } else {
                for x in 1..width {
                    order.push(Cell::new(x, y));
                }
            }
        }
        for y in (1..height).rev() {
            order.push(Cell::new(0, y));
        }
        order
    }

    fn open_sweep(width: i32, height: i32) -> Vec<Cell> {
        let mut order = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            if y % 2 == 0 {
                for x in 0..width {
                    order.push(Cell::new(x, y));
                }
            } else {
                for x in (0..width).rev() {
                    order.push(Cell::new(x, y));
                }
            }
        }
        order
    }

    /// Direction the tour prescribes from `cell`; `Up` when the cell is not on the tour
    pub fn direction_at(&self, cell: &Cell) -> Direction {
        if !self.grid.in_bounds(cell) {
            return Direction::Up;
        }
        self.next[self.grid.index(cell)].unwrap_or(Direction::Up)
    }

    /// Cells in tour order, starting at (0, 0)
    pub fn order(&self) -> &[Cell] {
        &self.order
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_valid_cycle(width: i32, height: i32) {
        let grid = Grid::new(width, height, 1.0);
        let cycle = CoverageCycle::new(&grid);
        assert!(cycle.is_closed());

        let unique: HashSet<Cell> = cycle.order().iter().copied().collect();
        assert_eq!(unique.len(), grid.cardinality());
        assert_eq!(cycle.order().len(), grid.cardinality());

        // Walking the lookup table from any cell returns to it after visiting everything
        let start = Cell::new(0, 0);
        let mut cell = start;
        let mut seen = HashSet::new();
        for _ in 0..grid.cardinality() {
            assert!(grid.in_bounds(&cell));
            assert!(seen.insert(cell), "revisited {:?}", cell);
            cell = cycle.direction_at(&cell).apply(&cell);
        }
        assert_eq!(cell, start);
    }

    #[test]
    fn test_even_height_grids_form_cycles() {
        for &(w, h) in &[(2, 2), (2, 6), (3, 4), (10, 10), (32, 24), (7, 8)] {
            assert_valid_cycle(w, h);
        }
    }

    #[test]
    fn test_odd_height_even_width_uses_transposed_tour() {
        assert_valid_cycle(4, 3);
        assert_valid_cycle(6, 5);
    }

    #[test]
    fn test_first_row_runs_right() {
        let grid = Grid::new(6, 4, 1.0);
        let cycle = CoverageCycle::new(&grid);
        assert_eq!(cycle.direction_at(&Cell::new(0, 0)), Direction::Right);
        assert_eq!(cycle.direction_at(&Cell::new(5, 0)), Direction::Down);
        assert_eq!(cycle.direction_at(&Cell::new(0, 3)), Direction::Up);
        assert_eq!(cycle.direction_at(&Cell::new(1, 3)), Direction::Left);
    }

    #[test]
    fn test_odd_by_odd_grid_is_open() {
        let grid = Grid::new(5, 5, 1.0);
        let cycle = CoverageCycle::new(&grid);
        assert!(!cycle.is_closed());
        assert_eq!(cycle.order().len(), 25);
        // Final cell of the sweep has no successor
        assert_eq!(cycle.direction_at(&Cell::new(4, 4)), Direction::Up);
        assert_eq!(cycle.direction_at(&Cell::new(0, 0)), Direction::Right);
    }

    #[test]
    fn test_off_grid_lookup_defaults_up() {
        let grid = Grid::new(4, 4, 1.0);
        let cycle = CoverageCycle::new(&grid);
        assert_eq!(cycle.direction_at(&Cell::new(-1, 9)), Direction::Up);
    }
}
