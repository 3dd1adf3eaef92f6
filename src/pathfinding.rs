// Shortest-path planning from the snake's head to the food

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{Grid, Obstacles};
use crate::types::{Cell, Direction};

/// A* search over the grid treating the whole body as blocked.
///
/// Priority = steps taken + Manhattan distance to the goal. Equal priorities
/// pop in insertion order, and neighbours are pushed in direction enumeration
/// order, so the result is deterministic for identical inputs.
///
/// Returns the directions leading from the head to `food`, or `None` when the
/// food cannot be reached.
pub fn find_path(grid: &Grid, body: &[Cell], food: Cell) -> Option<Vec<Direction>> {
    assert!(!body.is_empty(), "snake body must contain at least one cell");
    let start = body[0];
    if start == food {
        return Some(Vec::new());
    }
    if !grid.in_bounds(&food) {
        return None;
    }

    let obstacles = Obstacles::from_cells(grid, body);
    let size = grid.cardinality();

    let mut best_cost = vec![u32::MAX; size];
    let mut came_from: Vec<Option<(usize, Direction)>> = vec![None; size];
    let mut closed = vec![false; size];

    let mut open = BinaryHeap::new();
    let mut sequence: u64 = 0;

    best_cost[grid.index(&start)] = 0;
    open.push(Reverse((start.manhattan(&food) as u32, sequence, start)));

    while let Some(Reverse((_, _, cell))) = open.pop() {
        let idx = grid.index(&cell);
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        if cell == food {
            return Some(reconstruct(grid, &came_from, start, food));
        }

        let cost = best_cost[idx] + 1;
        for (dir, next) in grid.neighbors(&cell).iter() {
            if !grid.in_bounds(next) || obstacles.contains(next) {
                continue;
            }
            let next_idx = grid.index(next);
            if closed[next_idx] || cost >= best_cost[next_idx] {
                continue;
            }
            best_cost[next_idx] = cost;
            came_from[next_idx] = Some((idx, *dir));
            sequence += 1;
            let priority = cost + next.manhattan(&food) as u32;
            open.push(Reverse((priority, sequence, *next)));
        }
    }

    None
}

fn reconstruct(
    grid: &Grid,
    came_from: &[Option<(usize, Direction)>],
    start: Cell,
    goal: Cell,
) -> Vec<Direction> {
    let start_idx = grid.index(&start);
    let mut path = Vec::new();
    let mut idx = grid.index(&goal);
    while idx != start_idx {
        match came_from[idx] {
            Some((parent, dir)) => {
                path.push(dir);
                idx = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Cells visited when following `path` from `start`, excluding `start`
pub fn trace(start: Cell, path: &[Direction]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(path.len());
    let mut current = start;
    for dir in path {
        current = dir.apply(&current);
        cells.push(current);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::VecDeque;

    fn bfs_distance(grid: &Grid, body: &[Cell], food: Cell) -> Option<usize> {
        let obstacles = Obstacles::from_cells(grid, body);
        let mut dist = vec![usize::MAX; grid.cardinality()];
        let mut queue = VecDeque::new();
        dist[grid.index(&body[0])] = 0;
        queue.push_back(body[0]);
        while let Some(cell) = queue.pop_front() {
            if cell == food {
                return Some(dist[grid.index(&cell)]);
            }
            for (_, next) in grid.neighbors(&cell).iter() {
                if grid.in_bounds(next)
                    && !obstacles.contains(next)
                    && dist[grid.index(next)] == usize::MAX
                {
                    dist[grid.index(next)] = dist[grid.index(&cell)] + 1;
                    queue.push_back(*next);
                }
            }
        }
        None
    }

    #[test]
    fn test_straight_path_up() {
        let grid = Grid::new(10, 10, 1.0);
        let body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        let path = find_path(&grid, &body, Cell::new(5, 2)).unwrap();
        assert_eq!(path, vec![Direction::Up, Direction::Up, Direction::Up]);
    }

    #[test]
    fn test_path_routes_around_body() {
        let grid = Grid::new(10, 10, 1.0);
        // Food directly behind the head: the body blocks the straight line
        let body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        let path = find_path(&grid, &body, Cell::new(2, 5)).unwrap();
        let cells = trace(body[0], &path);
        assert_eq!(*cells.last().unwrap(), Cell::new(2, 5));
        assert_eq!(path.len(), 5);
        assert!(cells.iter().all(|c| !body.contains(c)));
    }

    #[test]
    fn test_unreachable_food_returns_none() {
        let grid = Grid::new(10, 10, 1.0);
        let body = vec![Cell::new(2, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 1)];
        assert_eq!(find_path(&grid, &body, Cell::new(0, 0)), None);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let grid = Grid::new(10, 10, 1.0);
        let body = vec![Cell::new(1, 1), Cell::new(1, 2)];
        let a = find_path(&grid, &body, Cell::new(8, 7));
        let b = find_path(&grid, &body, Cell::new(8, 7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_length_matches_bfs_distance() {
        let grid = Grid::new(12, 9, 1.0);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let head = Cell::new(rng.random_range(0..grid.width), rng.random_range(0..grid.height));
            let mut body = vec![head];
            for _ in 0..rng.random_range(0..40) {
                let cell = Cell::new(
                    rng.random_range(0..grid.width),
                    rng.random_range(0..grid.height),
                );
                if !body.contains(&cell) {
                    body.push(cell);
                }
            }
            let food = loop {
                let cell = Cell::new(
                    rng.random_range(0..grid.width),
                    rng.random_range(0..grid.height),
                );
                if !body.contains(&cell) {
                    break cell;
                }
            };

            let expected = bfs_distance(&grid, &body, food);
            let path = find_path(&grid, &body, food);
            match (expected, path) {
                (Some(distance), Some(path)) => {
                    assert_eq!(path.len(), distance);
                    let cells = trace(head, &path);
                    assert_eq!(*cells.last().unwrap(), food);
                    assert!(cells.iter().all(|c| grid.in_bounds(c) && !body.contains(c)));
                }
                (None, None) => {}
                (expected, path) => panic!("bfs {:?} vs a* {:?}", expected, path),
            }
        }
    }
}
