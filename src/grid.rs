// Grid geometry and obstacle masks

use crate::types::{Cell, Direction, Position};

/// Fixed-size discrete board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    /// Size of one cell in continuous game space
    pub cell_size: f64,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: f64) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        assert!(cell_size > 0.0, "cell size must be positive");
        Grid {
            width,
            height,
            cell_size,
        }
    }

    /// Converts a game-space position into its cell (floor division by cell size)
    pub fn to_cell(&self, position: Position) -> Cell {
        Cell {
            x: (position.x / self.cell_size).floor() as i32,
            y: (position.y / self.cell_size).floor() as i32,
        }
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Number of cells on the board
    pub fn cardinality(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Row-major index of an in-bounds cell
    pub fn index(&self, cell: &Cell) -> usize {
        debug_assert!(self.in_bounds(cell));
        (cell.y * self.width + cell.x) as usize
    }

    /// The four neighbours of a cell labelled by direction, in enumeration order.
    /// Neighbours may lie outside the grid.
    pub fn neighbors(&self, cell: &Cell) -> [(Direction, Cell); 4] {
        let dirs = Direction::all();
        [
            (dirs[0], dirs[0].apply(cell)),
            (dirs[1], dirs[1].apply(cell)),
            (dirs[2], dirs[2].apply(cell)),
            (dirs[3], dirs[3].apply(cell)),
        ]
    }
}

/// Occupancy mask of blocked cells
#[derive(Debug, Clone)]
pub struct Obstacles {
    width: i32,
    blocked: Vec<bool>,
}

impl Obstacles {
    pub fn empty(grid: &Grid) -> Self {
        Obstacles {
            width: grid.width,
            blocked: vec![false; grid.cardinality()],
        }
    }

    /// Builds a mask from cells; every cell must lie inside the grid
    pub fn from_cells<'a, I>(grid: &Grid, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut obstacles = Obstacles::empty(grid);
        for cell in cells {
            assert!(
                grid.in_bounds(cell),
                "obstacle ({}, {}) lies outside the {}x{} grid",
                cell.x,
                cell.y,
                grid.width,
                grid.height
            );
            obstacles.insert(grid, cell);
        }
        obstacles
    }

    pub fn insert(&mut self, grid: &Grid, cell: &Cell) {
        let idx = grid.index(cell);
        self.blocked[idx] = true;
    }

    /// True when the (in-bounds) cell is blocked
    pub fn contains(&self, cell: &Cell) -> bool {
        self.blocked[(cell.y * self.width + cell.x) as usize]
    }

    pub fn count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_floor_divides() {
        let grid = Grid::new(32, 24, 20.0);
        assert_eq!(grid.to_cell(Position { x: 0.0, y: 0.0 }), Cell::new(0, 0));
        assert_eq!(grid.to_cell(Position { x: 39.9, y: 20.0 }), Cell::new(1, 1));
        assert_eq!(grid.to_cell(Position { x: 320.0, y: 240.0 }), Cell::new(16, 12));
        assert_eq!(grid.to_cell(Position { x: -20.0, y: 5.0 }), Cell::new(-1, 0));
    }

    #[test]
    fn test_in_bounds_edges() {
        let grid = Grid::new(10, 8, 1.0);
        assert!(grid.in_bounds(&Cell::new(0, 0)));
        assert!(grid.in_bounds(&Cell::new(9, 7)));
        assert!(!grid.in_bounds(&Cell::new(10, 0)));
        assert!(!grid.in_bounds(&Cell::new(0, 8)));
        assert!(!grid.in_bounds(&Cell::new(-1, 3)));
    }

    #[test]
    fn test_neighbors_enumeration_order() {
        let grid = Grid::new(10, 10, 1.0);
        let n = grid.neighbors(&Cell::new(3, 3));
        assert_eq!(n[0], (Direction::Up, Cell::new(3, 2)));
        assert_eq!(n[1], (Direction::Down, Cell::new(3, 4)));
        assert_eq!(n[2], (Direction::Left, Cell::new(2, 3)));
        assert_eq!(n[3], (Direction::Right, Cell::new(4, 3)));
    }

    #[test]
    fn test_obstacles_mask() {
        let grid = Grid::new(4, 4, 1.0);
        let cells = vec![Cell::new(1, 1), Cell::new(3, 0)];
        let obstacles = Obstacles::from_cells(&grid, &cells);
        assert!(obstacles.contains(&Cell::new(1, 1)));
        assert!(obstacles.contains(&Cell::new(3, 0)));
        assert!(!obstacles.contains(&Cell::new(0, 0)));
        assert_eq!(obstacles.count(), 2);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_obstacle_panics() {
        let grid = Grid::new(4, 4, 1.0);
        let cells = vec![Cell::new(4, 0)];
        Obstacles::from_cells(&grid, &cells);
    }
}
