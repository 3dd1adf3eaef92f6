// Core value types shared by every strategy
//
// Grid coordinates grow rightwards (x = column) and downwards (y = row),
// matching the screen layout of the live game.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Grid;

/// Discrete grid coordinate: `x` is the column, `y` is the row
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Point in continuous game space (pixels in the live game)
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Represents the four possible movement directions
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in the fixed enumeration order used for tie-breaking
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a direction name, case-insensitively
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// The 180° reversal of this direction
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Calculates the next cell when moving in this direction
    pub fn apply(&self, cell: &Cell) -> Cell {
        match self {
            Direction::Up => Cell { x: cell.x, y: cell.y - 1 },
            Direction::Down => Cell { x: cell.x, y: cell.y + 1 },
            Direction::Left => Cell { x: cell.x - 1, y: cell.y },
            Direction::Right => Cell { x: cell.x + 1, y: cell.y },
        }
    }

    /// Direction leading from `from` to an orthogonally adjacent `to`
    pub fn between(from: &Cell, to: &Cell) -> Option<Direction> {
        Direction::all()
            .iter()
            .copied()
            .find(|dir| dir.apply(from) == *to)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a move-proposal strategy
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    PathSearch,
    SpaceFallback,
    Survival,
    TreeSearch,
}

impl Algorithm {
    /// All algorithms in arbitration comparison order
    pub fn all() -> [Algorithm; 4] {
        [
            Algorithm::PathSearch,
            Algorithm::SpaceFallback,
            Algorithm::Survival,
            Algorithm::TreeSearch,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Algorithm::PathSearch => 0,
            Algorithm::SpaceFallback => 1,
            Algorithm::Survival => 2,
            Algorithm::TreeSearch => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::PathSearch => "PATH_SEARCH",
            Algorithm::SpaceFallback => "SPACE_FALLBACK",
            Algorithm::Survival => "SURVIVAL",
            Algorithm::TreeSearch => "TREE_SEARCH",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable view of the game for one decision
///
/// Strategies only read a snapshot. Simulated futures are explicit clones.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake body, head first
    pub body: Vec<Cell>,
    pub food: Cell,
    pub facing: Direction,
}

impl Snapshot {
    /// Creates a snapshot; panics on an empty body
    pub fn new(body: Vec<Cell>, food: Cell, facing: Direction) -> Self {
        assert!(!body.is_empty(), "snake body must contain at least one cell");
        Snapshot { body, food, facing }
    }

    pub fn head(&self) -> Cell {
        assert!(!self.body.is_empty(), "snake body must contain at least one cell");
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// POST /move body: positions are in continuous game space
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MoveRequest {
    pub turn: u64,
    /// Segment positions, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
}

impl MoveRequest {
    /// Converts the request into a snapshot on `grid`, rejecting off-grid or empty bodies
    pub fn to_snapshot(&self, grid: &Grid) -> Result<Snapshot, String> {
        if self.snake.is_empty() {
            return Err("Snake must contain at least one segment".to_string());
        }
        let body: Vec<Cell> = self.snake.iter().map(|p| grid.to_cell(*p)).collect();
        if let Some(cell) = body.iter().find(|c| !grid.in_bounds(c)) {
            return Err(format!("Segment ({}, {}) lies outside the grid", cell.x, cell.y));
        }
        let food = grid.to_cell(self.food);
        if !grid.in_bounds(&food) {
            return Err(format!("Food ({}, {}) lies outside the grid", food.x, food.y));
        }
        Ok(Snapshot::new(body, food, self.direction))
    }
}

/// POST /outcome body
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct OutcomeRequest {
    pub positive: bool,
}

/// POST /start and POST /end body
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameRequest {
    pub id: String,
    #[serde(default)]
    pub score: u32,
}
