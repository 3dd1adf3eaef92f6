// Pure state transition shared by the safety replay and the tree search
//
// The live game owns the real board; everything here works on copies.

use crate::grid::Grid;
use crate::types::{Cell, Direction, Snapshot};

/// Result of simulating one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Snake survived; `reward` is positive when food was eaten, zero otherwise
    Alive { state: Snapshot, reward: f64 },
    /// Snake hit a wall or itself
    Dead { reward: f64 },
}

impl Step {
    pub fn reward(&self) -> f64 {
        match self {
            Step::Alive { reward, .. } => *reward,
            Step::Dead { reward } => *reward,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Dead { .. })
    }
}

/// The game's transition function. Must have no side effects on the real game.
pub trait Transition {
    fn simulate_step(&self, state: &Snapshot, direction: Direction) -> Step;

    fn grid(&self) -> &Grid;
}

/// Stock snake rules: walls and self-collision kill, food grows the body
#[derive(Debug, Clone)]
pub struct Rules {
    pub grid: Grid,
    pub food_reward: f64,
    pub collision_penalty: f64,
}

impl Rules {
    pub fn new(grid: Grid, food_reward: f64, collision_penalty: f64) -> Self {
        Rules {
            grid,
            food_reward,
            collision_penalty,
        }
    }
}

impl Transition for Rules {
    fn simulate_step(&self, state: &Snapshot, direction: Direction) -> Step {
        let head = state.head();
        let next = direction.apply(&head);

        if !self.grid.in_bounds(&next) || hits_body(&next, &state.body) {
            return Step::Dead {
                reward: self.collision_penalty,
            };
        }

        let mut body = Vec::with_capacity(state.body.len() + 1);
        body.push(next);
        body.extend_from_slice(&state.body);

        let reward = if next == state.food {
            self.food_reward
        } else {
            body.pop();
            0.0
        };

        Step::Alive {
            state: Snapshot {
                body,
                food: state.food,
                facing: direction,
            },
            reward,
        }
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// True when `cell` is occupied by any segment except the tail, which vacates this tick
pub fn hits_body(cell: &Cell, body: &[Cell]) -> bool {
    let check_len = body.len().saturating_sub(1);
    body[..check_len].contains(cell)
}

/// Moves that do not reverse and are not immediately fatal, in enumeration order
pub fn legal_moves(grid: &Grid, state: &Snapshot) -> Vec<Direction> {
    let head = state.head();
    let reverse = if state.body.len() > 1 {
        Some(state.facing.opposite())
    } else {
        None
    };

    Direction::all()
        .iter()
        .copied()
        .filter(|dir| Some(*dir) != reverse)
        .filter(|dir| {
            let next = dir.apply(&head);
            grid.in_bounds(&next) && !hits_body(&next, &state.body)
        })
        .collect()
}
