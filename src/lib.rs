// Library exports for the decision engine
// This allows the replay tool and other utilities to use the core engine logic

pub mod arbiter;
pub mod bot;
pub mod config;
pub mod cycle;
pub mod debug_logger;
pub mod grid;
pub mod mcts;
pub mod pathfinding;
pub mod replay;
pub mod rules;
pub mod safety;
pub mod space;
pub mod survival;
pub mod types;
pub mod weights;
