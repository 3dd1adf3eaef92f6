//! Monte Carlo tree search over simulated futures
//!
//! The tree lives in an arena: nodes are addressed by index, each node owns
//! the indices of its children and keeps its parent's index only for
//! backpropagation. A fresh tree is built for every decision and dropped
//! afterwards.

use log::debug;
use rand::Rng;

use crate::config::TreeSearchConfig;
use crate::rules::{legal_moves, Step, Transition};
use crate::types::{Direction, Snapshot};

const ROOT: usize = 0;

#[derive(Debug)]
struct Node {
    state: Snapshot,
    parent: Option<usize>,
    /// Move that led here from the parent
    incoming: Option<Direction>,
    children: Vec<usize>,
    visits: u32,
    total_reward: f64,
    untried: Vec<Direction>,
}

impl Node {
    fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }
}

/// Per-invocation search tree
pub struct TreeSearch<'a, T: Transition> {
    transition: &'a T,
    config: &'a TreeSearchConfig,
    nodes: Vec<Node>,
}

impl<'a, T: Transition> TreeSearch<'a, T> {
    pub fn new(transition: &'a T, config: &'a TreeSearchConfig, root: &Snapshot) -> Self {
        let untried = legal_moves(transition.grid(), root);
        let nodes = vec![Node {
            state: root.clone(),
            parent: None,
            incoming: None,
            children: Vec::new(),
            visits: 0,
            total_reward: 0.0,
            untried,
        }];
        TreeSearch {
            transition,
            config,
            nodes,
        }
    }

    /// Runs the configured number of simulations and returns the most visited first move
    pub fn run<R: Rng>(mut self, rng: &mut R) -> Direction {
        for _ in 0..self.config.simulations {
            self.simulate(rng);
        }

        let best = self.nodes[ROOT]
            .children
            .iter()
            .map(|&idx| &self.nodes[idx])
            .max_by_key(|child| child.visits);

        match best.and_then(|child| child.incoming) {
            Some(dir) => {
                debug!(
                    "Tree search: {} nodes, root visits {}, chose {} ({:.2} mean)",
                    self.nodes.len(),
                    self.nodes[ROOT].visits,
                    dir,
                    best.map(|c| c.mean()).unwrap_or(0.0)
                );
                dir
            }
            None => {
                let root = &self.nodes[ROOT].state;
                let fallback = legal_moves(self.transition.grid(), root)
                    .first()
                    .copied()
                    .unwrap_or(root.facing);
                debug!("Tree search expanded nothing, falling back to {}", fallback);
                fallback
            }
        }
    }

    fn simulate<R: Rng>(&mut self, rng: &mut R) {
        let mut node = self.select(ROOT);

        let mut reward = 0.0;
        let mut finished = false;
        if !self.nodes[node].untried.is_empty() {
            let pick = rng.random_range(0..self.nodes[node].untried.len());
            let mv = self.nodes[node].untried.swap_remove(pick);
            match self.transition.simulate_step(&self.nodes[node].state, mv) {
                Step::Dead { reward: r } => {
                    reward += r;
                    finished = true;
                }
                Step::Alive { state, reward: r } => {
                    reward += r;
                    node = self.expand(node, mv, state);
                }
            }
        }

        if !finished {
            reward += self.rollout(node, rng);
        }

        self.backpropagate(node, reward);
    }

    /// Descends through fully expanded nodes by upper confidence bound
    fn select(&self, mut node: usize) -> usize {
        while self.nodes[node].untried.is_empty() && !self.nodes[node].children.is_empty() {
            let log_parent = (self.nodes[node].visits.max(1) as f64).ln();
            let mut best = self.nodes[node].children[0];
            let mut best_value = f64::NEG_INFINITY;
            for &child in &self.nodes[node].children {
                let value = self.ucb(child, log_parent);
                if value > best_value {
                    best_value = value;
                    best = child;
                }
            }
            node = best;
        }
        node
    }

    fn ucb(&self, child: usize, log_parent: f64) -> f64 {
        let node = &self.nodes[child];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let visits = node.visits as f64;
        node.total_reward / visits + self.config.exploration_constant * (log_parent / visits).sqrt()
    }

    fn expand(&mut self, parent: usize, mv: Direction, state: Snapshot) -> usize {
        let untried = legal_moves(self.transition.grid(), &state);
        let idx = self.nodes.len();
        self.nodes.push(Node {
            state,
            parent: Some(parent),
            incoming: Some(mv),
            children: Vec::new(),
            visits: 0,
            total_reward: 0.0,
            untried,
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Random playout from `node`, capped at the configured depth
    fn rollout<R: Rng>(&self, node: usize, rng: &mut R) -> f64 {
        let grid = self.transition.grid();
        let mut state = self.nodes[node].state.clone();
        let mut total = 0.0;

        for _ in 0..self.config.rollout_depth {
            let moves = legal_moves(grid, &state);
            if moves.is_empty() {
                total += self.config.trapped_penalty;
                break;
            }
            let mv = moves[rng.random_range(0..moves.len())];
            match self.transition.simulate_step(&state, mv) {
                Step::Dead { reward } => {
                    total += reward;
                    break;
                }
                Step::Alive {
                    state: next,
                    reward,
                } => {
                    total += reward;
                    state = next;
                }
            }
        }

        total
    }

    fn backpropagate(&mut self, mut node: usize, reward: f64) {
        loop {
            let current = &mut self.nodes[node];
            current.visits += 1;
            current.total_reward += reward;
            match current.parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
    }
}

/// Convenience wrapper: build a tree for `root` and search it
pub fn search<T: Transition, R: Rng>(
    transition: &T,
    root: &Snapshot,
    config: &TreeSearchConfig,
    rng: &mut R,
) -> Direction {
    TreeSearch::new(transition, config, root).run(rng)
}
