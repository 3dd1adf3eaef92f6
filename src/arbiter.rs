// Arbitration controller
//
// Each tick every strategy proposes a raw confidence score, the scores are
// multiplied by the learned weights and the strongest strategy produces the
// move. The external loop later reports whether that move paid off, which
// nudges the winner's weight up or down.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::cycle::CoverageCycle;
use crate::grid::Grid;
use crate::mcts;
use crate::pathfinding::find_path;
use crate::rules::{Rules, Transition};
use crate::safety::is_path_safe;
use crate::space::space_from_head;
use crate::survival::survival_move;
use crate::types::{Algorithm, Direction, Snapshot};
use crate::weights::{AlgorithmTable, WeightTable};

/// Everything the external loop may want to display about a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub chosen_algorithm: Algorithm,
    /// Raw (unweighted) scores
    pub scores: AlgorithmTable,
    pub weights: AlgorithmTable,
    pub available_space: usize,
    pub body_length: usize,
}

/// Output of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(rename = "move")]
    pub direction: Direction,
    /// Full path to the food when path search won
    pub path: Option<Vec<Direction>>,
    pub diagnostics: Diagnostics,
}

/// Raw scores gathered before weighting
#[derive(Debug, Clone)]
pub struct Proposals {
    pub scores: AlgorithmTable,
    /// Safe path to the food, when one exists
    pub path: Option<Vec<Direction>>,
    pub available_space: usize,
}

/// Owns the weight table and the cached coverage cycle for the process lifetime
pub struct Arbiter<T: Transition = Rules> {
    config: Config,
    transition: T,
    cycle: CoverageCycle,
    weights: WeightTable,
    last_choice: Option<Algorithm>,
    rng: StdRng,
}

impl Arbiter<Rules> {
    /// Creates an arbiter using the stock rules derived from `config`
    pub fn new(config: Config) -> Self {
        let rules = config.rules();
        Self::with_transition(config, rules)
    }
}

impl<T: Transition> Arbiter<T> {
    pub fn with_transition(config: Config, transition: T) -> Self {
        let cycle = CoverageCycle::new(transition.grid());
        let weights = WeightTable::from_config(&config.weights);
        let rng = match config.tree_search.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Arbiter {
            config,
            transition,
            cycle,
            weights,
            last_choice: None,
            rng,
        }
    }

    /// Replaces the weights, e.g. with values recorded in a decision log
    pub fn with_weights(mut self, weights: AlgorithmTable) -> Self {
        self.weights = WeightTable::restore(&self.config.weights, weights);
        self
    }

    pub fn weights(&self) -> AlgorithmTable {
        self.weights.values()
    }

    /// Algorithm that produced the most recent move
    pub fn last_choice(&self) -> Option<Algorithm> {
        self.last_choice
    }

    pub fn grid(&self) -> &Grid {
        self.transition.grid()
    }

    pub fn cycle(&self) -> &CoverageCycle {
        &self.cycle
    }

    /// Scores every strategy for `snapshot` without producing a move
    pub fn propose(&self, snapshot: &Snapshot) -> Proposals {
        let grid = *self.transition.grid();
        let body = &snapshot.body;
        let scores_config = &self.config.scores;
        let mut scores = AlgorithmTable::filled(0.0);

        // An empty path means the head already sits on the food: nothing to plan
        let mut safe_path = None;
        if let Some(path) = find_path(&grid, body, snapshot.food).filter(|p| !p.is_empty()) {
            if is_path_safe(
                &grid,
                body,
                snapshot.food,
                &path,
                self.config.safety.path_space_margin,
            ) {
                scores.set(Algorithm::PathSearch, scores_config.path_search);
                safe_path = Some(path);
            } else {
                scores.set(Algorithm::PathSearch, scores_config.path_rejected);
            }
        }

        let available_space = space_from_head(&grid, body);
        if available_space < body.len() + self.config.safety.space_fallback_margin {
            scores.set(Algorithm::SpaceFallback, scores_config.space_fallback);
        }

        if self.config.tree_search.enabled
            && scores.get(Algorithm::PathSearch) <= 0.0
            && scores.get(Algorithm::SpaceFallback) == 0.0
        {
            scores.set(Algorithm::TreeSearch, scores_config.tree_search);
        }

        scores.set(Algorithm::Survival, scores_config.survival);

        Proposals {
            scores,
            path: safe_path,
            available_space,
        }
    }

    /// Picks the strategy with the strictly greatest weighted score.
    /// Survival is the default, so it keeps the tick when nothing scores above zero.
    pub fn arbitrate(&self, scores: &AlgorithmTable) -> Algorithm {
        let mut best = Algorithm::Survival;
        let mut best_score = 0.0;
        for (alg, raw) in scores.iter() {
            let weighted = raw * self.weights.get(alg);
            if weighted > best_score {
                best = alg;
                best_score = weighted;
            }
        }
        best
    }

    /// Chooses the move for this tick
    pub fn decide(&mut self, snapshot: &Snapshot) -> Decision {
        let proposals = self.propose(snapshot);
        debug!(
            "Scores: path={} space={} survival={} tree={} (space {}, length {})",
            proposals.scores.get(Algorithm::PathSearch),
            proposals.scores.get(Algorithm::SpaceFallback),
            proposals.scores.get(Algorithm::Survival),
            proposals.scores.get(Algorithm::TreeSearch),
            proposals.available_space,
            snapshot.len()
        );

        let chosen = self.arbitrate(&proposals.scores);
        let grid = *self.transition.grid();
        let (direction, path) = match (chosen, proposals.path) {
            (Algorithm::PathSearch, Some(path)) => (path[0], Some(path)),
            (Algorithm::SpaceFallback, _) => (self.cycle.direction_at(&snapshot.head()), None),
            (Algorithm::TreeSearch, _) => (
                mcts::search(
                    &self.transition,
                    snapshot,
                    &self.config.tree_search,
                    &mut self.rng,
                ),
                None,
            ),
            _ => (survival_move(&grid, &snapshot.body, snapshot.facing), None),
        };

        self.last_choice = Some(chosen);
        info!(
            "Chose {} via {} (space: {}, length: {})",
            direction,
            chosen,
            proposals.available_space,
            snapshot.len()
        );

        Decision {
            direction,
            path,
            diagnostics: Diagnostics {
                chosen_algorithm: chosen,
                scores: proposals.scores,
                weights: self.weights.values(),
                available_space: proposals.available_space,
                body_length: snapshot.len(),
            },
        }
    }

    /// Feeds a tick's outcome back into the weight of the algorithm that chose its move.
    /// Call only for ticks with a non-zero reward.
    pub fn report_outcome(&mut self, was_positive: bool) {
        match self.last_choice {
            Some(alg) => self.weights.update(alg, was_positive),
            None => debug!("Outcome reported before any decision, ignoring"),
        }
    }
}
