// Service wrapper around the arbiter
//
// The HTTP layer shares one Bot between requests. The arbiter itself is
// single-threaded state, so every access goes through one mutex; decisions
// run on tokio's blocking pool because tree search is CPU-bound.

use log::info;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::arbiter::{Arbiter, Decision};
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::types::{GameRequest, MoveRequest};
use crate::weights::AlgorithmTable;

pub struct Bot {
    config: Config,
    arbiter: Arc<Mutex<Arbiter>>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Self::with_logger(config, DebugLogger::disabled())
    }

    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        let arbiter = Arbiter::new(config.clone());
        Bot {
            config,
            arbiter: Arc::new(Mutex::new(arbiter)),
            logger,
        }
    }

    /// Returns engine metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "ksiopiolosz-aterlo",
            "grid": {
                "width": self.config.grid.width,
                "height": self.config.grid.height,
                "cell_size": self.config.grid.cell_size,
            },
            "weights": self.weights(),
        })
    }

    /// Called when a game starts. Weights carry over between games.
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &GameRequest) {
        info!("GAME START {}", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &GameRequest) {
        info!("GAME OVER {} (score: {})", game.id, game.score);
    }

    /// Computes the move for one tick
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `Result<Decision, String>` - The decision, or why the request was unusable
    pub async fn get_move(&self, request: &MoveRequest) -> Result<Decision, String> {
        let start_time = Instant::now();
        let snapshot = request.to_snapshot(&self.config.grid())?;

        let arbiter = self.arbiter.clone();
        let task_snapshot = snapshot.clone();
        let decision = tokio::task::spawn_blocking(move || arbiter.lock().decide(&task_snapshot))
            .await
            .map_err(|e| format!("Decision task failed: {}", e))?;

        info!(
            "Turn {}: Chose {} via {} (time: {}ms)",
            request.turn,
            decision.direction,
            decision.diagnostics.chosen_algorithm,
            start_time.elapsed().as_millis()
        );

        self.logger
            .log_decision(request.turn, snapshot, decision.clone());

        Ok(decision)
    }

    /// Feeds a tick's non-neutral outcome back into the arbiter
    /// Corresponds to POST /outcome endpoint
    pub fn report_outcome(&self, positive: bool) {
        self.arbiter.lock().report_outcome(positive);
    }

    pub fn weights(&self) -> AlgorithmTable {
        self.arbiter.lock().weights()
    }
}
