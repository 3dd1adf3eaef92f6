// Replay module for analyzing logged decisions
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run arbitration on each logged snapshot with the weights in force at the time
// 3. Compare logged vs replayed moves and winning algorithms
// 4. Generate analysis reports

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::arbiter::Arbiter;
use crate::config::Config;
use crate::types::{Algorithm, Direction};

pub use crate::debug_logger::LogEntry;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u64,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub original_algorithm: Algorithm,
    pub replayed_algorithm: Algorithm,
    pub matches: bool,
    /// Tree search moves are sampled, so a mismatch there is expected
    pub stochastic: bool,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub stochastic_mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let grid = self.config.grid();
        let snapshot = &entry.snapshot;
        if snapshot.is_empty() {
            return Err(format!("Turn {}: snapshot has an empty body", entry.turn));
        }
        if let Some(cell) = snapshot
            .body
            .iter()
            .chain(std::iter::once(&snapshot.food))
            .find(|c| !grid.in_bounds(c))
        {
            return Err(format!(
                "Turn {}: cell ({}, {}) lies outside the configured {}x{} grid",
                entry.turn, cell.x, cell.y, grid.width, grid.height
            ));
        }

        let original_move = Direction::parse(&entry.chosen_move)?;
        let original_algorithm = entry.decision.diagnostics.chosen_algorithm;

        let start_time = Instant::now();
        let mut arbiter =
            Arbiter::new(self.config.clone()).with_weights(entry.decision.diagnostics.weights);
        let decision = arbiter.decide(snapshot);
        let computation_time = start_time.elapsed().as_millis();

        let replayed_algorithm = decision.diagnostics.chosen_algorithm;
        let matches = original_move == decision.direction && original_algorithm == replayed_algorithm;

        let result = ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move: decision.direction,
            original_algorithm,
            replayed_algorithm,
            matches,
            stochastic: original_algorithm == Algorithm::TreeSearch,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} via {} (time: {}ms)",
                    entry.turn, decision.direction, replayed_algorithm, computation_time
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {} via {}, Replayed: {} via {} (time: {}ms)",
                    entry.turn,
                    original_move,
                    original_algorithm,
                    decision.direction,
                    replayed_algorithm,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in parallel; entries that fail to replay are skipped
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let outcomes: Vec<(u64, Result<ReplayResult, String>)> = entries
            .par_iter()
            .map(|entry| (entry.turn, self.replay_entry(entry)))
            .collect();

        outcomes
            .into_iter()
            .filter_map(|(turn, outcome)| match outcome {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        let selected = turn_numbers
            .iter()
            .map(|turn_num| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn_num)
                    .cloned()
                    .ok_or_else(|| format!("Turn {} not found in log file", turn_num))
            })
            .collect::<Result<Vec<LogEntry>, String>>()?;

        Ok(self.replay_all(&selected))
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let stochastic_mismatches = results.iter().filter(|r| !r.matches && r.stochastic).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            stochastic_mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!(
            "Mismatches:     {} ({} from tree search)",
            stats.mismatches, stats.stochastic_mismatches
        );
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} via {} → {} via {}{}",
                    result.turn,
                    result.original_move,
                    result.original_algorithm,
                    result.replayed_move,
                    result.replayed_algorithm,
                    if result.stochastic { " (stochastic)" } else { "" }
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u64, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Direction::parse(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move
                ));
            }
        }

        Ok(())
    }
}
