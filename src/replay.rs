// Replay module for re-checking logged AI decisions
//
// This module provides functionality to:
// 1. Parse JSONL move logs
// 2. Re-run the search on each logged board
// 3. Compare logged vs replayed moves
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::search::Engine;
use crate::types::Action;

/// Result of replaying a single logged decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub ply: usize,
    pub original_move: Action,
    pub replayed_move: Action,
    pub matches: bool,
    /// Minimax value of the replayed move, from X's perspective
    pub value: i32,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_moves: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing move logs
pub struct ReplayEngine {
    engine: Engine,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        let strategy = config
            .search
            .root_strategy(rayon::current_num_threads());

        ReplayEngine {
            engine: Engine::new(strategy),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

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
            info!("Replaying ply {}...", entry.ply);
        }

        let start_time = Instant::now();
        let decision = self
            .engine
            .search(&entry.board)
            .map_err(|e| format!("Ply {}: {}", entry.ply, e))?;
        let computation_time = start_time.elapsed().as_millis();

        let matches = decision.action == entry.chosen_move;

        let result = ReplayResult {
            ply: entry.ply,
            original_move: entry.chosen_move,
            replayed_move: decision.action,
            matches,
            value: decision.value,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Ply {}: ✓ MATCH - {} (value: {}, time: {}ms)",
                    entry.ply, decision.action, decision.value, computation_time
                );
            } else {
                warn!(
                    "Ply {}: ✗ MISMATCH - Original: {}, Replayed: {} (value: {}, time: {}ms)",
                    entry.ply, entry.chosen_move, decision.action, decision.value, computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries; entries that fail to replay are logged and skipped
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay ply {}: {}", entry.ply, e);
                }
            }
        }

        results
    }

    /// Replays every entry logged at one of the given plies
    pub fn replay_plies(
        &self,
        entries: &[LogEntry],
        plies: &[usize],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for ply in plies {
            let selected: Vec<&LogEntry> = entries.iter().filter(|e| e.ply == *ply).collect();
            if selected.is_empty() {
                return Err(format!("Ply {} not found in log file", ply));
            }

            for entry in selected {
                match self.replay_entry(entry) {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        warn!("Failed to replay ply {}: {}", ply, e);
                    }
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_moves = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_moves - matches;
        let match_rate = if total_moves > 0 {
            (matches as f64 / total_moves as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_moves,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Moves:    {}", stats.total_moves);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
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
                    "Ply {}: {} → {} (value: {}, time: {}ms)",
                    result.ply,
                    result.original_move,
                    result.replayed_move,
                    result.value,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that the logged move at each ply is one of the acceptable ones
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(usize, Vec<Action>)], // (ply, acceptable_moves)
    ) -> Result<(), String> {
        for (ply, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.ply == *ply)
                .ok_or_else(|| format!("Ply {} not found in log", ply))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(format!(
                    "Ply {}: Expected one of [{}], but got {}",
                    ply,
                    acceptable
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                    entry.chosen_move
                ));
            }
        }

        Ok(())
    }

    /// Parses an action written as "row,col"
    pub fn parse_action(s: &str) -> Result<Action, String> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 {
            return Err(format!("Invalid action '{}'. Expected 'row,col'", s));
        }

        let row = parts[0]
            .parse::<usize>()
            .map_err(|e| format!("Invalid row '{}': {}", parts[0], e))?;
        let col = parts[1]
            .parse::<usize>()
            .map_err(|e| format!("Invalid col '{}': {}", parts[1], e))?;

        let action = Action::new(row, col);
        if !action.in_bounds() {
            return Err(format!("Action '{}' is outside the board", s));
        }

        Ok(action)
    }
}
