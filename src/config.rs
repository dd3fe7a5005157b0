// Configuration module for reading TicTacToe.toml
// This module provides OOP-style configuration management for the game server

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::search::ExecutionStrategy;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub session: SessionConfig,
    pub debug: DebugConfig,
}

/// Search execution settings
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Score root actions concurrently when enough CPUs are available
    pub parallel_root: bool,
    pub min_cpus_for_parallel: usize,
}

impl SearchConfig {
    /// Root execution strategy for a machine with `num_cpus` worker threads
    pub(crate) fn root_strategy(&self, num_cpus: usize) -> ExecutionStrategy {
        if self.parallel_root && num_cpus >= self.min_cpus_for_parallel {
            ExecutionStrategy::ParallelRoot
        } else {
            ExecutionStrategy::Sequential
        }
    }
}

/// Session store settings
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Upper bound on live sessions held in memory
    pub max_sessions: usize,
}

/// Move log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TicTacToe.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from TicTacToe.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("TicTacToe.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in TicTacToe.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                parallel_root: true,
                min_cpus_for_parallel: 2,
            },
            session: SessionConfig {
                cookie_name: "tictactoe_session".to_string(),
                max_sessions: 10_000,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "tictactoe_moves.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load TicTacToe.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
