// Move logging module for asynchronous AI decision logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the request/response cycle. Each AI decision is written as one JSONL line
// that the replay tool can read back.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::board::Board;
use crate::types::Action;

/// Represents a single move log entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Number of marks on the board when the AI moved
    pub ply: usize,
    pub session: String,
    /// Board the AI searched, before its move
    pub board: Board,
    pub chosen_move: Action,
    pub timestamp: String,
}

impl LogEntry {
    /// Stamps a decision with the current UTC time
    pub fn new(session: &str, board: Board, chosen_move: Action) -> Self {
        LogEntry {
            ply: board.ply(),
            session: session.to_string(),
            board,
            chosen_move,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared move logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new move logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Move logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create move log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs an AI decision asynchronously (fire-and-forget)
    /// Must be called from within a tokio runtime
    pub fn log_move(&self, session: &str, board: Board, chosen_move: Action) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry::new(session, board, chosen_move);
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: LogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write move log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush move log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize move log entry: {}", e);
                }
            }
        }
    }
}
