// Debug logging module for asynchronous match logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the request/response cycle. Every init and turn is written as one JSONL line,
// which the replay tool can later feed back through a fresh session.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{InitRequest, MovesRequest, MovesResponse};

/// What happened in a logged host call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    Init { request: InitRequest },
    Turn {
        request: MovesRequest,
        response: MovesResponse,
    },
}

impl LogEvent {
    pub fn match_id(&self) -> &str {
        match self {
            LogEvent::Init { request } => &request.match_id,
            LogEvent::Turn { request, .. } => &request.match_id,
        }
    }
}

/// Represents a single debug log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(flatten)]
    pub event: LogEvent,
    pub timestamp: String,
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a match start (fire-and-forget)
    pub fn log_init(&self, request: InitRequest) {
        self.log_event(LogEvent::Init { request });
    }

    /// Logs a turn's request and the moves returned (fire-and-forget)
    pub fn log_turn(&self, request: MovesRequest, response: MovesResponse) {
        self.log_event(LogEvent::Turn { request, response });
    }

    /// Spawns a tokio task that writes the event without blocking the caller
    fn log_event(&self, event: LogEvent) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, event).await;
        });
    }

    /// Performs the actual file write
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, event: LogEvent) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            let entry = LogEntry {
                event,
                timestamp: chrono::Utc::now().to_rfc3339(),
            };

            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }

    /// Writes an event and waits for it to hit the file
    pub async fn log_event_now(&self, event: LogEvent) {
        if self.enabled {
            Self::write_entry(self.file.clone(), event).await;
        }
    }
}
