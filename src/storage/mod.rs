//! Filesystem persistence for player records.
//!
//! Players live in a single JSONL file under the data directory. Only
//! counting stats are stored; derived stats are recomputed on read.

mod jsonl;
mod players;

pub use jsonl::{JsonlReader, JsonlWriter};
pub use players::{NewPlayer, PlayerStore, UpsertOutcome};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid player record: {0}")]
    InvalidRecord(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join("players.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
