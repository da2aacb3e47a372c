//! Bulk player import.
//!
//! Reads a JSON array of player records (from a file or a remote feed) and
//! upserts them into the store by name. The feed's column names are the
//! spreadsheet-style headers used by the public career stats dump.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Position, RawStats, RawStatsUpdate};
use crate::storage::{NewPlayer, PlayerStore, StorageError, UpsertOutcome};

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid feed format: {0}")]
    InvalidFormat(String),
}

const NAME: &str = "Player name";
const POSITION: &str = "position";
const CAUGHT_STEALING: &str = "Caught stealing";

/// Feed header for each counting field, except caught stealing.
const COUNT_COLUMNS: [(&str, &str); 11] = [
    ("games", "Games"),
    ("at_bats", "At-bat"),
    ("runs", "Runs"),
    ("hits", "Hits"),
    ("doubles", "Double (2B)"),
    ("triples", "third baseman"),
    ("home_runs", "home run"),
    ("rbis", "run batted in"),
    ("walks", "a walk"),
    ("strikeouts", "Strikeouts"),
    ("stolen_bases", "stolen base"),
];

/// Outcome counts of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    /// Records without a name
    pub skipped: usize,
    /// Records with unreadable values
    pub failed: usize,
    /// Players removed by `--clear` before importing
    pub cleared: usize,
}

/// Records parsed out of a feed.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub players: Vec<NewPlayer>,
    pub skipped: usize,
    pub failed: usize,
}

/// Read an integer that may be encoded as a number or a numeric string.
fn count_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Parse one feed record. `Ok(None)` means the record has no name.
fn parse_record(idx: usize, record: &Value) -> Result<Option<NewPlayer>, String> {
    let Some(obj) = record.as_object() else {
        return Err(format!("record {} is not an object", idx));
    };

    let name = obj
        .get(NAME)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() {
        return Ok(None);
    }

    let position = obj
        .get(POSITION)
        .and_then(Value::as_str)
        .and_then(Position::from_code)
        .unwrap_or(Position::Outfield);

    let mut update = RawStatsUpdate::new();
    for (field, column) in COUNT_COLUMNS {
        let value = match obj.get(column) {
            None | Some(Value::Null) => 0,
            Some(v) => count_value(v)
                .ok_or_else(|| format!("{}: unreadable '{}' value {}", name, column, v))?,
        };
        update = update.with(field, value);
    }

    // "--" marks an unrecorded value
    let caught_stealing = match obj.get(CAUGHT_STEALING) {
        None | Some(Value::Null) => 0,
        Some(Value::String(s)) if s.trim() == "--" || s.trim().is_empty() => 0,
        Some(v) => count_value(v).unwrap_or(0),
    };
    update = update.with("caught_stealing", caught_stealing);
    let stats = RawStats::default().apply(&update);

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(Some(NewPlayer {
        name: name.to_string(),
        position,
        description,
        stats,
    }))
}

/// Parse a feed document. The top level must be an array.
pub fn parse_feed(doc: &Value) -> Result<ParsedFeed, IngestError> {
    let records = doc
        .as_array()
        .ok_or_else(|| IngestError::InvalidFormat("expected a JSON array of players".to_string()))?;

    let mut parsed = ParsedFeed::default();
    for (idx, record) in records.iter().enumerate() {
        match parse_record(idx + 1, record) {
            Ok(Some(player)) => parsed.players.push(player),
            Ok(None) => {
                warn!("[{}/{}] Skipping player with no name", idx + 1, records.len());
                parsed.skipped += 1;
            }
            Err(e) => {
                warn!("[{}/{}] Failed to read record: {}", idx + 1, records.len(), e);
                parsed.failed += 1;
            }
        }
    }

    Ok(parsed)
}

/// Load a feed document from disk.
pub fn read_feed_file(path: &Path) -> Result<Value, IngestError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Fetch a feed document over HTTP.
pub async fn fetch_feed(url: &str, timeout: Duration) -> Result<Value, IngestError> {
    info!("Fetching player feed from {}", url);

    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("baseball-stats/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let doc = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await?;

    Ok(doc)
}

/// Upsert every readable record of `doc` into the store. With `clear`, the
/// feed replaces the whole roster in one write.
pub async fn import_feed(
    store: &PlayerStore,
    doc: &Value,
    clear: bool,
) -> Result<ImportReport, IngestError> {
    let parsed = parse_feed(doc)?;

    let mut report = ImportReport {
        skipped: parsed.skipped,
        failed: parsed.failed,
        ..Default::default()
    };

    let outcomes = if clear {
        let (cleared, outcomes) = store.replace_all(parsed.players).await?;
        report.cleared = cleared;
        outcomes
    } else {
        store.upsert_batch(parsed.players).await?
    };

    for outcome in outcomes {
        match outcome {
            UpsertOutcome::Created(_) => report.created += 1,
            UpsertOutcome::Updated(_) => report.updated += 1,
        }
    }

    info!(
        "Import complete: created={} updated={} skipped={} failed={}",
        report.created, report.updated, report.skipped, report.failed
    );
    Ok(report)
}
