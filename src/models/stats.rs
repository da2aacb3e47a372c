//! Counting and derived statistics models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised when validating a stats update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    #[error("Field '{field}' must be a whole number")]
    NotAnInteger { field: String },

    #[error("Field '{field}' is out of range")]
    OutOfRange { field: String },
}

/// Career counting statistics as observed and stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStats {
    pub games: u32,
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub rbis: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
}

impl RawStats {
    /// Names of the counting fields, in storage order.
    pub const FIELDS: [&'static str; 12] = [
        "games",
        "at_bats",
        "runs",
        "hits",
        "doubles",
        "triples",
        "home_runs",
        "rbis",
        "walks",
        "strikeouts",
        "stolen_bases",
        "caught_stealing",
    ];

    fn field_mut(&mut self, field: &str) -> Option<&mut u32> {
        let slot = match field {
            "games" => &mut self.games,
            "at_bats" => &mut self.at_bats,
            "runs" => &mut self.runs,
            "hits" => &mut self.hits,
            "doubles" => &mut self.doubles,
            "triples" => &mut self.triples,
            "home_runs" => &mut self.home_runs,
            "rbis" => &mut self.rbis,
            "walks" => &mut self.walks,
            "strikeouts" => &mut self.strikeouts,
            "stolen_bases" => &mut self.stolen_bases,
            "caught_stealing" => &mut self.caught_stealing,
            _ => return None,
        };
        Some(slot)
    }

    /// Return a copy with every field present in `update` replaced.
    pub fn apply(&self, update: &RawStatsUpdate) -> RawStats {
        let mut next = *self;
        for (field, value) in &update.fields {
            if let Some(slot) = next.field_mut(field) {
                *slot = *value;
            }
        }
        next
    }
}

/// A full or partial replacement of counting fields.
///
/// Only the twelve counting fields are accepted; anything else in the
/// request (including derived rates) is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStatsUpdate {
    fields: Vec<(&'static str, u32)>,
}

impl RawStatsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set one counting field. Unknown names are ignored.
    pub fn with(mut self, field: &str, value: u32) -> Self {
        if let Some(name) = RawStats::FIELDS.iter().find(|f| **f == field) {
            self.fields.retain(|(f, _)| f != name);
            self.fields.push((name, value));
        }
        self
    }

    /// Validate an update from a JSON object.
    ///
    /// Values may be integers or integer strings. Negative or fractional
    /// values are rejected.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut update = Self::new();
        for field in RawStats::FIELDS {
            let Some(value) = body.get(field) else {
                continue;
            };
            let parsed = parse_count(field, value)?;
            update.fields.push((field, parsed));
        }
        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the fields this update touches.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(f, _)| *f).collect()
    }
}

fn parse_count(field: &str, value: &Value) -> Result<u32, ValidationError> {
    let n: i64 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.as_u64().is_some() {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                });
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                    _ => {
                        return Err(ValidationError::NotAnInteger {
                            field: field.to_string(),
                        })
                    }
                }
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| ValidationError::NotAnInteger {
            field: field.to_string(),
        })?,
        _ => {
            return Err(ValidationError::NotAnInteger {
                field: field.to_string(),
            })
        }
    };

    if n < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: n,
        });
    }

    u32::try_from(n).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
    })
}

/// Statistics computed from [`RawStats`]. Never stored.
///
/// Rates are exact ratios (not rounded); formatting is left to the
/// serialization layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedStats {
    /// Can go negative if stored extra-base hits exceed hits
    pub singles: i64,
    pub total_bases: u64,
    pub extra_base_hits: u64,
    pub plate_appearances: u64,
    pub batting_avg: f64,
    pub on_base_pct: f64,
    pub slugging_pct: f64,
    pub ops: f64,
    pub isolated_power: f64,
    pub walk_to_strikeout_ratio: f64,
    /// Fraction of attempts (0.0 to 1.0)
    pub stolen_base_pct: f64,
    /// Home runs per at-bat
    pub home_run_rate: f64,
    pub power_speed_number: f64,
    pub hits_per_game: f64,
}

/// Raw stats paired with the derived stats computed from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CareerStats {
    pub raw: RawStats,
    pub derived: DerivedStats,
}

impl CareerStats {
    /// Compute the derived half from `raw`.
    pub fn from_raw(raw: RawStats) -> Self {
        Self {
            raw,
            derived: crate::calculate::compute(&raw),
        }
    }
}

impl From<RawStats> for CareerStats {
    fn from(raw: RawStats) -> Self {
        Self::from_raw(raw)
    }
}
