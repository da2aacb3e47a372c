//! Player identity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerId, RawStats};

/// Fielding position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "P")]
    Pitcher,
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    Shortstop,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "OF")]
    Outfield,
    #[serde(rename = "DH")]
    DesignatedHitter,
}

impl Position {
    pub const ALL: [Position; 11] = [
        Position::Pitcher,
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::Shortstop,
        Position::LeftField,
        Position::CenterField,
        Position::RightField,
        Position::Outfield,
        Position::DesignatedHitter,
    ];

    /// Short scorebook code (e.g. "SS").
    pub fn code(&self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::Shortstop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::Outfield => "OF",
            Position::DesignatedHitter => "DH",
        }
    }

    /// Human-readable name (e.g. "Shortstop").
    pub fn display_name(&self) -> &'static str {
        match self {
            Position::Pitcher => "Pitcher",
            Position::Catcher => "Catcher",
            Position::FirstBase => "First Base",
            Position::SecondBase => "Second Base",
            Position::ThirdBase => "Third Base",
            Position::Shortstop => "Shortstop",
            Position::LeftField => "Left Field",
            Position::CenterField => "Center Field",
            Position::RightField => "Right Field",
            Position::Outfield => "Outfield",
            Position::DesignatedHitter => "Designated Hitter",
        }
    }

    /// Parse a position code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A player together with their stored career counting stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Unique display name
    pub name: String,

    pub position: Position,

    pub description: Option<String>,

    /// Career counting stats; the only stats that are persisted
    pub stats: RawStats,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Create a new Player stamped with the current time.
    pub fn new(id: PlayerId, name: String, position: Position, stats: RawStats) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            position,
            description: None,
            stats,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// Mark the record as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.position)
    }
}
