//! Rankable and comparable metrics.

use std::str::FromStr;

use serde::Serialize;

use super::exact::{self, Fraction};
use super::StatsError;
use crate::models::{CareerStats, RawStats};

/// A statistic that players can be ranked or compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    HomeRuns,
    BattingAvg,
    Ops,
    StolenBases,
    PowerSpeedNumber,
    WalkToStrikeoutRatio,
}

impl Metric {
    /// Every supported metric, in comparison order.
    pub const ALL: [Metric; 6] = [
        Metric::HomeRuns,
        Metric::BattingAvg,
        Metric::Ops,
        Metric::StolenBases,
        Metric::PowerSpeedNumber,
        Metric::WalkToStrikeoutRatio,
    ];

    /// Name accepted by the leaderboard.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::HomeRuns => "home_runs",
            Metric::BattingAvg => "batting_avg",
            Metric::Ops => "ops",
            Metric::StolenBases => "stolen_bases",
            Metric::PowerSpeedNumber => "power_speed_number",
            Metric::WalkToStrikeoutRatio => "walk_to_strikeout_ratio",
        }
    }

    /// Key used in comparison output.
    pub fn comparison_key(&self) -> &'static str {
        match self {
            Metric::WalkToStrikeoutRatio => "walks_vs_strikeouts",
            other => other.name(),
        }
    }

    /// Position in [`Metric::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether the metric is a plain count rather than a rate.
    pub fn is_count(&self) -> bool {
        matches!(self, Metric::HomeRuns | Metric::StolenBases)
    }

    /// Read this metric from a player's stats.
    pub fn value(&self, stats: &CareerStats) -> f64 {
        match self {
            Metric::HomeRuns => stats.raw.home_runs as f64,
            Metric::BattingAvg => stats.derived.batting_avg,
            Metric::Ops => stats.derived.ops,
            Metric::StolenBases => stats.raw.stolen_bases as f64,
            Metric::PowerSpeedNumber => stats.derived.power_speed_number,
            Metric::WalkToStrikeoutRatio => stats.derived.walk_to_strikeout_ratio,
        }
    }

    /// The metric as an exact fraction, for ordering.
    pub fn exact(&self, raw: &RawStats) -> Fraction {
        match self {
            Metric::HomeRuns => Fraction::whole(raw.home_runs),
            Metric::BattingAvg => exact::batting_avg(raw),
            Metric::Ops => exact::ops(raw),
            Metric::StolenBases => Fraction::whole(raw.stolen_bases),
            Metric::PowerSpeedNumber => exact::power_speed_number(raw),
            Metric::WalkToStrikeoutRatio => exact::walk_to_strikeout_ratio(raw),
        }
    }
}

impl FromStr for Metric {
    type Err = StatsError;

    /// Exact name match; there is no fallback metric.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| StatsError::UnknownMetric(s.to_string()))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
