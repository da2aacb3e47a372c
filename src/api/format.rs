//! Response shapes and numeric formatting.
//!
//! The calculator returns unrounded `f64` values. Here rates become fixed
//! precision strings: three decimals for averages, percentages and ratios,
//! two for the power-speed number. Counts stay integers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculate::{Comparison, Metric, Winner};
use crate::models::{CareerStats, Player, PlayerId, RawStats};

fn fixed(value: f64, places: usize) -> String {
    let s = format!("{:.*}", places, value);
    // "-0.000" reads as a sign error in a table
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Three-decimal rate, e.g. `0.300`.
pub fn rate(value: f64) -> String {
    fixed(value, 3)
}

pub fn two_places(value: f64) -> String {
    fixed(value, 2)
}

/// Round for numeric (not string) output.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A metric value as it appears in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Decimal(String),
}

impl MetricValue {
    pub fn of(metric: Metric, value: f64) -> Self {
        if metric.is_count() {
            MetricValue::Count(value.round() as i64)
        } else if metric == Metric::PowerSpeedNumber {
            MetricValue::Decimal(two_places(value))
        } else {
            MetricValue::Decimal(rate(value))
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Decimal(s) => f.pad(s),
        }
    }
}

/// Counting stats plus formatted derived stats.
#[derive(Debug, Clone, Serialize)]
pub struct CareerStatsView {
    #[serde(flatten)]
    pub raw: RawStats,
    pub singles: i64,
    pub total_bases: u64,
    pub extra_base_hits: u64,
    pub plate_appearances: u64,
    pub batting_avg: String,
    pub on_base_pct: String,
    pub slugging_pct: String,
    pub ops: String,
    pub isolated_power: String,
    pub walk_to_strikeout_ratio: String,
    pub stolen_base_pct: String,
    pub home_run_rate: String,
    pub power_speed_number: String,
    pub hits_per_game: String,
}

impl From<&CareerStats> for CareerStatsView {
    fn from(stats: &CareerStats) -> Self {
        let d = &stats.derived;
        Self {
            raw: stats.raw,
            singles: d.singles,
            total_bases: d.total_bases,
            extra_base_hits: d.extra_base_hits,
            plate_appearances: d.plate_appearances,
            batting_avg: rate(d.batting_avg),
            on_base_pct: rate(d.on_base_pct),
            slugging_pct: rate(d.slugging_pct),
            ops: rate(d.ops),
            isolated_power: rate(d.isolated_power),
            walk_to_strikeout_ratio: rate(d.walk_to_strikeout_ratio),
            stolen_base_pct: rate(d.stolen_base_pct),
            home_run_rate: rate(d.home_run_rate),
            power_speed_number: two_places(d.power_speed_number),
            hits_per_game: rate(d.hits_per_game),
        }
    }
}

/// Full player payload.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDetail {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    pub position_display: String,
    pub description: Option<String>,
    pub career_stats: CareerStatsView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Player> for PlayerDetail {
    fn from(player: &Player) -> Self {
        let stats = CareerStats::from_raw(player.stats);
        Self {
            id: player.id,
            name: player.name.clone(),
            position: player.position.code().to_string(),
            position_display: player.position.display_name().to_string(),
            description: player.description.clone(),
            career_stats: CareerStatsView::from(&stats),
            created_at: player.created_at,
            updated_at: player.updated_at,
        }
    }
}

/// Lightweight row for lists and leaderboards.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    pub position_display: String,
    pub home_runs: u32,
    pub batting_avg: String,
    pub ops: String,
    pub hits_per_game: String,
}

impl From<&Player> for PlayerRow {
    fn from(player: &Player) -> Self {
        let stats = CareerStats::from_raw(player.stats);
        Self {
            id: player.id,
            name: player.name.clone(),
            position: player.position.code().to_string(),
            position_display: player.position.display_name().to_string(),
            home_runs: player.stats.home_runs,
            batting_avg: rate(stats.derived.batting_avg),
            ops: rate(stats.derived.ops),
            hits_per_game: rate(stats.derived.hits_per_game),
        }
    }
}

/// One compared metric as it appears in a response.
#[derive(Debug, Clone, Serialize)]
pub struct MetricComparisonView {
    pub player1: MetricValue,
    pub player2: MetricValue,
    pub difference: MetricValue,
    pub winner: Winner,
}

impl MetricComparisonView {
    fn of(comparison: &Comparison, metric: Metric) -> Self {
        let result = comparison.get(metric);
        Self {
            player1: MetricValue::of(metric, result.player1),
            player2: MetricValue::of(metric, result.player2),
            difference: MetricValue::of(metric, result.difference),
            winner: result.winner,
        }
    }
}

/// Comparison keyed by metric, in [`Metric::ALL`] order.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub home_runs: MetricComparisonView,
    pub batting_avg: MetricComparisonView,
    pub ops: MetricComparisonView,
    pub stolen_bases: MetricComparisonView,
    pub power_speed_number: MetricComparisonView,
    pub walks_vs_strikeouts: MetricComparisonView,
}

impl From<&Comparison> for ComparisonView {
    fn from(comparison: &Comparison) -> Self {
        Self {
            home_runs: MetricComparisonView::of(comparison, Metric::HomeRuns),
            batting_avg: MetricComparisonView::of(comparison, Metric::BattingAvg),
            ops: MetricComparisonView::of(comparison, Metric::Ops),
            stolen_bases: MetricComparisonView::of(comparison, Metric::StolenBases),
            power_speed_number: MetricComparisonView::of(comparison, Metric::PowerSpeedNumber),
            walks_vs_strikeouts: MetricComparisonView::of(
                comparison,
                Metric::WalkToStrikeoutRatio,
            ),
        }
    }
}
