//! Aggregate statistics across a set of players.

use super::{rank_by, Metric};
use crate::models::{CareerStats, Player};

/// Aggregate of a counting stat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountSummary {
    pub average: f64,
    pub max: u32,
    pub min: u32,
    pub leader: Option<String>,
}

/// Aggregate of a rate stat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSummary {
    pub average: f64,
    pub max: f64,
    pub leader: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub total_players: usize,
    pub home_runs: CountSummary,
    pub batting_avg: RateSummary,
    pub ops: RateSummary,
    pub stolen_bases: CountSummary,
}

fn leader(players: &[Player], metric: Metric) -> Option<String> {
    rank_by(players, metric, 1, |p| CareerStats::from_raw(p.stats))
        .ok()
        .and_then(|board| board.entries.first().map(|e| e.item.name.clone()))
}

fn count_summary(players: &[Player], metric: Metric, field: fn(&Player) -> u32) -> CountSummary {
    let values: Vec<u32> = players.iter().map(field).collect();
    if values.is_empty() {
        return CountSummary::default();
    }

    let total: u64 = values.iter().map(|&v| v as u64).sum();
    CountSummary {
        average: total as f64 / values.len() as f64,
        max: values.iter().copied().max().unwrap_or(0),
        min: values.iter().copied().min().unwrap_or(0),
        leader: leader(players, metric),
    }
}

fn rate_summary(players: &[Player], derived: &[CareerStats], metric: Metric) -> RateSummary {
    if derived.is_empty() {
        return RateSummary::default();
    }

    let values: Vec<f64> = derived.iter().map(|s| metric.value(s)).collect();
    RateSummary {
        average: values.iter().sum::<f64>() / values.len() as f64,
        max: values.iter().copied().fold(f64::MIN, f64::max),
        leader: leader(players, metric),
    }
}

/// Summarize home runs, batting average, OPS and stolen bases.
///
/// Leaders are the first player (in input order) holding the maximum.
pub fn summarize(players: &[Player]) -> StatsSummary {
    let derived: Vec<CareerStats> = players
        .iter()
        .map(|p| CareerStats::from_raw(p.stats))
        .collect();

    StatsSummary {
        total_players: players.len(),
        home_runs: count_summary(players, Metric::HomeRuns, |p| p.stats.home_runs),
        batting_avg: rate_summary(players, &derived, Metric::BattingAvg),
        ops: rate_summary(players, &derived, Metric::Ops),
        stolen_bases: count_summary(players, Metric::StolenBases, |p| p.stats.stolen_bases),
    }
}
