//! Leaderboard ranking.

use super::{Fraction, Metric, StatsError};
use crate::models::CareerStats;

/// One row of a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a, T> {
    /// 1-based position on the board
    pub rank: usize,
    pub value: f64,
    pub item: &'a T,
}

/// Ranked rows together with the metric they were ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard<'a, T> {
    pub metric: Metric,
    pub entries: Vec<RankedEntry<'a, T>>,
}

/// Rank `items` by a metric given by name.
///
/// Fails with [`StatsError::UnknownMetric`] for a name outside
/// [`Metric::ALL`] and [`StatsError::InvalidLimit`] when `limit <= 0`.
pub fn rank<'a, T, F>(
    items: &'a [T],
    metric: &str,
    limit: i64,
    stats_of: F,
) -> Result<Leaderboard<'a, T>, StatsError>
where
    F: Fn(&T) -> CareerStats,
{
    let metric: Metric = metric.parse()?;
    rank_by(items, metric, limit, stats_of)
}

/// Rank `items` by `metric`, descending, keeping the top `limit`.
///
/// Values are ordered as exact fractions. Ties keep their input order.
pub fn rank_by<'a, T, F>(
    items: &'a [T],
    metric: Metric,
    limit: i64,
    stats_of: F,
) -> Result<Leaderboard<'a, T>, StatsError>
where
    F: Fn(&T) -> CareerStats,
{
    if limit <= 0 {
        return Err(StatsError::InvalidLimit(limit));
    }
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    let mut scored: Vec<(Fraction, f64, &'a T)> = items
        .iter()
        .map(|item| {
            let stats = stats_of(item);
            (metric.exact(&stats.raw), metric.value(&stats), item)
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(i, (_, value, item))| RankedEntry {
            rank: i + 1,
            value,
            item,
        })
        .collect();

    Ok(Leaderboard { metric, entries })
}
