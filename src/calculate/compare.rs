//! Head-to-head player comparison.

use std::cmp::Ordering;

use serde::Serialize;

use super::Metric;
use crate::models::CareerStats;

/// Which side of a comparison came out ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player1,
    Player2,
    Tie,
}

impl Winner {
    /// Winner implied by how player1's value orders against player2's.
    pub fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Winner::Player1,
            Ordering::Less => Winner::Player2,
            Ordering::Equal => Winner::Tie,
        }
    }

    /// The same outcome seen from the other side.
    pub fn swapped(self) -> Self {
        match self {
            Winner::Player1 => Winner::Player2,
            Winner::Player2 => Winner::Player1,
            Winner::Tie => Winner::Tie,
        }
    }
}

/// One metric compared between two players.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonResult {
    pub metric: Metric,
    pub player1: f64,
    pub player2: f64,
    /// `player1 - player2`, exactly zero on a tie
    pub difference: f64,
    pub winner: Winner,
}

impl ComparisonResult {
    fn new(metric: Metric, player1: &CareerStats, player2: &CareerStats) -> Self {
        let winner =
            Winner::from_ordering(metric.exact(&player1.raw).cmp(&metric.exact(&player2.raw)));
        let (value1, value2) = (metric.value(player1), metric.value(player2));
        let difference = match winner {
            Winner::Tie => 0.0,
            _ => value1 - value2,
        };
        Self {
            metric,
            player1: value1,
            player2: value2,
            difference,
            winner,
        }
    }
}

/// Results for every compared metric, in [`Metric::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    results: [ComparisonResult; 6],
}

impl Comparison {
    pub fn get(&self, metric: Metric) -> &ComparisonResult {
        &self.results[metric.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter()
    }

    /// Number of metrics won by each side, as (player1, player2, ties).
    pub fn tally(&self) -> (usize, usize, usize) {
        self.results
            .iter()
            .fold((0, 0, 0), |(p1, p2, tie), r| match r.winner {
                Winner::Player1 => (p1 + 1, p2, tie),
                Winner::Player2 => (p1, p2 + 1, tie),
                Winner::Tie => (p1, p2, tie + 1),
            })
    }
}

/// Compare two players on the fixed metric set.
pub fn compare(player1: &CareerStats, player2: &CareerStats) -> Comparison {
    Comparison {
        results: Metric::ALL.map(|metric| ComparisonResult::new(metric, player1, player2)),
    }
}
