//! Statistics calculation engine.
//!
//! Computes derived metrics from stored counting stats:
//! - Rate and ratio stats (AVG, OBP, SLG, OPS, ISO, BB/K, SB%, HR rate)
//! - Player-vs-player comparison per metric
//! - Leaderboard ranking
//! - Aggregate summaries, statistical profiles and Hall of Fame screening
//!
//! Everything here is a pure function over its inputs.

pub mod compare;
pub mod exact;
pub mod leaderboard;
pub mod metric;
pub mod profile;
pub mod summary;

pub use compare::{compare, Comparison, ComparisonResult, Winner};
pub use exact::Fraction;
pub use leaderboard::{rank, rank_by, Leaderboard, RankedEntry};
pub use metric::Metric;
pub use profile::{hall_of_fame, profile, Classification, HallOfFame, StatProfile};
pub use summary::{summarize, CountSummary, RateSummary, StatsSummary};

use thiserror::Error;

use crate::models::{DerivedStats, PlayerId, RawStats};

/// Errors surfaced by ranking and comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Invalid limit: {0} (must be a positive integer)")]
    InvalidLimit(i64),

    #[error("Player not found: {0}")]
    MissingPlayer(PlayerId),
}

/// Ratio with a zero-denominator guard.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Compute every derived stat from a player's counting stats.
///
/// Total for any input: zero denominators yield 0, except the walk to
/// strikeout ratio which yields the walk count when there are no strikeouts.
pub fn compute(raw: &RawStats) -> DerivedStats {
    let hits = raw.hits as u64;
    let doubles = raw.doubles as u64;
    let triples = raw.triples as u64;
    let home_runs = raw.home_runs as u64;
    let at_bats = raw.at_bats as u64;
    let walks = raw.walks as u64;
    let stolen_bases = raw.stolen_bases as u64;

    let extra_base_hits = doubles + triples + home_runs;
    let singles = hits as i64 - extra_base_hits as i64;
    let total_bases = hits + doubles + 2 * triples + 3 * home_runs;
    let plate_appearances = at_bats + walks;

    let batting_avg = ratio(hits, at_bats);
    let on_base_pct = ratio(hits + walks, plate_appearances);
    let slugging_pct = ratio(total_bases, at_bats);

    let walk_to_strikeout_ratio = if raw.strikeouts == 0 {
        walks as f64
    } else {
        walks as f64 / raw.strikeouts as f64
    };

    let power_speed_number = if home_runs + stolen_bases == 0 {
        0.0
    } else {
        2.0 * home_runs as f64 * stolen_bases as f64 / (home_runs + stolen_bases) as f64
    };

    DerivedStats {
        singles,
        total_bases,
        extra_base_hits,
        plate_appearances,
        batting_avg,
        on_base_pct,
        slugging_pct,
        ops: exact::ops(raw).to_f64(),
        isolated_power: slugging_pct - batting_avg,
        walk_to_strikeout_ratio,
        stolen_base_pct: ratio(stolen_bases, stolen_bases + raw.caught_stealing as u64),
        home_run_rate: ratio(home_runs, at_bats),
        power_speed_number,
        hits_per_game: ratio(hits, raw.games as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample() -> RawStats {
        RawStats {
            games: 150,
            at_bats: 500,
            runs: 90,
            hits: 150,
            doubles: 30,
            triples: 2,
            home_runs: 20,
            rbis: 85,
            walks: 50,
            strikeouts: 100,
            stolen_bases: 10,
            caught_stealing: 2,
        }
    }

    #[test]
    fn test_compute_full_line() {
        let d = compute(&sample());

        assert_eq!(d.total_bases, 244);
        assert_eq!(d.singles, 98);
        assert_eq!(d.extra_base_hits, 52);
        assert_eq!(d.plate_appearances, 550);
        assert!(approx(d.batting_avg, 0.3));
        assert!(approx(d.slugging_pct, 0.488));
        assert!(approx(d.on_base_pct, 200.0 / 550.0));
        assert!(approx(d.ops, 200.0 / 550.0 + 0.488));
        assert!((d.ops - 0.8516).abs() < 1e-4);
        assert!(approx(d.isolated_power, 0.188));
        assert!(approx(d.walk_to_strikeout_ratio, 0.5));
        assert!(approx(d.stolen_base_pct, 10.0 / 12.0));
        assert!(approx(d.home_run_rate, 0.04));
        assert!(approx(d.power_speed_number, 400.0 / 30.0));
        assert!(approx(d.hits_per_game, 1.0));
    }

    #[test]
    fn test_compute_all_zero() {
        let d = compute(&RawStats::default());

        assert_eq!(d.total_bases, 0);
        assert_eq!(d.singles, 0);
        assert_eq!(d.batting_avg, 0.0);
        assert_eq!(d.on_base_pct, 0.0);
        assert_eq!(d.slugging_pct, 0.0);
        assert_eq!(d.ops, 0.0);
        assert_eq!(d.isolated_power, 0.0);
        assert_eq!(d.walk_to_strikeout_ratio, 0.0);
        assert_eq!(d.stolen_base_pct, 0.0);
        assert_eq!(d.home_run_rate, 0.0);
        assert_eq!(d.power_speed_number, 0.0);
        assert_eq!(d.hits_per_game, 0.0);
    }

    #[test]
    fn test_zero_at_bats_ops_equals_obp() {
        let raw = RawStats {
            walks: 7,
            games: 3,
            ..Default::default()
        };
        let d = compute(&raw);

        assert_eq!(d.batting_avg, 0.0);
        assert_eq!(d.slugging_pct, 0.0);
        assert_eq!(d.home_run_rate, 0.0);
        assert_eq!(d.on_base_pct, 1.0);
        assert_eq!(d.ops, d.on_base_pct);
    }

    #[test]
    fn test_zero_at_bats_many_lines() {
        for walks in [0u32, 1, 5, 250] {
            for hits in [0u32, 3] {
                let raw = RawStats {
                    hits,
                    walks,
                    home_runs: hits.min(1),
                    ..Default::default()
                };
                let d = compute(&raw);
                assert_eq!(d.batting_avg, 0.0);
                assert_eq!(d.slugging_pct, 0.0);
                assert_eq!(d.home_run_rate, 0.0);
                assert_eq!(d.ops, d.on_base_pct);
            }
        }
    }

    #[test]
    fn test_equal_ops_from_different_lines_are_identical() {
        let walker = RawStats {
            at_bats: 1,
            walks: 5,
            ..Default::default()
        };
        let contact = RawStats {
            at_bats: 3,
            hits: 1,
            walks: 1,
            ..Default::default()
        };
        assert_eq!(compute(&walker).ops, compute(&contact).ops);
    }

    #[test]
    fn test_walk_to_strikeout_no_strikeouts_returns_walks() {
        let raw = RawStats {
            walks: 40,
            ..Default::default()
        };
        assert_eq!(compute(&raw).walk_to_strikeout_ratio, 40.0);
    }

    #[test]
    fn test_walk_to_strikeout_ratio() {
        let raw = RawStats {
            walks: 800,
            strikeouts: 1200,
            ..Default::default()
        };
        assert!(approx(compute(&raw).walk_to_strikeout_ratio, 2.0 / 3.0));
    }

    #[test]
    fn test_power_speed_number() {
        let raw = RawStats {
            home_runs: 600,
            stolen_bases: 300,
            ..Default::default()
        };
        assert!(approx(compute(&raw).power_speed_number, 400.0));

        let raw = RawStats {
            home_runs: 50,
            ..Default::default()
        };
        assert_eq!(compute(&raw).power_speed_number, 0.0);
    }

    #[test]
    fn test_stolen_base_pct_no_attempts() {
        let raw = RawStats {
            home_runs: 12,
            ..Default::default()
        };
        assert_eq!(compute(&raw).stolen_base_pct, 0.0);
    }

    #[test]
    fn test_stolen_base_pct_all_caught() {
        let raw = RawStats {
            caught_stealing: 4,
            ..Default::default()
        };
        assert_eq!(compute(&raw).stolen_base_pct, 0.0);
    }

    #[test]
    fn test_total_bases_identity() {
        let raw = RawStats {
            at_bats: 8399,
            hits: 2873,
            doubles: 506,
            triples: 136,
            home_runs: 714,
            ..Default::default()
        };
        let d = compute(&raw);
        assert_eq!(d.total_bases, 2873 + 506 + 2 * 136 + 3 * 714);
        assert_eq!(d.singles, 2873 - 506 - 136 - 714);
        assert!(approx(d.slugging_pct, d.total_bases as f64 / 8399.0));
    }

    #[test]
    fn test_singles_can_go_negative() {
        let raw = RawStats {
            hits: 1,
            home_runs: 3,
            at_bats: 10,
            ..Default::default()
        };
        assert_eq!(compute(&raw).singles, -2);
    }

    #[test]
    fn test_compute_large_values_do_not_overflow() {
        let raw = RawStats {
            games: u32::MAX,
            at_bats: u32::MAX,
            hits: u32::MAX,
            doubles: u32::MAX,
            triples: u32::MAX,
            home_runs: u32::MAX,
            walks: u32::MAX,
            strikeouts: u32::MAX,
            stolen_bases: u32::MAX,
            caught_stealing: u32::MAX,
            ..Default::default()
        };
        let d = compute(&raw);
        assert!(d.ops.is_finite());
        assert!((d.power_speed_number - u32::MAX as f64).abs() < 1.0);
    }

    #[test]
    fn test_stats_error_display() {
        assert_eq!(
            StatsError::UnknownMetric("wins".into()).to_string(),
            "Unknown metric: wins"
        );
        assert_eq!(
            StatsError::MissingPlayer(PlayerId::new(9)).to_string(),
            "Player not found: 9"
        );
    }
}
