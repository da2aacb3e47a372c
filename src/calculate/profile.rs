//! Statistical profiles and Hall of Fame screening.

use serde::Serialize;

use crate::models::{CareerStats, Player};

/// Notable statistical archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    #[serde(rename = "Elite Power-Speed")]
    ElitePowerSpeed,
    #[serde(rename = "Power Hitter")]
    PowerHitter,
    #[serde(rename = "Disciplined Hitter")]
    DisciplinedHitter,
    #[serde(rename = "Efficient Base Stealer")]
    EfficientBaseStealer,
    #[serde(rename = "Elite All-Around Hitter")]
    EliteAllAroundHitter,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::ElitePowerSpeed => "Elite Power-Speed",
            Classification::PowerHitter => "Power Hitter",
            Classification::DisciplinedHitter => "Disciplined Hitter",
            Classification::EfficientBaseStealer => "Efficient Base Stealer",
            Classification::EliteAllAroundHitter => "Elite All-Around Hitter",
        }
    }
}

/// Advanced metrics and archetypes for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct StatProfile {
    pub stats: CareerStats,
    pub classifications: Vec<Classification>,
}

/// Build the statistical profile of a player.
pub fn profile(stats: &CareerStats) -> StatProfile {
    let d = &stats.derived;
    let mut classifications = Vec::new();

    if d.power_speed_number > 200.0 {
        classifications.push(Classification::ElitePowerSpeed);
    }
    if d.isolated_power > 0.250 {
        classifications.push(Classification::PowerHitter);
    }
    if d.walk_to_strikeout_ratio > 1.0 {
        classifications.push(Classification::DisciplinedHitter);
    }
    if d.stolen_base_pct > 0.80 {
        classifications.push(Classification::EfficientBaseStealer);
    }
    if d.batting_avg > 0.300 && stats.raw.home_runs > 400 {
        classifications.push(Classification::EliteAllAroundHitter);
    }

    StatProfile {
        stats: *stats,
        classifications,
    }
}

/// Players meeting each Hall of Fame benchmark, in input order.
#[derive(Debug, Clone, Default)]
pub struct HallOfFame<'a> {
    /// 500+ home runs
    pub home_run_club: Vec<&'a Player>,
    /// 3000+ hits with a .300+ average
    pub hit_club: Vec<&'a Player>,
    /// .900+ OPS with 400+ home runs
    pub ops_club: Vec<&'a Player>,
}

/// Screen players against the Hall of Fame benchmarks.
pub fn hall_of_fame(players: &[Player]) -> HallOfFame<'_> {
    let mut hof = HallOfFame::default();

    for player in players {
        let stats = CareerStats::from_raw(player.stats);
        let raw = &stats.raw;
        let d = &stats.derived;

        if raw.home_runs >= 500 {
            hof.home_run_club.push(player);
        }
        if raw.hits >= 3000 && d.batting_avg >= 0.300 {
            hof.hit_club.push(player);
        }
        if d.ops >= 0.900 && raw.home_runs >= 400 {
            hof.ops_club.push(player);
        }
    }

    hof
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerId, Position, RawStats};

    fn player(id: u64, name: &str, raw: RawStats) -> Player {
        Player::new(PlayerId::new(id), name.to_string(), Position::Outfield, raw)
    }

    fn mays() -> RawStats {
        RawStats {
            games: 2992,
            at_bats: 10881,
            runs: 2062,
            hits: 3283,
            doubles: 523,
            triples: 140,
            home_runs: 660,
            rbis: 1903,
            walks: 1464,
            strikeouts: 1526,
            stolen_bases: 338,
            caught_stealing: 103,
        }
    }

    #[test]
    fn test_profile_power_speed_star() {
        let p = profile(&CareerStats::from_raw(mays()));

        // PSN 2*660*338/998 ≈ 447, ISO ≈ .255, AVG ≈ .302
        assert!(p.classifications.contains(&Classification::ElitePowerSpeed));
        assert!(p.classifications.contains(&Classification::PowerHitter));
        assert!(p.classifications.contains(&Classification::EliteAllAroundHitter));
        assert!(!p.classifications.contains(&Classification::DisciplinedHitter));
        assert!(!p.classifications.contains(&Classification::EfficientBaseStealer));
    }

    #[test]
    fn test_profile_base_stealer_and_discipline() {
        let raw = RawStats {
            at_bats: 1000,
            hits: 250,
            walks: 150,
            strikeouts: 100,
            stolen_bases: 90,
            caught_stealing: 10,
            ..Default::default()
        };
        let p = profile(&CareerStats::from_raw(raw));
        assert_eq!(
            p.classifications,
            vec![
                Classification::DisciplinedHitter,
                Classification::EfficientBaseStealer
            ]
        );
    }

    #[test]
    fn test_profile_empty_line_has_no_classifications() {
        let p = profile(&CareerStats::from_raw(RawStats::default()));
        assert!(p.classifications.is_empty());
    }

    #[test]
    fn test_classification_labels_match_serde() {
        let json = serde_json::to_string(&Classification::ElitePowerSpeed).unwrap();
        assert_eq!(json, format!("\"{}\"", Classification::ElitePowerSpeed.label()));
    }

    #[test]
    fn test_hall_of_fame_clubs() {
        let players = vec![
            player(1, "Willie Mays", mays()),
            player(
                2,
                "Contact Hitter",
                RawStats {
                    at_bats: 9000,
                    hits: 3000,
                    home_runs: 100,
                    ..Default::default()
                },
            ),
            player(
                3,
                "Journeyman",
                RawStats {
                    at_bats: 4000,
                    hits: 1000,
                    home_runs: 120,
                    ..Default::default()
                },
            ),
        ];

        let hof = hall_of_fame(&players);
        let names = |v: &Vec<&Player>| v.iter().map(|p| p.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(&hof.home_run_club), vec!["Willie Mays"]);
        assert_eq!(names(&hof.hit_club), vec!["Willie Mays", "Contact Hitter"]);
        assert_eq!(names(&hof.ops_club), vec!["Willie Mays"]);
    }
}
