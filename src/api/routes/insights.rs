//! Aggregate views over the whole roster.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::format::{rate, round_to, two_places, PlayerRow};
use crate::api::state::AppState;
use crate::api::{ApiError, ApiQuery};
use crate::calculate::{hall_of_fame, profile, summarize, Classification, CountSummary};
use crate::models::{CareerStats, Player, PlayerId, Position};

/// Players shown by the profile listing.
const PROFILE_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountSummaryView {
    pub average: f64,
    pub max: u32,
    pub min: u32,
    pub leader: Option<String>,
}

impl From<CountSummary> for CountSummaryView {
    fn from(summary: CountSummary) -> Self {
        Self {
            average: round_to(summary.average, 2),
            max: summary.max,
            min: summary.min,
            leader: summary.leader,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RateSummaryView {
    pub average: f64,
    pub max: f64,
    pub leader: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub total_players: usize,
    pub home_runs: CountSummaryView,
    pub batting_average: RateSummaryView,
    pub ops: RateSummaryView,
    pub stolen_bases: CountSummaryView,
}

#[derive(Debug, Serialize)]
pub struct StatsSummaryResponse {
    /// Position code, or "all"
    pub position: String,
    pub summary: SummaryView,
}

pub async fn stats_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<Json<StatsSummaryResponse>, ApiError> {
    let position = match params.position.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(code) => Some(
            Position::from_code(code)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown position: {}", code)))?,
        ),
        None => None,
    };

    let players: Vec<Player> = state
        .store
        .list()
        .await
        .into_iter()
        .filter(|p| position.map_or(true, |pos| p.position == pos))
        .collect();

    let summary = summarize(&players);

    Ok(Json(StatsSummaryResponse {
        position: position.map_or_else(|| "all".to_string(), |p| p.code().to_string()),
        summary: SummaryView {
            total_players: summary.total_players,
            home_runs: summary.home_runs.into(),
            batting_average: RateSummaryView {
                average: round_to(summary.batting_avg.average, 3),
                max: round_to(summary.batting_avg.max, 3),
                leader: summary.batting_avg.leader,
            },
            ops: RateSummaryView {
                average: round_to(summary.ops.average, 3),
                max: round_to(summary.ops.max, 3),
                leader: summary.ops.leader,
            },
            stolen_bases: summary.stolen_bases.into(),
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct ProfileMetrics {
    pub power_speed_number: String,
    pub isolated_power: String,
    pub bb_k_ratio: String,
    pub stolen_base_success: String,
    pub home_run_rate: String,
    pub total_bases: u64,
    pub extra_base_hits: u64,
}

#[derive(Debug, Serialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    pub metrics: ProfileMetrics,
    pub classifications: Vec<Classification>,
}

#[derive(Debug, Serialize)]
pub struct UniqueStatsResponse {
    pub unique_statistical_profiles: Vec<PlayerProfile>,
    pub description: &'static str,
}

pub async fn unique_stats(State(state): State<AppState>) -> Json<UniqueStatsResponse> {
    let players = state.store.list().await;

    let profiles = players
        .iter()
        .take(PROFILE_LIMIT)
        .map(|player| {
            let p = profile(&CareerStats::from_raw(player.stats));
            let d = &p.stats.derived;
            PlayerProfile {
                id: player.id,
                name: player.name.clone(),
                position: player.position.display_name().to_string(),
                metrics: ProfileMetrics {
                    power_speed_number: two_places(d.power_speed_number),
                    isolated_power: rate(d.isolated_power),
                    bb_k_ratio: rate(d.walk_to_strikeout_ratio),
                    stolen_base_success: rate(d.stolen_base_pct),
                    home_run_rate: rate(d.home_run_rate),
                    total_bases: d.total_bases,
                    extra_base_hits: d.extra_base_hits,
                },
                classifications: p.classifications,
            }
        })
        .collect();

    Json(UniqueStatsResponse {
        unique_statistical_profiles: profiles,
        description: "Advanced metrics and classifications for players",
    })
}

#[derive(Debug, Serialize)]
pub struct Club {
    pub count: usize,
    pub players: Vec<PlayerRow>,
}

impl Club {
    fn of(players: &[&Player]) -> Self {
        Self {
            count: players.len(),
            players: players.iter().map(|p| PlayerRow::from(*p)).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HallOfFameResponse {
    #[serde(rename = "500_home_run_club")]
    pub home_run_club: Club,
    #[serde(rename = "3000_hit_300_avg_club")]
    pub hit_club: Club,
    #[serde(rename = "elite_ops_power_club")]
    pub ops_club: Club,
}

pub async fn hall_of_fame_candidates(State(state): State<AppState>) -> Json<HallOfFameResponse> {
    let players = state.store.list().await;
    let hof = hall_of_fame(&players);

    Json(HallOfFameResponse {
        home_run_club: Club::of(&hof.home_run_club),
        hit_club: Club::of(&hof.hit_club),
        ops_club: Club::of(&hof.ops_club),
    })
}

#[cfg(test)]
mod tests {
    use super::super::testing::{get_json, legends, setup_test_state};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn names(players: &Value) -> Vec<String> {
        players
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_stats_summary_all_players() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/stats_summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["position"], "all");

        let summary = &json["summary"];
        assert_eq!(summary["total_players"], 5);
        assert_eq!(summary["home_runs"]["average"], 490.8);
        assert_eq!(summary["home_runs"]["max"], 755);
        assert_eq!(summary["home_runs"]["min"], 28);
        assert_eq!(summary["home_runs"]["leader"], "Hank Aaron");
        assert_eq!(summary["batting_average"]["leader"], "Babe Ruth");
        assert_eq!(summary["batting_average"]["max"], 0.342);
        assert_eq!(summary["ops"]["leader"], "Babe Ruth");
        assert_eq!(summary["stolen_bases"]["average"], 537.4);
        assert_eq!(summary["stolen_bases"]["max"], 1406);
    }

    #[tokio::test]
    async fn test_stats_summary_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state.clone(), "/api/players/stats_summary?position=RF").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["position"], "RF");
        assert_eq!(json["summary"]["total_players"], 2);
        assert_eq!(json["summary"]["home_runs"]["average"], 734.5);

        let (status, _) = get_json(state, "/api/players/stats_summary?position=ZZ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_summary_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), Vec::new()).await;

        let (status, json) = get_json(state, "/api/players/stats_summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["summary"]["total_players"], 0);
        assert_eq!(json["summary"]["home_runs"]["average"], 0.0);
        assert_eq!(json["summary"]["home_runs"]["leader"], Value::Null);
        assert_eq!(json["summary"]["ops"]["leader"], Value::Null);
    }

    #[tokio::test]
    async fn test_unique_stats_classifications() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/unique_stats").await;
        assert_eq!(status, StatusCode::OK);

        let profiles = json["unique_statistical_profiles"].as_array().unwrap();
        assert_eq!(profiles.len(), 5);

        let ruth = &profiles[0];
        assert_eq!(ruth["name"], "Babe Ruth");
        assert_eq!(ruth["position"], "Right Field");
        assert_eq!(ruth["metrics"]["total_bases"], 5793);
        assert_eq!(
            ruth["classifications"],
            json!([
                "Elite Power-Speed",
                "Power Hitter",
                "Disciplined Hitter",
                "Elite All-Around Hitter"
            ])
        );

        let henderson = &profiles[3];
        assert_eq!(
            henderson["classifications"],
            json!(["Elite Power-Speed", "Disciplined Hitter", "Efficient Base Stealer"])
        );

        let smith = &profiles[4];
        assert_eq!(smith["classifications"], json!(["Disciplined Hitter"]));
    }

    #[tokio::test]
    async fn test_hall_of_fame_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/hall_of_fame_candidates").await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(json["500_home_run_club"]["count"], 3);
        assert_eq!(
            names(&json["500_home_run_club"]["players"]),
            vec!["Babe Ruth", "Hank Aaron", "Willie Mays"]
        );
        assert_eq!(
            names(&json["3000_hit_300_avg_club"]["players"]),
            vec!["Hank Aaron", "Willie Mays"]
        );
        assert_eq!(json["elite_ops_power_club"]["count"], 3);
    }
}
