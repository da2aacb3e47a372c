use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::format::{ComparisonView, PlayerDetail};
use crate::api::state::AppState;
use crate::api::{parse_player_id, require_player, ApiError, ApiQuery};
use crate::calculate::compare;
use crate::models::CareerStats;

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    pub player1: Option<String>,
    pub player2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Tally {
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub ties: usize,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub player1: PlayerDetail,
    pub player2: PlayerDetail,
    pub comparison: ComparisonView,
    pub tally: Tally,
}

pub async fn compare_players(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CompareParams>,
) -> Result<Json<CompareResponse>, ApiError> {
    let (Some(raw1), Some(raw2)) = (
        params.player1.filter(|s| !s.trim().is_empty()),
        params.player2.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Both player1 and player2 IDs are required".to_string(),
        ));
    };

    let player1 = require_player(&state, parse_player_id(&raw1)?).await?;
    let player2 = require_player(&state, parse_player_id(&raw2)?).await?;

    let comparison = compare(
        &CareerStats::from_raw(player1.stats),
        &CareerStats::from_raw(player2.stats),
    );
    let (player1_wins, player2_wins, ties) = comparison.tally();

    Ok(Json(CompareResponse {
        player1: PlayerDetail::from(&player1),
        player2: PlayerDetail::from(&player2),
        comparison: ComparisonView::from(&comparison),
        tally: Tally {
            player1_wins,
            player2_wins,
            ties,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{get_json, legends, setup_test_state};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_compare_ruth_and_aaron() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/compare?player1=1&player2=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["player1"]["name"], "Babe Ruth");
        assert_eq!(json["player2"]["name"], "Hank Aaron");

        let home_runs = &json["comparison"]["home_runs"];
        assert_eq!(home_runs["player1"], 714);
        assert_eq!(home_runs["player2"], 755);
        assert_eq!(home_runs["difference"], -41);
        assert_eq!(home_runs["winner"], "player2");

        assert_eq!(json["comparison"]["batting_avg"]["player1"], "0.342");
        assert_eq!(json["comparison"]["batting_avg"]["winner"], "player1");
        assert_eq!(json["comparison"]["walks_vs_strikeouts"]["winner"], "player1");
        assert_eq!(json["comparison"]["power_speed_number"]["winner"], "player2");

        assert_eq!(json["tally"]["player1_wins"], 3);
        assert_eq!(json["tally"]["player2_wins"], 3);
        assert_eq!(json["tally"]["ties"], 0);
    }

    #[tokio::test]
    async fn test_compare_player_with_self_is_all_ties() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/compare?player1=3&player2=3").await;
        assert_eq!(status, StatusCode::OK);
        for (_, result) in json["comparison"].as_object().unwrap() {
            assert_eq!(result["winner"], "tie");
        }
        assert_eq!(json["tally"]["ties"], 6);
    }

    #[tokio::test]
    async fn test_compare_requires_both_ids() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state.clone(), "/api/players/compare?player1=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Both player1 and player2 IDs are required"));

        let (status, _) = get_json(state, "/api/players/compare?player1=&player2=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compare_unknown_player() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/compare?player1=1&player2=77").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_compare_equal_ops_is_a_tie() {
        let dir = tempfile::tempdir().unwrap();
        let line = |name: &str, at_bats: u32, hits: u32, walks: u32| crate::storage::NewPlayer {
            name: name.to_string(),
            position: crate::models::Position::Catcher,
            description: None,
            stats: crate::models::RawStats {
                at_bats,
                hits,
                walks,
                ..Default::default()
            },
        };
        let state = setup_test_state(
            dir.path(),
            vec![line("Walker", 1, 0, 5), line("Contact", 3, 1, 1)],
        )
        .await;

        let (status, json) = get_json(state, "/api/players/compare?player1=1&player2=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["comparison"]["ops"]["winner"], "tie");
        assert_eq!(json["comparison"]["ops"]["difference"], "0.000");
    }
}
