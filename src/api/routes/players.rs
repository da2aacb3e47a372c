use std::cmp::Ordering;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::format::{PlayerDetail, PlayerRow};
use crate::api::state::AppState;
use crate::api::{
    parse_player_id, require_player, ApiError, ApiJson, ApiQuery, Pagination, PaginationMeta,
};
use crate::calculate::{Metric, StatsError};
use crate::models::{Player, Position, RawStatsUpdate};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub position: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<PlayerRow>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Name,
    HomeRuns,
    BattingAvg,
    Ops,
    Hits,
    Runs,
    Rbis,
}

impl SortKey {
    fn parse(raw: &str) -> Option<(Self, bool)> {
        let (key, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let key = match key {
            "name" => SortKey::Name,
            "home_runs" => SortKey::HomeRuns,
            "batting_avg" => SortKey::BattingAvg,
            "ops" => SortKey::Ops,
            "hits" => SortKey::Hits,
            "runs" => SortKey::Runs,
            "rbis" => SortKey::Rbis,
            _ => return None,
        };
        Some((key, descending))
    }

    fn compare(&self, a: &Player, b: &Player) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::HomeRuns => a.stats.home_runs.cmp(&b.stats.home_runs),
            SortKey::Hits => a.stats.hits.cmp(&b.stats.hits),
            SortKey::Runs => a.stats.runs.cmp(&b.stats.runs),
            SortKey::Rbis => a.stats.rbis.cmp(&b.stats.rbis),
            SortKey::BattingAvg => Metric::BattingAvg
                .exact(&a.stats)
                .cmp(&Metric::BattingAvg.exact(&b.stats)),
            SortKey::Ops => Metric::Ops.exact(&a.stats).cmp(&Metric::Ops.exact(&b.stats)),
        }
    }
}

pub async fn list_players(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let position = match params.position.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(code) => Some(
            Position::from_code(code)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown position: {}", code)))?,
        ),
        None => None,
    };

    let ordering = params.ordering.as_deref().unwrap_or("name");
    let (sort_key, descending) = SortKey::parse(ordering)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown ordering: {}", ordering)))?;

    let search = params
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut players: Vec<Player> = state
        .store
        .list()
        .await
        .into_iter()
        .filter(|p| position.map_or(true, |pos| p.position == pos))
        .filter(|p| {
            search
                .as_deref()
                .map_or(true, |s| p.name.to_lowercase().contains(s))
        })
        .collect();

    if descending {
        players.sort_by(|a, b| sort_key.compare(b, a));
    } else {
        players.sort_by(|a, b| sort_key.compare(a, b));
    }

    let pagination = Pagination::new(params.page, params.limit, &state.config.api);
    let total = u32::try_from(players.len()).unwrap_or(u32::MAX);

    Ok(Json(PlayerListResponse {
        players: pagination.slice(&players).iter().map(PlayerRow::from).collect(),
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let id = parse_player_id(&id)?;
    let player = require_player(&state, id).await?;
    Ok(Json(PlayerDetail::from(&player)))
}

/// Apply a partial counting-stats update and return the refreshed player.
///
/// Keys outside the twelve counting fields are ignored.
pub async fn update_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let id = parse_player_id(&id)?;
    let fields = body
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Request body must be a JSON object".to_string()))?;
    let update = RawStatsUpdate::from_json(fields)?;

    if update.is_empty() {
        let player = require_player(&state, id).await?;
        return Ok(Json(PlayerDetail::from(&player)));
    }

    let player = state
        .store
        .update_stats(id, &update)
        .await?
        .ok_or(StatsError::MissingPlayer(id))?;

    Ok(Json(PlayerDetail::from(&player)))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{get_json, legends, post_json, post_raw, setup_test_state};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn names(json: &Value) -> Vec<String> {
        json["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_list_players_default_order_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            names(&json),
            vec!["Babe Ruth", "Hank Aaron", "Ozzie Smith", "Rickey Henderson", "Willie Mays"]
        );
        assert_eq!(json["pagination"]["total_items"], 5);
        assert_eq!(json["players"][0]["position"], "RF");
        assert_eq!(json["players"][0]["batting_avg"], "0.342");
    }

    #[tokio::test]
    async fn test_list_players_search_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (_, json) = get_json(state.clone(), "/api/players?search=MAYS").await;
        assert_eq!(names(&json), vec!["Willie Mays"]);

        let (_, json) = get_json(state, "/api/players?search=a").await;
        assert_eq!(names(&json), vec!["Babe Ruth", "Hank Aaron", "Willie Mays"]);
    }

    #[tokio::test]
    async fn test_list_players_position_filter() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state.clone(), "/api/players?position=rf").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&json), vec!["Babe Ruth", "Hank Aaron"]);

        let (status, _) = get_json(state, "/api/players?position=XX").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_players_ordering() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (_, json) = get_json(state.clone(), "/api/players?ordering=-home_runs").await;
        assert_eq!(
            names(&json),
            vec!["Hank Aaron", "Babe Ruth", "Willie Mays", "Rickey Henderson", "Ozzie Smith"]
        );

        let (_, json) = get_json(state.clone(), "/api/players?ordering=ops").await;
        assert_eq!(names(&json)[0], "Ozzie Smith");
        assert_eq!(names(&json)[4], "Babe Ruth");

        let (status, json) = get_json(state, "/api/players?ordering=salary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_list_players_pagination() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (_, json) = get_json(state, "/api/players?page=2&limit=2").await;
        assert_eq!(names(&json), vec!["Ozzie Smith", "Rickey Henderson"]);
        assert_eq!(json["pagination"]["total_pages"], 3);
        assert_eq!(json["pagination"]["has_next"], true);
        assert_eq!(json["pagination"]["has_prev"], true);
    }

    #[tokio::test]
    async fn test_get_player_detail() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state, "/api/players/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Babe Ruth");
        assert_eq!(json["position_display"], "Right Field");
        assert_eq!(json["career_stats"]["home_runs"], 714);
        assert_eq!(json["career_stats"]["total_bases"], 5793);
        assert_eq!(json["career_stats"]["batting_avg"], "0.342");
        assert_eq!(json["career_stats"]["slugging_pct"], "0.690");
    }

    #[tokio::test]
    async fn test_get_player_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = get_json(state.clone(), "/api/players/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        let (status, _) = get_json(state, "/api/players/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_stats_recomputes_derived() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), Vec::new()).await;
        state
            .store
            .upsert_batch(vec![crate::storage::NewPlayer {
                name: "Rookie".to_string(),
                position: crate::models::Position::Shortstop,
                description: None,
                stats: Default::default(),
            }])
            .await
            .unwrap();

        let (status, json) = post_json(
            state.clone(),
            "/api/players/1/update_stats",
            json!({ "at_bats": 500, "hits": 150, "doubles": 30, "triples": 2,
                    "home_runs": 20, "walks": 50, "strikeouts": 100,
                    "stolen_bases": 10, "caught_stealing": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["career_stats"]["total_bases"], 244);
        assert_eq!(json["career_stats"]["batting_avg"], "0.300");
        assert_eq!(json["career_stats"]["slugging_pct"], "0.488");
        assert_eq!(json["career_stats"]["ops"], "0.852");

        let (_, json) = get_json(state, "/api/players/1").await;
        assert_eq!(json["career_stats"]["hits"], 150);
    }

    #[tokio::test]
    async fn test_update_stats_ignores_derived_fields() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) = post_json(
            state,
            "/api/players/1/update_stats",
            json!({ "batting_avg": "0.999", "home_runs": 715 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["career_stats"]["home_runs"], 715);
        assert_eq!(json["career_stats"]["batting_avg"], "0.342");
    }

    #[tokio::test]
    async fn test_update_stats_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, _) =
            post_json(state.clone(), "/api/players/1/update_stats", json!({ "hits": -1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            post_json(state.clone(), "/api/players/1/update_stats", json!({ "hits": 1.5 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            post_json(state.clone(), "/api/players/1/update_stats", json!([1, 2])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = get_json(state, "/api/players/1").await;
        assert_eq!(json["career_stats"]["hits"], 2873);
    }

    #[tokio::test]
    async fn test_update_stats_unknown_player() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, _) =
            post_json(state, "/api/players/42/update_stats", json!({ "hits": 1 })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_stats_malformed_body_uses_error_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        let (status, json) =
            post_raw(state.clone(), "/api/players/1/update_stats", "{\"hits\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].is_string());

        let (_, json) = get_json(state, "/api/players/1").await;
        assert_eq!(json["career_stats"]["hits"], 2873);
    }

    #[tokio::test]
    async fn test_list_players_bad_page_uses_error_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = setup_test_state(dir.path(), legends()).await;

        for uri in ["/api/players?page=abc", "/api/players?limit=-3"] {
            let (status, json) = get_json(state.clone(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json["error"]["code"], "BAD_REQUEST", "{}", uri);
        }
    }
}
