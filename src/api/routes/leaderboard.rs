use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::format::{MetricValue, PlayerRow};
use crate::api::state::AppState;
use crate::api::{ApiError, ApiQuery};
use crate::calculate::{rank, Metric};
use crate::models::CareerStats;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub stat: Option<String>,
    /// Parsed as a signed integer so zero and negative limits reach the
    /// ranker and fail there.
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub value: MetricValue,
    #[serde(flatten)]
    pub player: PlayerRow,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub stat: Metric,
    pub limit: i64,
    pub leaders: Vec<LeaderboardEntry>,
}

pub async fn leaderboard(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let stat = params
        .stat
        .unwrap_or_else(|| Metric::HomeRuns.name().to_string());
    let limit = params
        .limit
        .unwrap_or(state.config.api.default_leaderboard_limit);

    let players = state.store.list().await;
    let board = rank(&players, &stat, limit, |p| CareerStats::from_raw(p.stats))?;
    let metric = board.metric;

    tracing::debug!(
        "Leaderboard {} (limit {}): {} rows",
        metric,
        limit,
        board.entries.len()
    );

    Ok(Json(LeaderboardResponse {
        stat: metric,
        limit,
        leaders: board
            .entries
            .into_iter()
            .map(|entry| LeaderboardEntry {
                rank: entry.rank,
                value: MetricValue::of(metric, entry.value),
                player: PlayerRow::from(entry.item),
            })
            .collect(),
    }))
}
