use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::{LeaderboardQuery, LeaderboardResponse};
use crate::error::AppResult;
use crate::services::leaderboard::daily_leaderboard;
use crate::AppState;

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<LeaderboardResponse>> {
    let date = query.date.unwrap_or_else(|| state.clock.today());

    let entries = daily_leaderboard(
        &state.store,
        date,
        query.metric,
        state.config.leaderboard_limit,
    )
    .await?;

    Ok(Json(LeaderboardResponse {
        date,
        metric: query.metric,
        entries,
    }))
}
