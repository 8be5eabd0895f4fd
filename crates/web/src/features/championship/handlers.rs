use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::dto::championship::{
    CacheClearResponse, CacheRefreshResponse, ChampionshipQuery, ChampionshipStandings,
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/league/{league_id}/season/{season_id}/championship",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("season_id" = i64, Path, description = "Season id"),
        ChampionshipQuery
    ),
    responses(
        (status = 200, description = "Championship standings per division", body = ChampionshipStandings),
        (status = 500, description = "Standings could not be calculated")
    ),
    tag = "championship"
)]
pub async fn get_championship(
    State(state): State<AppState>,
    Path((league_id, season_id)): Path<(i64, i64)>,
    Query(query): Query<ChampionshipQuery>,
) -> Result<Response, WebError> {
    let standings = services::get_championship(&state, league_id, season_id, query).await?;

    Ok(Json(standings).into_response())
}

#[utoipa::path(
    post,
    path = "/api/league/{league_id}/season/{season_id}/cache",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("season_id" = i64, Path, description = "Season id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Standings recomputed and cached", body = CacheRefreshResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Standings could not be calculated")
    ),
    tag = "championship"
)]
pub async fn refresh_cache(
    State(state): State<AppState>,
    Path((league_id, season_id)): Path<(i64, i64)>,
) -> Result<Response, WebError> {
    let standings = services::refresh_cache(&state, league_id, season_id).await?;

    Ok(Json(CacheRefreshResponse {
        success: true,
        message: "Season data cached successfully".to_string(),
        cached_at: standings.last_updated.unwrap_or_else(Utc::now),
    })
    .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/league/{league_id}/season/{season_id}/cache",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("season_id" = i64, Path, description = "Season id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cached standings removed", body = CacheClearResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "championship"
)]
pub async fn clear_cache(
    State(state): State<AppState>,
    Path((league_id, season_id)): Path<(i64, i64)>,
) -> Result<Response, WebError> {
    let cleared = services::clear_cache(&state, league_id, season_id).await?;

    Ok(Json(CacheClearResponse {
        success: true,
        message: format!("Cache cleared successfully. Removed {cleared} cached entries."),
        cleared_entries: cleared,
    })
    .into_response())
}
