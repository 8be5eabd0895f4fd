use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::points_config::{
    PointsConfigResponse, SavePointsConfigResponse, UpdatePointsConfigRequest,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/league/{league_id}/points-config",
    params(
        ("league_id" = i64, Path, description = "League id")
    ),
    responses(
        (status = 200, description = "Effective points configuration and presets", body = PointsConfigResponse)
    ),
    tag = "points-config"
)]
pub async fn get_points_config(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
) -> Result<Response, WebError> {
    let response = services::get_points_config(&state, league_id).await;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/league/{league_id}/points-config",
    params(
        ("league_id" = i64, Path, description = "League id")
    ),
    request_body = UpdatePointsConfigRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Points configuration saved", body = SavePointsConfigResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "points-config"
)]
pub async fn save_points_config(
    State(state): State<AppState>,
    Path(league_id): Path<i64>,
    Json(req): Json<UpdatePointsConfigRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let config = services::save_points_config(&state, league_id, req).await?;

    Ok(Json(SavePointsConfigResponse {
        success: true,
        config,
    })
    .into_response())
}
