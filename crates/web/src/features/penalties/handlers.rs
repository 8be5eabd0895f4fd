use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use storage::{
    dto::{
        common::ActionResponse,
        penalty::{CreatePenaltyRequest, PenaltyListResponse, PenaltyQuery, PenaltyResponse},
    },
    models::PenaltyKey,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/league/{league_id}/season/{season_id}/penalties",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("season_id" = i64, Path, description = "Season id"),
        PenaltyQuery
    ),
    responses(
        (status = 200, description = "Penalties keyed by subsession then driver", body = PenaltyListResponse)
    ),
    tag = "penalties"
)]
pub async fn list_penalties(
    State(state): State<AppState>,
    Path((league_id, season_id)): Path<(i64, i64)>,
    Query(query): Query<PenaltyQuery>,
) -> Result<Response, WebError> {
    let penalties = services::list_penalties(&state, league_id, season_id).await?;

    Ok(Json(PenaltyListResponse {
        penalties,
        last_updated: query.cached.then(Utc::now),
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/league/{league_id}/season/{season_id}/penalties",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("season_id" = i64, Path, description = "Season id")
    ),
    request_body = CreatePenaltyRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Penalty applied", body = PenaltyResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "penalties"
)]
pub async fn save_penalty(
    State(state): State<AppState>,
    Path((league_id, season_id)): Path<(i64, i64)>,
    Json(req): Json<CreatePenaltyRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let penalty = services::save_penalty(&state, league_id, season_id, req).await?;

    Ok(Json(PenaltyResponse {
        success: true,
        penalty,
    })
    .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/league/{league_id}/season/{season_id}/penalties/{subsession_id}/{cust_id}",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("season_id" = i64, Path, description = "Season id"),
        ("subsession_id" = i64, Path, description = "Subsession the penalty applies to"),
        ("cust_id" = i64, Path, description = "Penalised driver")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Penalty removed, or there was none", body = ActionResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "penalties"
)]
pub async fn delete_penalty(
    State(state): State<AppState>,
    Path((league_id, season_id, subsession_id, cust_id)): Path<(i64, i64, i64, i64)>,
) -> Result<Response, WebError> {
    let key = PenaltyKey {
        league_id,
        season_id,
        subsession_id,
        cust_id,
    };

    let response = if services::delete_penalty(&state, key).await? {
        ActionResponse::ok("Penalty removed")
    } else {
        ActionResponse::unchanged("No penalty recorded for this driver and session")
    };

    Ok(Json(response).into_response())
}
