use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::{
    class_assignment::{
        AssignClassRequest, DriverClassesResponse, ReassignClassRequest, ReassignClassResponse,
    },
    common::ActionResponse,
};
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/league/{league_id}/driver/{cust_id}/classes",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("cust_id" = i64, Path, description = "Driver id")
    ),
    responses(
        (status = 200, description = "Class tags held by the driver, most recent first", body = DriverClassesResponse)
    ),
    tag = "classes"
)]
pub async fn get_driver_classes(
    State(state): State<AppState>,
    Path((league_id, cust_id)): Path<(i64, i64)>,
) -> Result<Response, WebError> {
    let assignments = services::driver_classes(&state, league_id, cust_id).await?;

    Ok(Json(DriverClassesResponse {
        success: true,
        classes: assignments.iter().map(|a| a.class_name.clone()).collect(),
        assignments,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/league/{league_id}/driver/{cust_id}/classes",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("cust_id" = i64, Path, description = "Driver id")
    ),
    request_body = AssignClassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Class tag added, or already present", body = ActionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "classes"
)]
pub async fn assign_class(
    State(state): State<AppState>,
    Path((league_id, cust_id)): Path<(i64, i64)>,
    Json(req): Json<AssignClassRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let class_name = req.class_name.trim();
    let message = if services::assign_class(&state, league_id, cust_id, class_name).await? {
        format!(
            "Class \"{class_name}\" assigned to driver. Championship standings will be recalculated."
        )
    } else {
        format!("Driver is already assigned to class \"{class_name}\".")
    };

    Ok(Json(ActionResponse::ok(message)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/league/{league_id}/driver/{cust_id}/classes/{class_name}",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("cust_id" = i64, Path, description = "Driver id"),
        ("class_name" = String, Path, description = "Class tag to remove")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Class tag removed; success is false when the driver did not hold it", body = ActionResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "classes"
)]
pub async fn unassign_class(
    State(state): State<AppState>,
    Path((league_id, cust_id, class_name)): Path<(i64, i64, String)>,
) -> Result<Response, WebError> {
    let response = if services::unassign_class(&state, league_id, cust_id, &class_name).await? {
        ActionResponse::ok(format!(
            "Class \"{class_name}\" removed from driver. Championship standings will be recalculated."
        ))
    } else {
        ActionResponse::unchanged(format!(
            "Driver was not assigned to class \"{class_name}\"."
        ))
    };

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/league/{league_id}/driver/{cust_id}/class",
    params(
        ("league_id" = i64, Path, description = "League id"),
        ("cust_id" = i64, Path, description = "Driver id")
    ),
    request_body = ReassignClassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Legacy class reassigned", body = ReassignClassResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "classes"
)]
pub async fn reassign_class(
    State(state): State<AppState>,
    Path((league_id, cust_id)): Path<(i64, i64)>,
    Json(req): Json<ReassignClassRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let change = services::reassign_class(&state, league_id, cust_id, &req.new_class).await?;

    Ok(Json(ReassignClassResponse {
        success: true,
        message: format!("Driver moved to class \"{}\"", change.new_class),
        old_class: change.old_class,
        new_class: change.new_class,
    })
    .into_response())
}
