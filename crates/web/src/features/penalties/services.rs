use storage::{
    dto::penalty::CreatePenaltyRequest,
    error::Result,
    models::{Penalty, PenaltyKey, SeasonPenalties},
    services::penalties,
};

use crate::state::AppState;

pub async fn list_penalties(
    state: &AppState,
    league_id: i64,
    season_id: i64,
) -> Result<SeasonPenalties> {
    penalties::list_penalties(&state.stores, league_id, season_id).await
}

/// Apply a validated penalty, replacing any earlier one for the same driver
/// and session
pub async fn save_penalty(
    state: &AppState,
    league_id: i64,
    season_id: i64,
    request: CreatePenaltyRequest,
) -> Result<Penalty> {
    let key = PenaltyKey {
        league_id,
        season_id,
        subsession_id: request.subsession_id,
        cust_id: request.cust_id,
    };
    let points = u32::try_from(request.penalty_points).unwrap_or_default();

    penalties::save_penalty(&state.stores, key, points, request.reason.unwrap_or_default()).await
}

pub async fn delete_penalty(state: &AppState, key: PenaltyKey) -> Result<bool> {
    penalties::delete_penalty(&state.stores, key).await
}
