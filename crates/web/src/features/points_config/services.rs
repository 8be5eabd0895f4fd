use storage::{
    dto::points_config::{PointsConfigResponse, UpdatePointsConfigRequest},
    error::Result,
    models::{PointsConfig, PointsPreset},
    services::points_config,
};

use crate::state::AppState;

/// The league's effective configuration alongside every built-in preset
pub async fn get_points_config(state: &AppState, league_id: i64) -> PointsConfigResponse {
    PointsConfigResponse {
        config: points_config::load_points_config(&state.stores, league_id).await,
        presets: PointsPreset::catalog(),
    }
}

pub async fn save_points_config(
    state: &AppState,
    league_id: i64,
    request: UpdatePointsConfigRequest,
) -> Result<PointsConfig> {
    let config = request.into_config();
    points_config::save_points_config(&state.stores, league_id, &config).await?;
    Ok(config)
}
