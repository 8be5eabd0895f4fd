use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{get_points_config, save_points_config};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:league_id/points-config", post(save_points_config))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:league_id/points-config", get(get_points_config))
        .merge(protected)
}
