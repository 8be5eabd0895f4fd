use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{delete_penalty, list_penalties, save_penalty};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:league_id/season/:season_id/penalties", post(save_penalty))
        .route(
            "/:league_id/season/:season_id/penalties/:subsession_id/:cust_id",
            delete(delete_penalty),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:league_id/season/:season_id/penalties", get(list_penalties))
        .merge(protected)
}
