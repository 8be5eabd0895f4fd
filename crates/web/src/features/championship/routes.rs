use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{clear_cache, get_championship, refresh_cache};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/:league_id/season/:season_id/cache",
            post(refresh_cache).delete(clear_cache),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route(
            "/:league_id/season/:season_id/championship",
            get(get_championship),
        )
        .merge(protected)
}
