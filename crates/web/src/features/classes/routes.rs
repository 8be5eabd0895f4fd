use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{assign_class, get_driver_classes, reassign_class, unassign_class};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:league_id/driver/:cust_id/classes", post(assign_class))
        .route(
            "/:league_id/driver/:cust_id/classes/:class_name",
            delete(unassign_class),
        )
        .route("/:league_id/driver/:cust_id/class", put(reassign_class))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:league_id/driver/:cust_id/classes", get(get_driver_classes))
        .merge(protected)
}
