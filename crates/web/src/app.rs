use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features;
use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::championship::handlers::get_championship,
        features::championship::handlers::refresh_cache,
        features::championship::handlers::clear_cache,
        features::points_config::handlers::get_points_config,
        features::points_config::handlers::save_points_config,
        features::penalties::handlers::list_penalties,
        features::penalties::handlers::save_penalty,
        features::penalties::handlers::delete_penalty,
        features::classes::handlers::get_driver_classes,
        features::classes::handlers::assign_class,
        features::classes::handlers::unassign_class,
        features::classes::handlers::reassign_class,
    ),
    components(
        schemas(
            storage::dto::championship::ChampionshipStandings,
            storage::dto::championship::ChampionshipDiagnostics,
            storage::dto::championship::CacheRefreshResponse,
            storage::dto::championship::CacheClearResponse,
            storage::dto::points_config::PointsConfigResponse,
            storage::dto::points_config::SavePointsConfigResponse,
            storage::dto::points_config::UpdatePointsConfigRequest,
            storage::dto::penalty::PenaltyListResponse,
            storage::dto::penalty::CreatePenaltyRequest,
            storage::dto::penalty::PenaltyResponse,
            storage::dto::class_assignment::AssignClassRequest,
            storage::dto::class_assignment::ReassignClassRequest,
            storage::dto::class_assignment::DriverClassesResponse,
            storage::dto::class_assignment::ReassignClassResponse,
            storage::dto::common::ActionResponse,
            storage::models::DriverStanding,
            storage::models::RaceRecord,
            storage::models::PointsConfig,
            storage::models::Penalty,
            storage::models::ClassAssignment,
        )
    ),
    tags(
        (name = "championship", description = "Season standings and their cache"),
        (name = "points-config", description = "League points tables"),
        (name = "penalties", description = "Per-session penalty ledger"),
        (name = "classes", description = "Driver class assignments"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

/// The full application: league API under `/api/league` plus the docs.
pub fn router(state: AppState, api_keys: ApiKeys) -> Router {
    let league = features::championship::routes(api_keys.clone())
        .merge(features::points_config::routes(api_keys.clone()))
        .merge(features::penalties::routes(api_keys.clone()))
        .merge(features::classes::routes(api_keys));

    Router::new()
        .nest("/api/league", league)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
