use storage::{
    dto::championship::{ChampionshipQuery, ChampionshipStandings},
    error::{ChampionshipError, Result},
    services::championship::{self, ChampionshipRequest},
};

use crate::state::AppState;

/// Standings for a season, optionally narrowed to one division.
pub async fn get_championship(
    state: &AppState,
    league_id: i64,
    season_id: i64,
    query: ChampionshipQuery,
) -> std::result::Result<ChampionshipStandings, ChampionshipError> {
    let division = query.division.filter(|d| !d.trim().is_empty());
    let request = ChampionshipRequest::new(league_id, season_id)
        .with_division(division)
        .with_cached(query.cached);

    championship::compute_championship(state.data_source.as_ref(), &state.stores, &request).await
}

/// Recompute and cache the full standings for a season
pub async fn refresh_cache(
    state: &AppState,
    league_id: i64,
    season_id: i64,
) -> std::result::Result<ChampionshipStandings, ChampionshipError> {
    championship::refresh_cache(state.data_source.as_ref(), &state.stores, league_id, season_id)
        .await
}

pub async fn clear_cache(state: &AppState, league_id: i64, season_id: i64) -> Result<u64> {
    championship::clear_cache(&state.stores, league_id, season_id).await
}
