//! Championship standings: class resolution, per-session scoring and
//! season aggregation, wired to a [`LeagueDataSource`] and the [`Stores`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::dto::championship::{ChampionshipDiagnostics, ChampionshipStandings};
use crate::error::{ChampionshipError, Result as StorageResult};
use crate::models::Session;
use crate::repository::Stores;
use crate::services::points_config::load_points_config;

pub mod classes;
pub mod scoring;
pub mod source;
pub mod standings;

pub use classes::{ClassResolverChain, DivisionMap, NO_CLASS, OVERALL_DIVISION};
pub use scoring::score_session;
pub use source::LeagueDataSource;
pub use standings::{PastSession, StandingsAggregator};

#[derive(Debug, Clone)]
pub struct ChampionshipRequest {
    pub league_id: i64,
    pub season_id: i64,
    pub division: Option<String>,
    /// Serve cached standings when they cover the requested division.
    pub cached: bool,
    /// Sessions scheduled after this instant are not scored.
    pub now: DateTime<Utc>,
}

impl ChampionshipRequest {
    pub fn new(league_id: i64, season_id: i64) -> Self {
        Self {
            league_id,
            season_id,
            division: None,
            cached: false,
            now: Utc::now(),
        }
    }

    pub fn with_division(mut self, division: Option<String>) -> Self {
        self.division = division;
        self
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }
}

pub async fn compute_championship(
    source: &dyn LeagueDataSource,
    stores: &Stores,
    request: &ChampionshipRequest,
) -> Result<ChampionshipStandings, ChampionshipError> {
    let division = request.division.as_deref();

    if request.cached {
        match stores
            .championship_cache
            .find(request.league_id, request.season_id)
            .await
        {
            Ok(Some(cached)) if division.is_none_or(|d| cached.has_division(d)) => {
                tracing::info!(
                    "Returning cached championship for league {}, season {}",
                    request.league_id,
                    request.season_id
                );
                return Ok(cached.narrow_to(division));
            }
            Ok(_) => tracing::debug!(
                "Championship cache miss for league {}, season {}",
                request.league_id,
                request.season_id
            ),
            Err(e) => tracing::warn!("Failed to read cached championship: {}", e),
        }
    }

    let standings = calculate_standings(
        source,
        stores,
        request.league_id,
        request.season_id,
        request.now,
    )
    .await?;

    Ok(standings.narrow_to(division))
}

/// Recomputes every division and stores the result as the season's cache.
pub async fn refresh_cache(
    source: &dyn LeagueDataSource,
    stores: &Stores,
    league_id: i64,
    season_id: i64,
) -> Result<ChampionshipStandings, ChampionshipError> {
    let cached_at = Utc::now();
    let mut standings = calculate_standings(source, stores, league_id, season_id, cached_at).await?;

    stores
        .championship_cache
        .store(league_id, season_id, &standings, cached_at)
        .await?;
    standings.last_updated = Some(cached_at);

    tracing::info!("Cached championship for league {league_id}, season {season_id}");
    Ok(standings)
}

pub async fn clear_cache(stores: &Stores, league_id: i64, season_id: i64) -> StorageResult<u64> {
    let cleared = stores
        .championship_cache
        .invalidate(league_id, Some(season_id))
        .await?;

    tracing::info!(
        "Cleared {cleared} cached championship entries for league {league_id}, season {season_id}"
    );
    Ok(cleared)
}

/// Past sessions with a subsession id, in season order, each id once.
pub fn past_sessions(sessions: &[Session], now: DateTime<Utc>) -> Vec<PastSession<'_>> {
    let mut seen = HashSet::new();
    sessions
        .iter()
        .filter_map(|session| {
            session
                .scorable_subsession(now)
                .filter(|id| seen.insert(*id))
                .map(|subsession_id| PastSession {
                    subsession_id,
                    session,
                })
        })
        .collect()
}

async fn load_class_chain(stores: &Stores, league_id: i64) -> ClassResolverChain {
    let assignments = stores
        .class_assignments
        .list_assignments(league_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to load class assignments for league {league_id}: {e}");
            Vec::new()
        });
    let legacy_changes = stores
        .class_assignments
        .list_legacy_changes(league_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to load class changes for league {league_id}: {e}");
            Vec::new()
        });

    tracing::debug!(
        "Found {} class tags and {} legacy class changes for league {league_id}",
        assignments.len(),
        legacy_changes.len()
    );

    ClassResolverChain::standard(&assignments, &legacy_changes)
}

async fn calculate_standings(
    source: &dyn LeagueDataSource,
    stores: &Stores,
    league_id: i64,
    season_id: i64,
    now: DateTime<Utc>,
) -> Result<ChampionshipStandings, ChampionshipError> {
    tracing::info!("Calculating championship standings for league {league_id}, season {season_id}");

    let points_config = load_points_config(stores, league_id).await;
    let penalties = stores.penalties.list_for_season(league_id, season_id).await?;

    let sessions = source
        .fetch_sessions(league_id, season_id)
        .await
        .map_err(ChampionshipError::Sessions)?;
    let roster = source
        .fetch_roster(league_id)
        .await
        .map_err(ChampionshipError::Roster)?;

    let chain = load_class_chain(stores, league_id).await;
    let divisions = DivisionMap::build(&roster, &chain);

    let past = past_sessions(&sessions, now);
    tracing::info!(
        "Processing {} past sessions (drop weeks: {}, fastest lap: {}pts, pole: {}pts, penalties: {})",
        past.len(),
        points_config.drop_weeks,
        points_config.fastest_lap_points,
        points_config.pole_position_points,
        penalties.len()
    );

    let mut fetches = FuturesUnordered::new();
    for (slot, session) in past.iter().enumerate() {
        let subsession_id = session.subsession_id;
        fetches.push(async move {
            let result = source.fetch_subsession_results(subsession_id).await;
            (slot, result)
        });
    }

    let mut fetched: Vec<_> = past.iter().map(|_| None).collect();
    while let Some((slot, result)) = fetches.next().await {
        fetched[slot] = Some(result);
    }

    let mut diagnostics = ChampionshipDiagnostics {
        excluded_drivers: divisions.excluded_drivers(),
        ..Default::default()
    };
    let mut aggregator = StandingsAggregator::new();

    for (past_session, result) in past.iter().zip(fetched) {
        let subsession_id = past_session.subsession_id;
        let results = match result {
            Some(Ok(results)) => results,
            Some(Err(e)) => {
                tracing::error!("Error processing session {subsession_id}: {e}");
                diagnostics.sessions_failed += 1;
                continue;
            }
            None => continue,
        };

        match score_session(
            past_session.session,
            subsession_id,
            &results,
            &divisions,
            &points_config,
            &penalties,
        ) {
            Some(scored) => {
                diagnostics.sessions_scored += 1;
                diagnostics.unmapped_results += scored.unmapped_results;
                aggregator.add_session(scored);
            }
            None => {
                tracing::warn!("No race results found for session {subsession_id}");
                diagnostics.sessions_skipped += 1;
            }
        }
    }

    if diagnostics.unmapped_results > 0 {
        tracing::info!(
            "{} result rows matched no division",
            diagnostics.unmapped_results
        );
    }

    let table = aggregator.finish(&past, points_config.drop_weeks);

    Ok(ChampionshipStandings {
        division: None,
        standings: table.standings,
        all_divisions: table.all_divisions,
        points_config,
        last_updated: None,
        diagnostics,
    })
}
