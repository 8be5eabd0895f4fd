use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{DriverStanding, PointsConfig};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChampionshipQuery {
    /// Narrow the response to a single division.
    pub division: Option<String>,
    /// Serve previously cached standings when available.
    #[serde(default)]
    pub cached: bool,
}

/// Counters describing what the computation did with its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChampionshipDiagnostics {
    pub sessions_scored: u32,
    pub sessions_skipped: u32,
    pub sessions_failed: u32,
    /// Result rows whose driver maps to no division (absent from roster).
    pub unmapped_results: u32,
    pub excluded_drivers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChampionshipStandings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    pub standings: BTreeMap<String, Vec<DriverStanding>>,
    /// Divisions in the order they first scored points.
    pub all_divisions: Vec<String>,
    pub points_config: PointsConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub diagnostics: ChampionshipDiagnostics,
}

impl ChampionshipStandings {
    pub fn has_division(&self, division: &str) -> bool {
        self.standings.contains_key(division)
    }

    /// Keeps only `division`'s table when it exists; `all_divisions` is left
    /// intact. Returns the full standings otherwise.
    pub fn narrow_to(mut self, division: Option<&str>) -> Self {
        if let Some(division) = division
            && let Some(table) = self.standings.remove(division)
        {
            self.standings = BTreeMap::from([(division.to_string(), table)]);
            self.division = Some(division.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheRefreshResponse {
    pub success: bool,
    pub message: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheClearResponse {
    pub success: bool,
    pub message: String,
    pub cleared_entries: u64,
}
