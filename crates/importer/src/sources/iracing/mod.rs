mod auth;
mod client;
mod models;

pub use auth::{Credentials, hash_password};
pub use client::{DEFAULT_BASE_URL, IRacingClient};
pub use models::*;

use async_trait::async_trait;
use storage::error::SourceError;
use storage::models::{RosterMember, Session, SubsessionResults};
use storage::services::championship::LeagueDataSource;

#[async_trait]
impl LeagueDataSource for IRacingClient {
    async fn fetch_sessions(
        &self,
        league_id: i64,
        season_id: i64,
    ) -> Result<Vec<Session>, SourceError> {
        Ok(self.season_sessions(league_id, season_id).await?)
    }

    async fn fetch_subsession_results(
        &self,
        subsession_id: i64,
    ) -> Result<SubsessionResults, SourceError> {
        Ok(self.subsession_results(subsession_id).await?)
    }

    async fn fetch_roster(&self, league_id: i64) -> Result<Vec<RosterMember>, SourceError> {
        Ok(self.league_roster(league_id).await?)
    }
}
