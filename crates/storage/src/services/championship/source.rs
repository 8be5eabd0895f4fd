use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{RosterMember, Session, SubsessionResults};

/// Read access to the racing service a league runs on.
#[async_trait]
pub trait LeagueDataSource: Send + Sync {
    /// Every session scheduled for the season, past and future.
    async fn fetch_sessions(
        &self,
        league_id: i64,
        season_id: i64,
    ) -> Result<Vec<Session>, SourceError>;

    async fn fetch_subsession_results(
        &self,
        subsession_id: i64,
    ) -> Result<SubsessionResults, SourceError>;

    async fn fetch_roster(&self, league_id: i64) -> Result<Vec<RosterMember>, SourceError>;
}
