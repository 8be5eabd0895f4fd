use storage::models::{RosterMember, Session};

use crate::Result;
use crate::penalties::PenaltyImport;

/// League data a penalty import is matched against.
pub struct ImportContext {
    pub league_id: i64,
    pub season_id: i64,
    pub sessions: Vec<Session>,
    pub roster: Vec<RosterMember>,
}

/// Turns a steward's report into normalized penalty records. Implementations
/// never write to storage themselves.
#[async_trait::async_trait]
pub trait PenaltyImporter: Send + Sync {
    async fn import(&self, input: &[u8], context: &ImportContext) -> Result<PenaltyImport>;

    fn name(&self) -> &'static str;
}
