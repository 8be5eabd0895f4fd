use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Database;
use crate::dto::championship::ChampionshipStandings;
use crate::error::Result;
use crate::models::{
    ClassAssignment, LegacyClassChange, Penalty, PenaltyKey, PointsConfig, SeasonPenalties,
};

pub mod cache;
pub mod class_assignment;
pub mod memory;
pub mod penalty;
pub mod points_config;

pub use cache::PgChampionshipCacheRepository;
pub use class_assignment::PgClassAssignmentRepository;
pub use memory::MemoryStore;
pub use penalty::PgPenaltyRepository;
pub use points_config::PgPointsConfigRepository;

#[async_trait]
pub trait PointsConfigRepository: Send + Sync {
    /// Stored configuration of a league, if one was ever saved.
    async fn find(&self, league_id: i64) -> Result<Option<PointsConfig>>;

    async fn save(&self, league_id: i64, config: &PointsConfig) -> Result<()>;
}

#[async_trait]
pub trait PenaltyRepository: Send + Sync {
    async fn list_for_season(&self, league_id: i64, season_id: i64) -> Result<SeasonPenalties>;

    /// Inserts or replaces the penalty stored under `key`.
    async fn upsert(&self, key: PenaltyKey, penalty: &Penalty) -> Result<()>;

    /// Returns whether a penalty existed.
    async fn delete(&self, key: PenaltyKey) -> Result<bool>;
}

#[async_trait]
pub trait ClassAssignmentRepository: Send + Sync {
    /// Multi-class tags of a league, most recent first.
    async fn list_assignments(&self, league_id: i64) -> Result<Vec<ClassAssignment>>;

    async fn list_driver_assignments(
        &self,
        league_id: i64,
        cust_id: i64,
    ) -> Result<Vec<ClassAssignment>>;

    /// Returns `false` when the driver already held the class.
    async fn assign(&self, league_id: i64, cust_id: i64, class_name: &str) -> Result<bool>;

    /// Returns `false` when the driver did not hold the class.
    async fn unassign(&self, league_id: i64, cust_id: i64, class_name: &str) -> Result<bool>;

    /// Legacy single-class changes of a league, most recent first.
    async fn list_legacy_changes(&self, league_id: i64) -> Result<Vec<LegacyClassChange>>;

    async fn record_legacy_change(&self, change: &LegacyClassChange) -> Result<()>;
}

#[async_trait]
pub trait ChampionshipCacheRepository: Send + Sync {
    /// Cached standings with `last_updated` set to the time they were cached.
    async fn find(&self, league_id: i64, season_id: i64) -> Result<Option<ChampionshipStandings>>;

    async fn store(
        &self,
        league_id: i64,
        season_id: i64,
        standings: &ChampionshipStandings,
        cached_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Drops cached standings for one season, or for every season of the
    /// league when `season_id` is `None`. Returns the number removed.
    async fn invalidate(&self, league_id: i64, season_id: Option<i64>) -> Result<u64>;
}

/// The set of stores the application runs against, chosen once at startup.
#[derive(Clone)]
pub struct Stores {
    pub points_configs: Arc<dyn PointsConfigRepository>,
    pub penalties: Arc<dyn PenaltyRepository>,
    pub class_assignments: Arc<dyn ClassAssignmentRepository>,
    pub championship_cache: Arc<dyn ChampionshipCacheRepository>,
}

impl Stores {
    pub fn postgres(db: &Database) -> Self {
        let pool = db.pool().clone();
        Self {
            points_configs: Arc::new(PgPointsConfigRepository::new(pool.clone())),
            penalties: Arc::new(PgPenaltyRepository::new(pool.clone())),
            class_assignments: Arc::new(PgClassAssignmentRepository::new(pool.clone())),
            championship_cache: Arc::new(PgChampionshipCacheRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            points_configs: store.clone(),
            penalties: store.clone(),
            class_assignments: store.clone(),
            championship_cache: store,
        }
    }
}
