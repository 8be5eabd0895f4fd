use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    ChampionshipCacheRepository, ClassAssignmentRepository, PenaltyRepository,
    PointsConfigRepository,
};
use crate::dto::championship::ChampionshipStandings;
use crate::error::Result;
use crate::models::{
    ClassAssignment, LegacyClassChange, Penalty, PenaltyKey, PointsConfig, SeasonPenalties,
};

#[derive(Default)]
struct MemoryState {
    points_configs: HashMap<i64, PointsConfig>,
    penalties: HashMap<(i64, i64), SeasonPenalties>,
    assignments: Vec<ClassAssignment>,
    legacy_changes: Vec<LegacyClassChange>,
    championships: HashMap<(i64, i64), ChampionshipStandings>,
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

fn newest_first<T>(
    items: impl DoubleEndedIterator<Item = T>,
    at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut items: Vec<T> = items.rev().collect();
    items.sort_by_key(|item| std::cmp::Reverse(at(item)));
    items
}

#[async_trait]
impl PointsConfigRepository for MemoryStore {
    async fn find(&self, league_id: i64) -> Result<Option<PointsConfig>> {
        Ok(self.state.read().await.points_configs.get(&league_id).cloned())
    }

    async fn save(&self, league_id: i64, config: &PointsConfig) -> Result<()> {
        self.state
            .write()
            .await
            .points_configs
            .insert(league_id, config.clone());
        Ok(())
    }
}

#[async_trait]
impl PenaltyRepository for MemoryStore {
    async fn list_for_season(&self, league_id: i64, season_id: i64) -> Result<SeasonPenalties> {
        Ok(self
            .state
            .read()
            .await
            .penalties
            .get(&(league_id, season_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert(&self, key: PenaltyKey, penalty: &Penalty) -> Result<()> {
        let mut penalty = penalty.clone();
        penalty.timestamp.get_or_insert_with(Utc::now);
        self.state
            .write()
            .await
            .penalties
            .entry((key.league_id, key.season_id))
            .or_default()
            .insert(key.subsession_id, key.cust_id, penalty);
        Ok(())
    }

    async fn delete(&self, key: PenaltyKey) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(season) = state.penalties.get_mut(&(key.league_id, key.season_id)) else {
            return Ok(false);
        };
        Ok(season.remove(key.subsession_id, key.cust_id).is_some())
    }
}

#[async_trait]
impl ClassAssignmentRepository for MemoryStore {
    async fn list_assignments(&self, league_id: i64) -> Result<Vec<ClassAssignment>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .assignments
                .iter()
                .filter(|a| a.league_id == league_id)
                .cloned(),
            |a| a.assigned_at,
        ))
    }

    async fn list_driver_assignments(
        &self,
        league_id: i64,
        cust_id: i64,
    ) -> Result<Vec<ClassAssignment>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .assignments
                .iter()
                .filter(|a| a.league_id == league_id && a.cust_id == cust_id)
                .cloned(),
            |a| a.assigned_at,
        ))
    }

    async fn assign(&self, league_id: i64, cust_id: i64, class_name: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let held = state.assignments.iter().any(|a| {
            a.league_id == league_id && a.cust_id == cust_id && a.class_name == class_name
        });
        if held {
            return Ok(false);
        }

        state.assignments.push(ClassAssignment {
            league_id,
            cust_id,
            class_name: class_name.to_string(),
            assigned_at: Utc::now(),
        });
        Ok(true)
    }

    async fn unassign(&self, league_id: i64, cust_id: i64, class_name: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state.assignments.retain(|a| {
            !(a.league_id == league_id && a.cust_id == cust_id && a.class_name == class_name)
        });
        Ok(state.assignments.len() != before)
    }

    async fn list_legacy_changes(&self, league_id: i64) -> Result<Vec<LegacyClassChange>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .legacy_changes
                .iter()
                .filter(|c| c.league_id == league_id)
                .cloned(),
            |c| c.changed_at,
        ))
    }

    async fn record_legacy_change(&self, change: &LegacyClassChange) -> Result<()> {
        self.state.write().await.legacy_changes.push(change.clone());
        Ok(())
    }
}

#[async_trait]
impl ChampionshipCacheRepository for MemoryStore {
    async fn find(&self, league_id: i64, season_id: i64) -> Result<Option<ChampionshipStandings>> {
        Ok(self
            .state
            .read()
            .await
            .championships
            .get(&(league_id, season_id))
            .cloned())
    }

    async fn store(
        &self,
        league_id: i64,
        season_id: i64,
        standings: &ChampionshipStandings,
        cached_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut standings = standings.clone();
        standings.last_updated = Some(cached_at);
        self.state
            .write()
            .await
            .championships
            .insert((league_id, season_id), standings);
        Ok(())
    }

    async fn invalidate(&self, league_id: i64, season_id: Option<i64>) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.championships.len();
        state.championships.retain(|(league, season), _| {
            *league != league_id || season_id.is_some_and(|s| s != *season)
        });
        Ok((before - state.championships.len()) as u64)
    }
}
