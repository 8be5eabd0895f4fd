use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest deduction a single penalty may carry.
pub const MAX_PENALTY_POINTS: u32 = 10_000;

/// Identifies the single active penalty slot for a driver in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PenaltyKey {
    pub league_id: i64,
    pub season_id: i64,
    pub subsession_id: i64,
    pub cust_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Penalty {
    pub points: u32,
    pub reason: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Penalties of one season, keyed by subsession then driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonPenalties(BTreeMap<i64, BTreeMap<i64, Penalty>>);

impl SeasonPenalties {
    pub fn get(&self, subsession_id: i64, cust_id: i64) -> Option<&Penalty> {
        self.0.get(&subsession_id).and_then(|by_driver| by_driver.get(&cust_id))
    }

    /// Points deducted for a driver in a session; 0 when no penalty exists.
    pub fn points_for(&self, subsession_id: i64, cust_id: i64) -> u32 {
        self.get(subsession_id, cust_id).map_or(0, |p| p.points)
    }

    pub fn insert(&mut self, subsession_id: i64, cust_id: i64, penalty: Penalty) {
        self.0
            .entry(subsession_id)
            .or_default()
            .insert(cust_id, penalty);
    }

    pub fn remove(&mut self, subsession_id: i64, cust_id: i64) -> Option<Penalty> {
        let by_driver = self.0.get_mut(&subsession_id)?;
        let removed = by_driver.remove(&cust_id);
        if by_driver.is_empty() {
            self.0.remove(&subsession_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn penalty(points: u32) -> Penalty {
        Penalty {
            points,
            reason: "Causing a collision".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_missing_penalty_is_zero() {
        let penalties = SeasonPenalties::default();
        assert_eq!(penalties.points_for(1, 2), 0);
        assert!(penalties.get(1, 2).is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut penalties = SeasonPenalties::default();
        penalties.insert(10, 1, penalty(5));
        penalties.insert(10, 1, penalty(3));
        assert_eq!(penalties.points_for(10, 1), 3);
        assert_eq!(penalties.len(), 1);
    }

    #[test]
    fn test_remove_cleans_up_empty_sessions() {
        let mut penalties = SeasonPenalties::default();
        penalties.insert(10, 1, penalty(5));
        assert_eq!(penalties.remove(10, 1), Some(penalty(5)));
        assert!(penalties.is_empty());
        assert!(penalties.remove(10, 1).is_none());
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut penalties = SeasonPenalties::default();
        penalties.insert(10, 1, penalty(5));
        let json = serde_json::to_value(&penalties).unwrap();
        assert_eq!(json["10"]["1"]["points"], 5);
    }
}
