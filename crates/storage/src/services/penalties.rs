use chrono::Utc;

use crate::error::{Result, StorageError};
use crate::models::{MAX_PENALTY_POINTS, Penalty, PenaltyKey, SeasonPenalties};
use crate::repository::Stores;

pub async fn list_penalties(
    stores: &Stores,
    league_id: i64,
    season_id: i64,
) -> Result<SeasonPenalties> {
    stores.penalties.list_for_season(league_id, season_id).await
}

/// Replaces any penalty already held under `key`.
pub async fn save_penalty(
    stores: &Stores,
    key: PenaltyKey,
    points: u32,
    reason: String,
) -> Result<Penalty> {
    if points > MAX_PENALTY_POINTS {
        return Err(StorageError::ConstraintViolation(format!(
            "Penalty of {points} points exceeds the maximum of {MAX_PENALTY_POINTS}"
        )));
    }

    let penalty = Penalty {
        points,
        reason,
        timestamp: Some(Utc::now()),
    };

    stores.penalties.upsert(key, &penalty).await?;
    stores
        .championship_cache
        .invalidate(key.league_id, Some(key.season_id))
        .await?;

    tracing::info!(
        "Penalty of {} points saved for driver {} in subsession {}",
        points,
        key.cust_id,
        key.subsession_id
    );
    Ok(penalty)
}

pub async fn delete_penalty(stores: &Stores, key: PenaltyKey) -> Result<bool> {
    let removed = stores.penalties.delete(key).await?;
    if removed {
        stores
            .championship_cache
            .invalidate(key.league_id, Some(key.season_id))
            .await?;
        tracing::info!(
            "Penalty removed for driver {} in subsession {}",
            key.cust_id,
            key.subsession_id
        );
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::championship::ChampionshipStandings;
    use crate::models::PointsConfig;

    fn key() -> PenaltyKey {
        PenaltyKey {
            league_id: 1,
            season_id: 2,
            subsession_id: 300,
            cust_id: 4,
        }
    }

    async fn seed_cache(stores: &Stores) {
        let standings = ChampionshipStandings {
            division: None,
            standings: Default::default(),
            all_divisions: Vec::new(),
            points_config: PointsConfig::default(),
            last_updated: None,
            diagnostics: Default::default(),
        };
        stores
            .championship_cache
            .store(1, 2, &standings, Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_penalty_invalidates_cache() {
        let stores = Stores::in_memory();
        seed_cache(&stores).await;

        let saved = save_penalty(&stores, key(), 5, "Divebomb".to_string())
            .await
            .unwrap();
        assert_eq!(saved.points, 5);
        assert!(saved.timestamp.is_some());

        assert!(stores.championship_cache.find(1, 2).await.unwrap().is_none());
        let penalties = list_penalties(&stores, 1, 2).await.unwrap();
        assert_eq!(penalties.points_for(300, 4), 5);
    }

    #[tokio::test]
    async fn test_save_penalty_rejects_points_over_cap() {
        let stores = Stores::in_memory();
        seed_cache(&stores).await;

        let err = save_penalty(&stores, key(), MAX_PENALTY_POINTS + 1, "Typo".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));

        assert!(stores.championship_cache.find(1, 2).await.unwrap().is_some());
        let penalties = list_penalties(&stores, 1, 2).await.unwrap();
        assert_eq!(penalties.get(300, 4), None);

        let saved = save_penalty(&stores, key(), MAX_PENALTY_POINTS, "Ban".to_string())
            .await
            .unwrap();
        assert_eq!(saved.points, MAX_PENALTY_POINTS);
    }

    #[tokio::test]
    async fn test_delete_missing_penalty_keeps_cache() {
        let stores = Stores::in_memory();
        seed_cache(&stores).await;

        assert!(!delete_penalty(&stores, key()).await.unwrap());
        assert!(stores.championship_cache.find(1, 2).await.unwrap().is_some());
    }
}
