use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::PenaltyRepository;
use crate::error::Result;
use crate::models::{Penalty, PenaltyKey, SeasonPenalties};

#[derive(FromRow)]
struct PenaltyRow {
    subsession_id: i64,
    cust_id: i64,
    penalty_points: i32,
    reason: String,
    created_at: DateTime<Utc>,
}

pub struct PgPenaltyRepository {
    pool: PgPool,
}

impl PgPenaltyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PenaltyRepository for PgPenaltyRepository {
    async fn list_for_season(&self, league_id: i64, season_id: i64) -> Result<SeasonPenalties> {
        let rows = sqlx::query_as::<_, PenaltyRow>(
            r#"
            SELECT subsession_id, cust_id, penalty_points, reason, created_at
            FROM penalties
            WHERE league_id = $1 AND season_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(league_id)
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;

        let mut penalties = SeasonPenalties::default();
        for row in rows {
            penalties.insert(
                row.subsession_id,
                row.cust_id,
                Penalty {
                    points: row.penalty_points.max(0) as u32,
                    reason: row.reason,
                    timestamp: Some(row.created_at),
                },
            );
        }

        Ok(penalties)
    }

    async fn upsert(&self, key: PenaltyKey, penalty: &Penalty) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO penalties
                (league_id, season_id, subsession_id, cust_id, penalty_points, reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()))
            ON CONFLICT (league_id, season_id, subsession_id, cust_id)
            DO UPDATE SET
                penalty_points = EXCLUDED.penalty_points,
                reason = EXCLUDED.reason,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(key.league_id)
        .bind(key.season_id)
        .bind(key.subsession_id)
        .bind(key.cust_id)
        .bind(penalty.points as i32)
        .bind(&penalty.reason)
        .bind(penalty.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: PenaltyKey) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM penalties
            WHERE league_id = $1 AND season_id = $2 AND subsession_id = $3 AND cust_id = $4
            "#,
        )
        .bind(key.league_id)
        .bind(key.season_id)
        .bind(key.subsession_id)
        .bind(key.cust_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
