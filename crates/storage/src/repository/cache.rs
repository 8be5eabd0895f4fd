use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use super::ChampionshipCacheRepository;
use crate::dto::championship::ChampionshipStandings;
use crate::error::Result;

#[derive(FromRow)]
struct CachedChampionshipRow {
    data: Json<ChampionshipStandings>,
    cached_at: DateTime<Utc>,
}

pub struct PgChampionshipCacheRepository {
    pool: PgPool,
}

impl PgChampionshipCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChampionshipCacheRepository for PgChampionshipCacheRepository {
    async fn find(&self, league_id: i64, season_id: i64) -> Result<Option<ChampionshipStandings>> {
        let row = sqlx::query_as::<_, CachedChampionshipRow>(
            r#"
            SELECT data, cached_at
            FROM cached_championships
            WHERE league_id = $1 AND season_id = $2
            "#,
        )
        .bind(league_id)
        .bind(season_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let mut standings = row.data.0;
            standings.last_updated = Some(row.cached_at);
            standings
        }))
    }

    async fn store(
        &self,
        league_id: i64,
        season_id: i64,
        standings: &ChampionshipStandings,
        cached_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cached_championships (league_id, season_id, data, cached_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (league_id, season_id)
            DO UPDATE SET
                data = EXCLUDED.data,
                cached_at = EXCLUDED.cached_at
            "#,
        )
        .bind(league_id)
        .bind(season_id)
        .bind(Json(standings))
        .bind(cached_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn invalidate(&self, league_id: i64, season_id: Option<i64>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM cached_championships
            WHERE league_id = $1 AND ($2::BIGINT IS NULL OR season_id = $2)
            "#,
        )
        .bind(league_id)
        .bind(season_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
