use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};

use super::PointsConfigRepository;
use crate::error::Result;
use crate::models::PointsConfig;

#[derive(FromRow)]
struct PointsConfigRow {
    name: String,
    points: Json<BTreeMap<u32, i32>>,
    drop_weeks: i32,
    fastest_lap_points: i32,
    pole_position_points: i32,
}

impl From<PointsConfigRow> for PointsConfig {
    fn from(row: PointsConfigRow) -> Self {
        Self {
            name: row.name,
            points: row.points.0,
            drop_weeks: row.drop_weeks.max(0) as u32,
            fastest_lap_points: row.fastest_lap_points.max(0) as u32,
            pole_position_points: row.pole_position_points.max(0) as u32,
        }
    }
}

pub struct PgPointsConfigRepository {
    pool: PgPool,
}

impl PgPointsConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointsConfigRepository for PgPointsConfigRepository {
    async fn find(&self, league_id: i64) -> Result<Option<PointsConfig>> {
        let row = sqlx::query_as::<_, PointsConfigRow>(
            r#"
            SELECT name, points, drop_weeks, fastest_lap_points, pole_position_points
            FROM points_configs
            WHERE league_id = $1
            "#,
        )
        .bind(league_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PointsConfig::from))
    }

    async fn save(&self, league_id: i64, config: &PointsConfig) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO points_configs
                (league_id, name, points, drop_weeks, fastest_lap_points, pole_position_points)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (league_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                points = EXCLUDED.points,
                drop_weeks = EXCLUDED.drop_weeks,
                fastest_lap_points = EXCLUDED.fastest_lap_points,
                pole_position_points = EXCLUDED.pole_position_points,
                updated_at = NOW()
            "#,
        )
        .bind(league_id)
        .bind(&config.name)
        .bind(Json(&config.points))
        .bind(config.drop_weeks as i32)
        .bind(config.fastest_lap_points as i32)
        .bind(config.pole_position_points as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
