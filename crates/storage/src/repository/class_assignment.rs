use async_trait::async_trait;
use sqlx::PgPool;

use super::ClassAssignmentRepository;
use crate::error::Result;
use crate::models::{ClassAssignment, LegacyClassChange};

pub struct PgClassAssignmentRepository {
    pool: PgPool,
}

impl PgClassAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassAssignmentRepository for PgClassAssignmentRepository {
    async fn list_assignments(&self, league_id: i64) -> Result<Vec<ClassAssignment>> {
        let assignments = sqlx::query_as::<_, ClassAssignment>(
            r#"
            SELECT league_id, cust_id, class_name, assigned_at
            FROM driver_class_assignments
            WHERE league_id = $1
            ORDER BY assigned_at DESC, assignment_id DESC
            "#,
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn list_driver_assignments(
        &self,
        league_id: i64,
        cust_id: i64,
    ) -> Result<Vec<ClassAssignment>> {
        let assignments = sqlx::query_as::<_, ClassAssignment>(
            r#"
            SELECT league_id, cust_id, class_name, assigned_at
            FROM driver_class_assignments
            WHERE league_id = $1 AND cust_id = $2
            ORDER BY assigned_at DESC, assignment_id DESC
            "#,
        )
        .bind(league_id)
        .bind(cust_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn assign(&self, league_id: i64, cust_id: i64, class_name: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO driver_class_assignments (league_id, cust_id, class_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (league_id, cust_id, class_name) DO NOTHING
            "#,
        )
        .bind(league_id)
        .bind(cust_id)
        .bind(class_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unassign(&self, league_id: i64, cust_id: i64, class_name: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM driver_class_assignments
            WHERE league_id = $1 AND cust_id = $2 AND class_name = $3
            "#,
        )
        .bind(league_id)
        .bind(cust_id)
        .bind(class_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_legacy_changes(&self, league_id: i64) -> Result<Vec<LegacyClassChange>> {
        let changes = sqlx::query_as::<_, LegacyClassChange>(
            r#"
            SELECT league_id, cust_id, old_class, new_class, changed_at
            FROM driver_class_changes
            WHERE league_id = $1
            ORDER BY changed_at DESC, change_id DESC
            "#,
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(changes)
    }

    async fn record_legacy_change(&self, change: &LegacyClassChange) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO driver_class_changes (league_id, cust_id, old_class, new_class, changed_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(change.league_id)
        .bind(change.cust_id)
        .bind(&change.old_class)
        .bind(&change.new_class)
        .bind(change.changed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
