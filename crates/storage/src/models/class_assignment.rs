use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Multi-class tag: a driver may hold any number of these per league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassAssignment {
    pub league_id: i64,
    pub cust_id: i64,
    pub class_name: String,
    pub assigned_at: DateTime<Utc>,
}

/// Legacy single-class reassignment. Only the most recent change per driver
/// is effective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LegacyClassChange {
    pub league_id: i64,
    pub cust_id: i64,
    pub old_class: Option<String>,
    pub new_class: String,
    pub changed_at: DateTime<Utc>,
}
