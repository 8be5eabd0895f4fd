use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Penalty, SeasonPenalties};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PenaltyQuery {
    /// Stamp the response with the time it was served.
    #[serde(default)]
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PenaltyListResponse {
    /// subsession id -> cust id -> penalty
    #[schema(value_type = Object)]
    pub penalties: SeasonPenalties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Request payload for applying a penalty
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePenaltyRequest {
    pub subsession_id: i64,

    pub cust_id: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = 10000, message = "Penalty points cannot be negative"))]
    pub penalty_points: i64,

    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PenaltyResponse {
    pub success: bool,
    pub penalty: Penalty,
}
