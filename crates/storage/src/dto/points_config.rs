use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::PointsConfig;

/// Upper bound for the points awarded to a single finishing position.
pub const MAX_POSITION_POINTS: i32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointsConfigResponse {
    pub config: PointsConfig,
    pub presets: BTreeMap<String, PointsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavePointsConfigResponse {
    pub success: bool,
    pub config: PointsConfig,
}

/// Request payload for saving a league's points configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePointsConfigRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Points configuration cannot be empty"),
        custom(function = "validate_positions")
    )]
    #[schema(value_type = Object)]
    pub points: BTreeMap<i64, i32>,

    #[serde(default)]
    #[validate(range(min = 0, max = 1000, message = "Drop weeks must be between 0 and 1000"))]
    pub drop_weeks: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = 1000, message = "Fastest lap points must be between 0 and 1000"))]
    pub fastest_lap_points: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = 1000, message = "Pole position points must be between 0 and 1000"))]
    pub pole_position_points: i64,
}

fn validate_positions(points: &BTreeMap<i64, i32>) -> Result<(), validator::ValidationError> {
    if !points.keys().all(|position| (1..=i64::from(u32::MAX)).contains(position)) {
        return Err(validator::ValidationError::new("invalid_position")
            .with_message("Positions must be 1 or greater".into()));
    }
    if !points.values().all(|value| (0..=MAX_POSITION_POINTS).contains(value)) {
        return Err(validator::ValidationError::new("invalid_points")
            .with_message(format!("Points must be between 0 and {MAX_POSITION_POINTS}").into()));
    }
    Ok(())
}

impl UpdatePointsConfigRequest {
    /// Converts a validated request into the stored configuration.
    pub fn into_config(self) -> PointsConfig {
        PointsConfig {
            name: self.name,
            points: self
                .points
                .into_iter()
                .map(|(position, points)| (position as u32, points))
                .collect(),
            drop_weeks: self.drop_weeks as u32,
            fastest_lap_points: self.fastest_lap_points as u32,
            pole_position_points: self.pole_position_points as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> UpdatePointsConfigRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_valid_request_converts() {
        let req = request(serde_json::json!({
            "name": "Sprint",
            "points": {"1": 10, "2": 8, "3": 6},
            "dropWeeks": 1,
            "fastestLapPoints": 1
        }));
        assert!(req.validate().is_ok());

        let config = req.into_config();
        assert_eq!(config.points_for(2), 8);
        assert_eq!(config.drop_weeks, 1);
        assert_eq!(config.fastest_lap_points, 1);
        assert_eq!(config.pole_position_points, 0);
    }

    #[test]
    fn test_rejects_empty_points() {
        let req = request(serde_json::json!({"name": "Empty", "points": {}}));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("points"));
    }

    #[test]
    fn test_rejects_position_zero() {
        let req = request(serde_json::json!({"name": "Bad", "points": {"0": 10}}));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_points() {
        let req = request(serde_json::json!({"name": "Bad", "points": {"1": 2147483647}}));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("points"));

        let req = request(serde_json::json!({"name": "Bad", "points": {"1": -5}}));
        assert!(req.validate().is_err());

        let req = request(serde_json::json!({"name": "Max", "points": {"1": 10000}}));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_bonuses() {
        let req = request(serde_json::json!({
            "name": "Bad",
            "points": {"1": 10},
            "dropWeeks": -1
        }));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("drop_weeks"));
    }

    #[test]
    fn test_rejects_missing_name() {
        let req = request(serde_json::json!({"name": "", "points": {"1": 10}}));
        assert!(req.validate().is_err());
    }
}
