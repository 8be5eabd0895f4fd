use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Session;

pub const MISSED_RACE_CAR_NAME: &str = "No Car (Did Not Participate)";

/// Itemized outcome of one session for one driver in one division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RaceRecord {
    pub session_name: String,
    pub track_name: String,
    pub date: Option<DateTime<Utc>>,
    pub division_position: Option<u32>,
    pub overall_position: Option<u32>,
    /// 1-based grid slot.
    pub starting_position: Option<i32>,
    pub position_points: i32,
    pub fastest_lap_points: u32,
    pub pole_position_points: u32,
    pub penalty_points: u32,
    pub penalty_reason: String,
    /// Position points plus bonuses minus penalty. Can be negative.
    pub total_points: i32,
    pub fastest_lap: bool,
    pub pole_position: bool,
    pub best_lap_time: i64,
    pub car_name: String,
    pub subsession_id: i64,
    pub attended: bool,
    pub dropped: bool,
}

impl RaceRecord {
    /// Zero-point placeholder for a session the driver did not take part in.
    pub fn missed(session: &Session, subsession_id: i64) -> Self {
        Self {
            session_name: session.session_name.clone(),
            track_name: session.track_name.clone(),
            date: session.scheduled_at(),
            division_position: None,
            overall_position: None,
            starting_position: None,
            position_points: 0,
            fastest_lap_points: 0,
            pole_position_points: 0,
            penalty_points: 0,
            penalty_reason: String::new(),
            total_points: 0,
            fastest_lap: false,
            pole_position: false,
            best_lap_time: 0,
            car_name: MISSED_RACE_CAR_NAME.to_string(),
            subsession_id,
            attended: false,
            dropped: false,
        }
    }

    /// Whether this record contributes to the championship total.
    pub fn counts(&self) -> bool {
        self.attended && !self.dropped
    }
}

/// One row of a division's championship table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DriverStanding {
    pub cust_id: i64,
    pub display_name: String,
    pub car_number: Option<String>,
    pub division: String,
    pub manual_assignment: bool,
    pub multiple_classes: bool,
    pub all_classes: Vec<String>,
    pub primary_class: String,
    pub total_points: i32,
    pub dropped_races: u32,
    /// Chronological, one entry per past session of the season.
    pub races: Vec<RaceRecord>,
    pub championship_position: u32,
}
