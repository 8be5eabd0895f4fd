use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scheduled league session within a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub subsession_id: Option<i64>,
    pub session_name: String,
    pub track_name: String,
    pub launch_at: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
}

impl Session {
    /// Launch time, falling back to the scheduled start time.
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.launch_at.or(self.start_time)
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        matches!(self.scheduled_at(), Some(at) if at <= now)
    }

    /// The subsession id when this session has run and can be scored.
    pub fn scorable_subsession(&self, now: DateTime<Utc>) -> Option<i64> {
        self.subsession_id.filter(|_| self.is_past(now))
    }
}

/// One row of a race sub-session result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionResult {
    pub cust_id: i64,
    pub display_name: String,
    pub car_number: Option<String>,
    /// 1-based finishing position in the whole field.
    pub finish_position: u32,
    /// 0-based grid slot as reported upstream.
    pub starting_position: i32,
    /// Best lap in ten-thousandths of a second; `<= 0` means no lap set.
    pub best_lap_time: i64,
    pub car_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QualifyResult {
    pub cust_id: i64,
    /// `<= 0` means no qualifying time set.
    pub best_qual_lap_time: i64,
}

impl QualifyResult {
    pub fn has_time(&self) -> bool {
        self.best_qual_lap_time > 0
    }
}

/// Race and qualifying rows of one subsession.
///
/// `None` means the subsession carried no sub-session of that type at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsessionResults {
    pub race_results: Option<Vec<SessionResult>>,
    pub qualify_results: Option<Vec<QualifyResult>>,
}
