use chrono::{DateTime, Utc};
use serde::Deserialize;
use storage::models::{QualifyResult, RosterMember, Session, SessionResult, SubsessionResults};

pub const RACE_SIMSESSION: &str = "RACE";
pub const QUALIFY_SIMSESSION: &str = "QUALIFY";

const UNKNOWN_TRACK: &str = "Unknown Track";

#[derive(Debug, Deserialize)]
pub struct SeasonSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<ApiSession>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSession {
    pub subsession_id: Option<i64>,
    pub session_name: Option<String>,
    pub private_session_name: Option<String>,
    pub launch_at: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTrack {
    pub track_name: Option<String>,
}

impl From<ApiSession> for Session {
    fn from(api: ApiSession) -> Self {
        Self {
            subsession_id: api.subsession_id,
            session_name: api
                .session_name
                .or(api.private_session_name)
                .unwrap_or_default(),
            track_name: api
                .track
                .and_then(|track| track.track_name)
                .unwrap_or_else(|| UNKNOWN_TRACK.to_string()),
            launch_at: api.launch_at,
            start_time: api.start_time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubsessionResponse {
    pub session_results: Option<Vec<SimSession>>,
}

#[derive(Debug, Deserialize)]
pub struct SimSession {
    pub simsession_name: String,
    pub results: Option<Vec<ApiResultRow>>,
}

/// Upstream positions are 0-based.
#[derive(Debug, Deserialize)]
pub struct ApiResultRow {
    pub cust_id: i64,
    #[serde(default)]
    pub display_name: String,
    pub car_number: Option<String>,
    #[serde(default)]
    pub finish_position: u32,
    #[serde(default)]
    pub starting_position: i32,
    #[serde(default)]
    pub best_lap_time: i64,
    #[serde(default)]
    pub best_qual_lap_time: i64,
    pub car_name: Option<String>,
}

impl SubsessionResponse {
    fn rows(&self, simsession_name: &str) -> Option<&[ApiResultRow]> {
        self.session_results
            .as_deref()?
            .iter()
            .find(|sim| sim.simsession_name == simsession_name)
            .and_then(|sim| sim.results.as_deref())
    }
}

impl From<SubsessionResponse> for SubsessionResults {
    fn from(response: SubsessionResponse) -> Self {
        let race_results = response.rows(RACE_SIMSESSION).map(|rows| {
            rows.iter()
                .map(|row| SessionResult {
                    cust_id: row.cust_id,
                    display_name: row.display_name.clone(),
                    car_number: row.car_number.clone(),
                    finish_position: row.finish_position + 1,
                    starting_position: row.starting_position,
                    best_lap_time: row.best_lap_time,
                    car_name: row.car_name.clone(),
                })
                .collect()
        });
        let qualify_results = response.rows(QUALIFY_SIMSESSION).map(|rows| {
            rows.iter()
                .map(|row| QualifyResult {
                    cust_id: row.cust_id,
                    best_qual_lap_time: row.best_qual_lap_time,
                })
                .collect()
        });

        Self {
            race_results,
            qualify_results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeagueResponse {
    #[serde(default)]
    pub roster: Vec<ApiRosterMember>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRosterMember {
    pub cust_id: i64,
    #[serde(default)]
    pub display_name: String,
    pub car_number: Option<String>,
    pub nick_name: Option<String>,
}

impl From<ApiRosterMember> for RosterMember {
    fn from(api: ApiRosterMember) -> Self {
        Self {
            cust_id: api.cust_id,
            display_name: api.display_name,
            car_number: api.car_number,
            nick_name: api.nick_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_falls_back_to_private_name() {
        let api: ApiSession = serde_json::from_str(
            r#"{
                "subsession_id": 71234567,
                "private_session_name": "Round 3 - Spa",
                "launch_at": "2025-03-04T19:30:00Z",
                "track": {"track_id": 163, "track_name": "Circuit de Spa-Francorchamps"}
            }"#,
        )
        .unwrap();
        let session = Session::from(api);

        assert_eq!(session.session_name, "Round 3 - Spa");
        assert_eq!(session.track_name, "Circuit de Spa-Francorchamps");
        assert!(session.launch_at.is_some());
        assert!(session.start_time.is_none());
    }

    #[test]
    fn test_unscheduled_session_has_unknown_track() {
        let api: ApiSession = serde_json::from_str(r#"{"session_name": "TBD"}"#).unwrap();
        let session = Session::from(api);
        assert_eq!(session.subsession_id, None);
        assert_eq!(session.track_name, "Unknown Track");
    }

    #[test]
    fn test_race_and_qualify_rows_are_selected_by_exact_name() {
        let response: SubsessionResponse = serde_json::from_str(
            r#"{
                "session_results": [
                    {"simsession_name": "QUALIFY", "results": [
                        {"cust_id": 1, "display_name": "A", "best_qual_lap_time": 912345},
                        {"cust_id": 2, "display_name": "B", "best_qual_lap_time": -1}
                    ]},
                    {"simsession_name": "RACE WARMUP", "results": [
                        {"cust_id": 9, "display_name": "Z", "finish_position": 0}
                    ]},
                    {"simsession_name": "RACE", "results": [
                        {"cust_id": 2, "display_name": "B", "finish_position": 0,
                         "starting_position": 1, "best_lap_time": 920000, "car_name": "Ferrari 296 GT3"},
                        {"cust_id": 1, "display_name": "A", "finish_position": 1,
                         "starting_position": 0, "best_lap_time": -1}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let results = SubsessionResults::from(response);

        let race = results.race_results.unwrap();
        assert_eq!(race.len(), 2);
        assert_eq!(race[0].cust_id, 2);
        assert_eq!(race[0].finish_position, 1);
        assert_eq!(race[1].finish_position, 2);
        assert_eq!(race[1].car_name, None);

        let qualify = results.qualify_results.unwrap();
        assert_eq!(qualify[0].best_qual_lap_time, 912345);
        assert!(!qualify[1].has_time());
    }

    #[test]
    fn test_missing_race_session_yields_none() {
        let response: SubsessionResponse = serde_json::from_str(
            r#"{"session_results": [{"simsession_name": "PRACTICE", "results": []}]}"#,
        )
        .unwrap();
        let results = SubsessionResults::from(response);
        assert!(results.race_results.is_none());
        assert!(results.qualify_results.is_none());
    }
}
