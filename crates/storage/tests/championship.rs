use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use storage::error::{ChampionshipError, SourceError};
use storage::models::{
    PenaltyKey, PointsConfig, QualifyResult, RosterMember, Session, SessionResult,
    SubsessionResults,
};
use storage::repository::Stores;
use storage::services::championship::{
    ChampionshipRequest, LeagueDataSource, clear_cache, compute_championship, refresh_cache,
};
use storage::services::{class_assignments, penalties, points_config};

const LEAGUE: i64 = 4242;
const SEASON: i64 = 77;

#[derive(Default)]
struct FakeSource {
    sessions: Vec<Session>,
    results: HashMap<i64, SubsessionResults>,
    roster: Vec<RosterMember>,
    fail_roster: bool,
}

#[async_trait]
impl LeagueDataSource for FakeSource {
    async fn fetch_sessions(
        &self,
        _league_id: i64,
        _season_id: i64,
    ) -> Result<Vec<Session>, SourceError> {
        Ok(self.sessions.clone())
    }

    async fn fetch_subsession_results(
        &self,
        subsession_id: i64,
    ) -> Result<SubsessionResults, SourceError> {
        self.results
            .get(&subsession_id)
            .cloned()
            .ok_or_else(|| format!("subsession {subsession_id} timed out").into())
    }

    async fn fetch_roster(&self, _league_id: i64) -> Result<Vec<RosterMember>, SourceError> {
        if self.fail_roster {
            return Err("roster unavailable".into());
        }
        Ok(self.roster.clone())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn session(subsession_id: i64, weeks_ago: i64) -> Session {
    Session {
        subsession_id: Some(subsession_id),
        session_name: format!("Round {subsession_id}"),
        track_name: "Oulton Park".to_string(),
        launch_at: Some(now() - Duration::weeks(weeks_ago)),
        start_time: None,
    }
}

fn member(cust_id: i64, nick_name: Option<&str>) -> RosterMember {
    RosterMember {
        cust_id,
        display_name: format!("Driver {cust_id}"),
        car_number: Some(cust_id.to_string()),
        nick_name: nick_name.map(str::to_string),
    }
}

fn finish(cust_id: i64, finish_position: u32, best_lap_time: i64) -> SessionResult {
    SessionResult {
        cust_id,
        display_name: format!("Driver {cust_id}"),
        car_number: Some(cust_id.to_string()),
        finish_position,
        starting_position: 0,
        best_lap_time,
        car_name: Some("BMW M4 GT3".to_string()),
    }
}

fn race(rows: Vec<SessionResult>) -> SubsessionResults {
    SubsessionResults {
        race_results: Some(rows),
        qualify_results: None,
    }
}

fn simple_config() -> PointsConfig {
    PointsConfig {
        name: "Simple".to_string(),
        points: BTreeMap::from([(1, 25), (2, 18), (3, 15)]),
        drop_weeks: 0,
        fastest_lap_points: 0,
        pole_position_points: 0,
    }
}

fn request() -> ChampionshipRequest {
    ChampionshipRequest {
        league_id: LEAGUE,
        season_id: SEASON,
        division: None,
        cached: false,
        now: now(),
    }
}

async fn stores_with(config: PointsConfig) -> Stores {
    let stores = Stores::in_memory();
    points_config::save_points_config(&stores, LEAGUE, &config)
        .await
        .unwrap();
    stores
}

/// Driver 1 wins round 1 and misses round 2; driver 2 finishes 2nd then 1st.
fn two_round_source() -> FakeSource {
    FakeSource {
        sessions: vec![session(1001, 2), session(1002, 1)],
        results: HashMap::from([
            (1001, race(vec![finish(1, 1, 0), finish(2, 2, 0)])),
            (1002, race(vec![finish(2, 1, 0)])),
        ]),
        roster: vec![member(1, None), member(2, None)],
        fail_roster: false,
    }
}

#[tokio::test]
async fn test_missed_race_example() {
    let stores = stores_with(simple_config()).await;
    let source = two_round_source();

    let result = compute_championship(&source, &stores, &request())
        .await
        .unwrap();
    let overall = &result.standings["Overall"];

    assert_eq!(overall[0].cust_id, 2);
    assert_eq!(overall[0].total_points, 43);
    assert_eq!(overall[0].championship_position, 1);
    assert_eq!(overall[1].cust_id, 1);
    assert_eq!(overall[1].total_points, 25);
    assert_eq!(overall[1].championship_position, 2);
    assert!(!overall[1].races[1].attended);
    assert_eq!(result.all_divisions, vec!["Overall"]);
    assert_eq!(result.diagnostics.sessions_scored, 2);
}

#[tokio::test]
async fn test_future_sessions_are_ignored() {
    let stores = stores_with(simple_config()).await;
    let mut source = two_round_source();
    source.sessions.push(session(1003, -1));
    source.sessions.push(Session {
        subsession_id: None,
        ..session(0, 3)
    });

    let result = compute_championship(&source, &stores, &request())
        .await
        .unwrap();

    for driver in &result.standings["Overall"] {
        assert_eq!(driver.races.len(), 2);
    }
}

#[tokio::test]
async fn test_multi_class_driver_has_independent_rows() {
    let stores = stores_with(simple_config()).await;
    class_assignments::assign_class(&stores, LEAGUE, 1, "GT3")
        .await
        .unwrap();
    let source = FakeSource {
        sessions: vec![session(1001, 1)],
        results: HashMap::from([(
            1001,
            race(vec![finish(2, 1, 0), finish(1, 2, 0), finish(3, 3, 0)]),
        )]),
        roster: vec![member(1, None), member(2, Some("[GT4] Two")), member(3, None)],
        fail_roster: false,
    };

    let result = compute_championship(&source, &stores, &request())
        .await
        .unwrap();

    let gt3 = &result.standings["GT3"];
    assert_eq!(gt3.len(), 1);
    assert_eq!(gt3[0].cust_id, 1);
    assert_eq!(gt3[0].championship_position, 1);
    assert_eq!(gt3[0].total_points, 25);
    assert!(gt3[0].manual_assignment);

    let overall = &result.standings["Overall"];
    let driver_one = overall.iter().find(|d| d.cust_id == 1).unwrap();
    assert_eq!(driver_one.championship_position, 2);
    assert_eq!(driver_one.total_points, 18);
    assert_eq!(driver_one.primary_class, "GT3");

    let driver_three = overall.iter().find(|d| d.cust_id == 3).unwrap();
    assert_eq!(driver_three.all_classes, vec!["No Class"]);

    assert!(!result.standings["GT4"][0].manual_assignment);
}

#[tokio::test]
async fn test_excluded_driver_is_absent_everywhere() {
    let stores = stores_with(simple_config()).await;
    class_assignments::reassign_class(&stores, LEAGUE, 1, "Excluded")
        .await
        .unwrap();
    let source = two_round_source();

    let result = compute_championship(&source, &stores, &request())
        .await
        .unwrap();

    assert!(
        result
            .standings
            .values()
            .flatten()
            .all(|driver| driver.cust_id != 1)
    );
    assert_eq!(result.diagnostics.excluded_drivers, 1);
    assert_eq!(result.diagnostics.unmapped_results, 1);
    let driver_two = &result.standings["Overall"][0];
    assert_eq!(driver_two.races[0].division_position, Some(1));
}

#[tokio::test]
async fn test_failed_session_fetch_is_skipped() {
    let stores = stores_with(simple_config()).await;
    let mut source = two_round_source();
    source.results.remove(&1002);

    let result = compute_championship(&source, &stores, &request())
        .await
        .unwrap();

    assert_eq!(result.diagnostics.sessions_failed, 1);
    assert_eq!(result.diagnostics.sessions_scored, 1);
    let overall = &result.standings["Overall"];
    assert_eq!(overall[0].cust_id, 1);
    assert_eq!(overall[0].total_points, 25);
    assert_eq!(overall[0].races.len(), 2);
    assert!(!overall[0].races[1].attended);
}

#[tokio::test]
async fn test_roster_failure_is_fatal() {
    let stores = stores_with(simple_config()).await;
    let mut source = two_round_source();
    source.fail_roster = true;

    let err = compute_championship(&source, &stores, &request())
        .await
        .unwrap_err();
    assert!(matches!(err, ChampionshipError::Roster(_)));
}

#[tokio::test]
async fn test_default_config_applies_bonuses_and_drops() {
    let stores = Stores::in_memory();
    let mut penalty_source = two_round_source();
    penalty_source.sessions.push(session(1003, 0));
    penalty_source.results.insert(
        1003,
        SubsessionResults {
            race_results: Some(vec![finish(1, 1, 900_000), finish(2, 2, 890_000)]),
            qualify_results: Some(vec![
                QualifyResult {
                    cust_id: 1,
                    best_qual_lap_time: 880_000,
                },
                QualifyResult {
                    cust_id: 2,
                    best_qual_lap_time: 0,
                },
            ]),
        },
    );
    penalties::save_penalty(
        &stores,
        PenaltyKey {
            league_id: LEAGUE,
            season_id: SEASON,
            subsession_id: 1003,
            cust_id: 1,
        },
        5,
        "Contact".to_string(),
    )
    .await
    .unwrap();

    let result = compute_championship(&penalty_source, &stores, &request())
        .await
        .unwrap();
    let overall = &result.standings["Overall"];
    let driver_one = overall.iter().find(|d| d.cust_id == 1).unwrap();

    let last = &driver_one.races[2];
    assert!(last.pole_position);
    assert!(!last.fastest_lap);
    assert_eq!(last.total_points, 30 + 1 - 5);
    assert_eq!(last.penalty_reason, "Contact");

    // Three races, two drop weeks: the missed round and the penalized round go.
    assert_eq!(driver_one.dropped_races, 2);
    assert!(driver_one.races[1].dropped);
    assert!(driver_one.races[2].dropped);
    assert_eq!(driver_one.total_points, 30);
    assert_eq!(result.points_config, PointsConfig::default());
}

#[tokio::test]
async fn test_division_filter_keeps_division_list() {
    let stores = stores_with(simple_config()).await;
    let mut source = two_round_source();
    source.roster[0].nick_name = Some("[GT3] One".to_string());

    let mut narrowed = request();
    narrowed.division = Some("GT3".to_string());
    let result = compute_championship(&source, &stores, &narrowed)
        .await
        .unwrap();

    assert_eq!(result.division.as_deref(), Some("GT3"));
    assert_eq!(result.standings.len(), 1);
    assert_eq!(result.all_divisions, vec!["GT3", "Overall"]);

    narrowed.division = Some("LMP2".to_string());
    let result = compute_championship(&source, &stores, &narrowed)
        .await
        .unwrap();
    assert!(result.division.is_none());
    assert_eq!(result.standings.len(), 2);
}

#[tokio::test]
async fn test_cached_standings_are_served_until_cleared() {
    let stores = stores_with(simple_config()).await;
    let source = two_round_source();

    let refreshed = refresh_cache(&source, &stores, LEAGUE, SEASON).await.unwrap();
    assert!(refreshed.last_updated.is_some());

    let mut cached = request();
    cached.cached = true;
    let empty = FakeSource::default();

    let served = compute_championship(&empty, &stores, &cached).await.unwrap();
    assert_eq!(served.last_updated, refreshed.last_updated);
    assert_eq!(served.standings["Overall"][0].total_points, 43);

    cached.division = Some("GT3".to_string());
    let recomputed = compute_championship(&empty, &stores, &cached).await.unwrap();
    assert!(recomputed.last_updated.is_none());
    assert!(recomputed.standings.is_empty());

    assert_eq!(clear_cache(&stores, LEAGUE, SEASON).await.unwrap(), 1);
    cached.division = None;
    let after_clear = compute_championship(&empty, &stores, &cached).await.unwrap();
    assert!(after_clear.last_updated.is_none());
}
