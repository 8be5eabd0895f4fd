use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{DriverStanding, RaceRecord, Session};

use super::scoring::{ScoredEntry, ScoredSession, clamp_points};

/// A session that has already run, with the id it is scored under.
#[derive(Debug, Clone, Copy)]
pub struct PastSession<'a> {
    pub subsession_id: i64,
    pub session: &'a Session,
}

#[derive(Default)]
struct DivisionTable {
    drivers: Vec<DriverStanding>,
    index: HashMap<i64, usize>,
}

impl DivisionTable {
    fn push(&mut self, entry: ScoredEntry) {
        let slot = match self.index.get(&entry.cust_id) {
            Some(&slot) => slot,
            None => {
                self.drivers.push(DriverStanding {
                    cust_id: entry.cust_id,
                    display_name: entry.display_name.clone(),
                    car_number: entry.car_number.clone(),
                    division: entry.division.clone(),
                    manual_assignment: entry.manual_assignment,
                    multiple_classes: entry.multiple_classes,
                    all_classes: entry.all_classes.clone(),
                    primary_class: entry.primary_class.clone(),
                    total_points: 0,
                    dropped_races: 0,
                    races: Vec::new(),
                    championship_position: 0,
                });
                let slot = self.drivers.len() - 1;
                self.index.insert(entry.cust_id, slot);
                slot
            }
        };
        self.drivers[slot].races.push(entry.record);
    }
}

/// Final per-division tables plus division names in first-scored order.
#[derive(Debug, Default)]
pub struct DivisionStandings {
    pub standings: BTreeMap<String, Vec<DriverStanding>>,
    pub all_divisions: Vec<String>,
}

/// Accumulates scored sessions, then ranks every division.
#[derive(Default)]
pub struct StandingsAggregator {
    divisions: Vec<(String, DivisionTable)>,
}

impl StandingsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, scored: ScoredSession) {
        for (division, entries) in scored.divisions {
            let slot = match self.divisions.iter().position(|(name, _)| *name == division) {
                Some(slot) => slot,
                None => {
                    self.divisions.push((division, DivisionTable::default()));
                    self.divisions.len() - 1
                }
            };
            let table = &mut self.divisions[slot].1;
            for entry in entries {
                table.push(entry);
            }
        }
    }

    pub fn finish(self, past_sessions: &[PastSession], drop_weeks: u32) -> DivisionStandings {
        let mut result = DivisionStandings::default();

        for (division, table) in self.divisions {
            let mut drivers = table.drivers;
            for driver in &mut drivers {
                complete_record(&mut driver.races, past_sessions);
                driver.dropped_races = apply_drop_weeks(&mut driver.races, drop_weeks);
                driver.total_points = clamp_points(
                    driver
                        .races
                        .iter()
                        .filter(|race| race.counts())
                        .map(|race| i64::from(race.total_points))
                        .sum(),
                );
            }

            drivers.sort_by_key(|driver| std::cmp::Reverse(driver.total_points));
            for (rank, driver) in drivers.iter_mut().enumerate() {
                driver.championship_position = rank as u32 + 1;
            }

            result.all_divisions.push(division.clone());
            result.standings.insert(division, drivers);
        }

        result
    }
}

/// Adds a missed-race record for every past session the driver has no
/// record for, then orders everything chronologically.
fn complete_record(races: &mut Vec<RaceRecord>, past_sessions: &[PastSession]) {
    let attended: HashSet<i64> = races.iter().map(|race| race.subsession_id).collect();

    races.extend(
        past_sessions
            .iter()
            .filter(|past| !attended.contains(&past.subsession_id))
            .map(|past| RaceRecord::missed(past.session, past.subsession_id)),
    );
    races.sort_by_key(|race| race.date);
}

/// Marks the worst `drop_weeks` records as dropped: missed sessions first,
/// then the lowest totals. Returns how many were dropped.
fn apply_drop_weeks(races: &mut [RaceRecord], drop_weeks: u32) -> u32 {
    let drop_count = drop_weeks as usize;
    if drop_count == 0 || races.len() <= drop_count {
        for race in races.iter_mut() {
            race.dropped = false;
        }
        return 0;
    }

    let mut order: Vec<usize> = (0..races.len()).collect();
    order.sort_by_key(|&i| (races[i].attended, races[i].total_points));

    let dropped: HashSet<i64> = order[..drop_count]
        .iter()
        .map(|&i| races[i].subsession_id)
        .collect();
    for race in races.iter_mut() {
        race.dropped = dropped.contains(&race.subsession_id);
    }

    drop_weeks
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn sessions(count: i64) -> Vec<Session> {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 19, 0, 0).unwrap();
        (0..count)
            .map(|i| Session {
                subsession_id: Some(100 + i),
                session_name: format!("Round {}", i + 1),
                track_name: "Silverstone".to_string(),
                launch_at: Some(start + Duration::weeks(i)),
                start_time: None,
            })
            .collect()
    }

    fn past(sessions: &[Session]) -> Vec<PastSession<'_>> {
        sessions
            .iter()
            .map(|session| PastSession {
                subsession_id: session.subsession_id.unwrap(),
                session,
            })
            .collect()
    }

    fn entry(cust_id: i64, session: &Session, total_points: i32) -> ScoredEntry {
        let subsession_id = session.subsession_id.unwrap();
        let mut record = RaceRecord::missed(session, subsession_id);
        record.attended = true;
        record.car_name = "Mazda MX-5".to_string();
        record.position_points = total_points;
        record.total_points = total_points;
        ScoredEntry {
            cust_id,
            display_name: format!("Driver {cust_id}"),
            car_number: None,
            division: "Overall".to_string(),
            manual_assignment: false,
            multiple_classes: false,
            all_classes: vec!["No Class".to_string()],
            primary_class: "No Class".to_string(),
            record,
        }
    }

    fn scored(session: &Session, entries: Vec<ScoredEntry>) -> ScoredSession {
        ScoredSession {
            subsession_id: session.subsession_id.unwrap(),
            divisions: vec![("Overall".to_string(), entries)],
            unmapped_results: 0,
        }
    }

    fn overall(result: &DivisionStandings) -> &[DriverStanding] {
        &result.standings["Overall"]
    }

    #[test]
    fn test_missed_race_scores_zero_and_ranks() {
        let sessions = sessions(2);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(
            &sessions[0],
            vec![entry(1, &sessions[0], 25), entry(2, &sessions[0], 18)],
        ));
        aggregator.add_session(scored(&sessions[1], vec![entry(2, &sessions[1], 25)]));

        let result = aggregator.finish(&past(&sessions), 0);
        let table = overall(&result);

        assert_eq!(table[0].cust_id, 2);
        assert_eq!(table[0].total_points, 43);
        assert_eq!(table[0].championship_position, 1);
        assert_eq!(table[1].cust_id, 1);
        assert_eq!(table[1].total_points, 25);
        assert_eq!(table[1].championship_position, 2);

        let missed = &table[1].races[1];
        assert!(!missed.attended);
        assert_eq!(missed.total_points, 0);
        assert_eq!(missed.car_name, "No Car (Did Not Participate)");
        assert!(table.iter().all(|d| d.races.iter().all(|r| !r.dropped)));
    }

    #[test]
    fn test_season_total_saturates_instead_of_overflowing() {
        let sessions = sessions(2);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(&sessions[0], vec![entry(1, &sessions[0], i32::MAX)]));
        aggregator.add_session(scored(&sessions[1], vec![entry(1, &sessions[1], i32::MAX)]));

        let result = aggregator.finish(&past(&sessions), 0);
        assert_eq!(overall(&result)[0].total_points, i32::MAX);
    }

    #[test]
    fn test_every_driver_has_a_record_per_past_session() {
        let sessions = sessions(4);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(&sessions[2], vec![entry(1, &sessions[2], 10)]));
        aggregator.add_session(scored(&sessions[0], vec![entry(2, &sessions[0], 10)]));

        let result = aggregator.finish(&past(&sessions), 1);
        for driver in overall(&result) {
            assert_eq!(driver.races.len(), 4);
            let ids: Vec<i64> = driver.races.iter().map(|r| r.subsession_id).collect();
            assert_eq!(ids, vec![100, 101, 102, 103]);
        }
    }

    #[test]
    fn test_missed_races_drop_before_attended() {
        let sessions = sessions(4);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(&sessions[0], vec![entry(1, &sessions[0], 20)]));
        aggregator.add_session(scored(&sessions[1], vec![entry(1, &sessions[1], -5)]));
        aggregator.add_session(scored(&sessions[3], vec![entry(1, &sessions[3], 12)]));

        let result = aggregator.finish(&past(&sessions), 2);
        let driver = &overall(&result)[0];

        let dropped: Vec<i64> = driver
            .races
            .iter()
            .filter(|r| r.dropped)
            .map(|r| r.subsession_id)
            .collect();
        assert_eq!(dropped, vec![101, 102]);
        assert_eq!(driver.dropped_races, 2);
        assert_eq!(driver.total_points, 32);
    }

    #[test]
    fn test_penalized_race_is_dropped_when_no_missed_races_remain() {
        let sessions = sessions(3);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(&sessions[0], vec![entry(1, &sessions[0], 20)]));
        aggregator.add_session(scored(&sessions[1], vec![entry(1, &sessions[1], 15)]));

        let result = aggregator.finish(&past(&sessions), 2);
        let driver = &overall(&result)[0];

        assert!(!driver.races[0].dropped);
        assert!(driver.races[1].dropped);
        assert!(driver.races[2].dropped);
        assert_eq!(driver.total_points, 20);
    }

    #[test]
    fn test_no_drops_when_record_is_short() {
        let sessions = sessions(2);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(&sessions[0], vec![entry(1, &sessions[0], 20)]));
        aggregator.add_session(scored(&sessions[1], vec![entry(1, &sessions[1], 10)]));

        let result = aggregator.finish(&past(&sessions), 2);
        let driver = &overall(&result)[0];

        assert_eq!(driver.dropped_races, 0);
        assert!(driver.races.iter().all(|r| !r.dropped));
        assert_eq!(driver.total_points, 30);
    }

    #[test]
    fn test_total_matches_counted_races() {
        let sessions = sessions(5);
        let mut aggregator = StandingsAggregator::new();
        for (i, session) in sessions.iter().enumerate().skip(1) {
            aggregator.add_session(scored(
                session,
                vec![entry(1, session, i as i32 * 7 - 10), entry(2, session, 12)],
            ));
        }

        let result = aggregator.finish(&past(&sessions), 2);
        for driver in overall(&result) {
            let counted: i32 = driver
                .races
                .iter()
                .filter(|r| r.attended && !r.dropped)
                .map(|r| r.total_points)
                .sum();
            assert_eq!(counted, driver.total_points);
            assert_eq!(driver.races.iter().filter(|r| r.dropped).count(), 2);
        }
    }

    #[test]
    fn test_tied_totals_keep_first_scoring_order() {
        let sessions = sessions(1);
        let mut aggregator = StandingsAggregator::new();
        aggregator.add_session(scored(
            &sessions[0],
            vec![entry(5, &sessions[0], 10), entry(3, &sessions[0], 10)],
        ));

        let result = aggregator.finish(&past(&sessions), 0);
        let order: Vec<(i64, u32)> = overall(&result)
            .iter()
            .map(|d| (d.cust_id, d.championship_position))
            .collect();
        assert_eq!(order, vec![(5, 1), (3, 2)]);
        assert_eq!(result.all_divisions, vec!["Overall"]);
    }
}
