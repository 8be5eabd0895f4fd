use crate::models::{
    PointsConfig, RaceRecord, SeasonPenalties, Session, SessionResult, SubsessionResults,
};

use super::classes::{DivisionEntry, DivisionMap};

const UNKNOWN_CAR: &str = "Unknown Car";

/// A driver's scored result in one division of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub cust_id: i64,
    pub display_name: String,
    pub car_number: Option<String>,
    pub division: String,
    pub manual_assignment: bool,
    pub multiple_classes: bool,
    pub all_classes: Vec<String>,
    pub primary_class: String,
    pub record: RaceRecord,
}

/// Output of scoring one session: per-division entries in division order,
/// divisions in the order they first appeared in the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredSession {
    pub subsession_id: i64,
    pub divisions: Vec<(String, Vec<ScoredEntry>)>,
    /// Result rows whose driver belongs to no division.
    pub unmapped_results: u32,
}

struct DivisionRow<'a> {
    result: &'a SessionResult,
    entry: &'a DivisionEntry,
}

/// Scores one past session. Returns `None` when the session has no race
/// results to score.
pub fn score_session(
    session: &Session,
    subsession_id: i64,
    results: &SubsessionResults,
    divisions: &DivisionMap,
    config: &PointsConfig,
    penalties: &SeasonPenalties,
) -> Option<ScoredSession> {
    let race_results = results
        .race_results
        .as_deref()
        .filter(|rows| !rows.is_empty())?;

    let mut grouped: Vec<(&str, Vec<DivisionRow>)> = Vec::new();
    let mut unmapped_results = 0;

    for result in race_results {
        let mut mapped = false;
        for entry in divisions.divisions_for(result.cust_id) {
            mapped = true;
            let row = DivisionRow { result, entry };
            match grouped.iter_mut().find(|(name, _)| *name == entry.division) {
                Some((_, rows)) => rows.push(row),
                None => grouped.push((entry.division.as_str(), vec![row])),
            }
        }
        if !mapped {
            tracing::debug!(
                "Result for driver {} in subsession {} maps to no division",
                result.cust_id,
                subsession_id
            );
            unmapped_results += 1;
        }
    }

    let scored = grouped
        .into_iter()
        .map(|(division, mut rows)| {
            rows.sort_by_key(|row| row.result.finish_position);
            let entries = score_division(
                session,
                subsession_id,
                division,
                &rows,
                results,
                divisions,
                config,
                penalties,
            );
            (division.to_string(), entries)
        })
        .collect();

    Some(ScoredSession {
        subsession_id,
        divisions: scored,
        unmapped_results,
    })
}

#[allow(clippy::too_many_arguments)]
fn score_division(
    session: &Session,
    subsession_id: i64,
    division: &str,
    rows: &[DivisionRow],
    results: &SubsessionResults,
    divisions: &DivisionMap,
    config: &PointsConfig,
    penalties: &SeasonPenalties,
) -> Vec<ScoredEntry> {
    let fastest_lap = if config.fastest_lap_points > 0 {
        fastest_lap_driver(rows)
    } else {
        None
    };
    let pole = if config.pole_position_points > 0 {
        pole_sitter(subsession_id, division, results, divisions)
    } else {
        None
    };

    if let Some(cust_id) = fastest_lap {
        tracing::debug!("Division {division} fastest lap: driver {cust_id}");
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let result = row.result;
            let division_position = index as u32 + 1;
            let position_points = config.points_for(division_position);
            let is_fastest_lap = fastest_lap == Some(result.cust_id);
            let is_pole = pole == Some(result.cust_id);
            let fastest_lap_points = if is_fastest_lap { config.fastest_lap_points } else { 0 };
            let pole_position_points = if is_pole { config.pole_position_points } else { 0 };
            let penalty = penalties.get(subsession_id, result.cust_id);
            let penalty_points = penalty.map_or(0, |p| p.points);

            let total_points = clamp_points(
                i64::from(position_points)
                    + i64::from(fastest_lap_points)
                    + i64::from(pole_position_points)
                    - i64::from(penalty_points),
            );

            ScoredEntry {
                cust_id: result.cust_id,
                display_name: result.display_name.clone(),
                car_number: result.car_number.clone(),
                division: division.to_string(),
                manual_assignment: row.entry.manual_assignment,
                multiple_classes: row.entry.multiple_classes,
                all_classes: row.entry.all_classes.clone(),
                primary_class: row.entry.primary_class.clone(),
                record: RaceRecord {
                    session_name: session.session_name.clone(),
                    track_name: session.track_name.clone(),
                    date: session.scheduled_at(),
                    division_position: Some(division_position),
                    overall_position: Some(result.finish_position),
                    starting_position: Some(result.starting_position + 1),
                    position_points,
                    fastest_lap_points,
                    pole_position_points,
                    penalty_points,
                    penalty_reason: penalty.map(|p| p.reason.clone()).unwrap_or_default(),
                    total_points,
                    fastest_lap: is_fastest_lap,
                    pole_position: is_pole,
                    best_lap_time: result.best_lap_time,
                    car_name: result
                        .car_name
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_CAR.to_string()),
                    subsession_id,
                    attended: true,
                    dropped: false,
                },
            }
        })
        .collect()
}

/// Narrows a points sum computed in `i64` back to a record total, saturating
/// at the `i32` bounds.
pub(super) fn clamp_points(points: i64) -> i32 {
    points.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Strictly smallest positive best lap; on a tie the better finisher keeps it.
fn fastest_lap_driver(rows: &[DivisionRow]) -> Option<i64> {
    rows.iter()
        .filter(|row| row.result.best_lap_time > 0)
        .min_by_key(|row| row.result.best_lap_time)
        .map(|row| row.result.cust_id)
}

/// Fastest timed qualifier among the division's drivers. Ties go to the row
/// listed first in the qualifying results.
fn pole_sitter(
    subsession_id: i64,
    division: &str,
    results: &SubsessionResults,
    divisions: &DivisionMap,
) -> Option<i64> {
    let Some(qualifying) = results.qualify_results.as_deref() else {
        tracing::debug!("No qualifying session found for subsession {subsession_id}");
        return None;
    };

    let pole = qualifying
        .iter()
        .filter(|row| row.has_time() && divisions.contains(row.cust_id, division))
        .min_by_key(|row| row.best_qual_lap_time);

    match pole {
        Some(row) => {
            tracing::debug!(
                "Division {division} pole: driver {} with time {}",
                row.cust_id,
                row.best_qual_lap_time
            );
            Some(row.cust_id)
        }
        None => {
            tracing::debug!(
                "No valid qualifying times in division {division} for subsession {subsession_id}"
            );
            None
        }
    }
}
