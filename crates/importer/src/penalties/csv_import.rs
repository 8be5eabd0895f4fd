use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use storage::models::MAX_PENALTY_POINTS;
use tracing::{debug, info};

use super::matching::{match_driver, match_session};
use super::{ImportedPenalty, PenaltyImport};
use crate::error::{ImporterError, Result};
use crate::traits::{ImportContext, PenaltyImporter};

const MISSING_FIELDS: &str = "Missing required fields (Race, Driver name, or Penalty)";

struct Columns {
    race: usize,
    driver: usize,
    penalty: usize,
    infringement: Option<usize>,
    summary: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h.trim()));
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| {
                ImporterError::ValidationError(format!("CSV is missing the {} column", names[0]))
            })
        };

        Ok(Self {
            race: require(&["Race"])?,
            driver: require(&["Driver name", "Driver Name"])?,
            penalty: require(&["Penalty"])?,
            infringement: find(&["Infringement"]),
            summary: find(&["Summary"]),
        })
    }
}

/// Points in a penalty cell: its first integer, saturating at `u32::MAX`.
/// Warnings and cells without a positive number carry no points.
pub fn penalty_points(cell: &str) -> Option<u32> {
    if cell.to_lowercase().contains("warning") {
        return None;
    }

    let digits: String = cell
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Any parse failure left is an overflow.
    let points = digits
        .parse::<u64>()
        .map_or(u32::MAX, |n| u32::try_from(n).unwrap_or(u32::MAX));
    Some(points).filter(|points| *points > 0)
}

pub fn penalty_reason(infringement: &str, summary: &str) -> String {
    match (infringement.is_empty(), summary.is_empty()) {
        (false, false) => format!("{infringement}: {summary}"),
        (false, true) => infringement.to_string(),
        (true, false) => summary.to_string(),
        (true, true) => String::new(),
    }
}

/// Reads a steward decisions spreadsheet exported as CSV.
#[derive(Debug, Default)]
pub struct CsvPenaltyImporter;

impl CsvPenaltyImporter {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, input: &[u8], context: &ImportContext) -> Result<PenaltyImport> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);
        let columns = Columns::from_headers(reader.headers()?)?;
        let mut import = PenaltyImport::default();

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    import.report.error(line, format!("Unreadable row: {e}"));
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());
            let field = |index: Option<usize>| {
                index
                    .and_then(|i| record.get(i))
                    .map(str::trim)
                    .unwrap_or("")
            };

            let race = field(Some(columns.race));
            let driver = field(Some(columns.driver));
            let penalty = field(Some(columns.penalty));
            if race.is_empty() || driver.is_empty() || penalty.is_empty() {
                import.report.error(line, MISSING_FIELDS);
                continue;
            }

            let Some(points) = penalty_points(penalty) else {
                debug!("Skipping line {line}: warning or no penalty points");
                import.report.skipped += 1;
                continue;
            };
            if points > MAX_PENALTY_POINTS {
                import.report.error(
                    line,
                    format!("Penalty of {points} points exceeds the maximum of {MAX_PENALTY_POINTS}"),
                );
                continue;
            }

            let Some((session, subsession_id)) = match_session(race, &context.sessions)
                .and_then(|session| session.subsession_id.map(|id| (session, id)))
            else {
                import.report.error(
                    line,
                    format!("Could not find matching session for race: \"{race}\""),
                );
                continue;
            };

            let Some((member, match_score)) = match_driver(driver, &context.roster) else {
                import.report.error(
                    line,
                    format!("Could not find matching driver for: \"{driver}\""),
                );
                continue;
            };

            debug!(
                "Line {line}: {points} points for {} in {} ({subsession_id})",
                member.display_name, session.session_name
            );
            import.penalties.push(ImportedPenalty {
                line,
                subsession_id,
                cust_id: member.cust_id,
                points,
                reason: penalty_reason(field(columns.infringement), field(columns.summary)),
                driver_name: member.display_name.clone(),
                session_name: session.session_name.clone(),
                match_score,
            });
            import.report.processed += 1;
        }

        info!(
            "Penalty import for league {}, season {}: {} processed, {} skipped, {} errors",
            context.league_id,
            context.season_id,
            import.report.processed,
            import.report.skipped,
            import.report.errors.len()
        );
        Ok(import)
    }
}

#[async_trait]
impl PenaltyImporter for CsvPenaltyImporter {
    async fn import(&self, input: &[u8], context: &ImportContext) -> Result<PenaltyImport> {
        self.read(input, context)
    }

    fn name(&self) -> &'static str {
        "CSV"
    }
}
