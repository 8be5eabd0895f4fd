mod csv_import;
pub mod matching;

pub use csv_import::{CsvPenaltyImporter, penalty_points, penalty_reason};

use serde::Serialize;
use storage::models::PenaltyKey;
use storage::repository::Stores;
use storage::services::penalties::save_penalty;

use crate::Result;

/// A penalty resolved to a concrete session and driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedPenalty {
    pub line: u64,
    pub subsession_id: i64,
    pub cust_id: i64,
    pub points: u32,
    pub reason: String,
    pub driver_name: String,
    pub session_name: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    pub line: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub processed: u32,
    pub skipped: u32,
    pub errors: Vec<ImportIssue>,
}

impl ImportReport {
    fn error(&mut self, line: u64, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Line {line}: {message}");
        self.errors.push(ImportIssue { line, message });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PenaltyImport {
    pub penalties: Vec<ImportedPenalty>,
    pub report: ImportReport,
}

/// Saves every imported penalty into the league season's ledger.
pub async fn apply_import(
    stores: &Stores,
    league_id: i64,
    season_id: i64,
    import: &PenaltyImport,
) -> Result<usize> {
    for penalty in &import.penalties {
        let key = PenaltyKey {
            league_id,
            season_id,
            subsession_id: penalty.subsession_id,
            cust_id: penalty.cust_id,
        };
        save_penalty(stores, key, penalty.points, penalty.reason.clone()).await?;
    }

    tracing::info!(
        "Applied {} imported penalties to league {league_id}, season {season_id}",
        import.penalties.len()
    );
    Ok(import.penalties.len())
}
