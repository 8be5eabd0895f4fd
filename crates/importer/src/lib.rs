pub mod error;
pub mod penalties;
pub mod sources;
pub mod traits;

pub use error::{ImporterError, Result};
pub use penalties::{
    CsvPenaltyImporter, ImportIssue, ImportReport, ImportedPenalty, PenaltyImport, apply_import,
};
pub use sources::iracing::{Credentials, IRacingClient};
pub use traits::{ImportContext, PenaltyImporter};
