pub mod championship;
pub mod class_assignment;
pub mod penalty;
pub mod points_config;
pub mod roster;
pub mod session;

pub use championship::{DriverStanding, MISSED_RACE_CAR_NAME, RaceRecord};
pub use class_assignment::{ClassAssignment, LegacyClassChange};
pub use penalty::{MAX_PENALTY_POINTS, Penalty, PenaltyKey, SeasonPenalties};
pub use points_config::{PointsConfig, PointsPreset};
pub use roster::{LegacyTag, RosterMember};
pub use session::{QualifyResult, Session, SessionResult, SubsessionResults};
