use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Scoring rules for a league: base points per finishing position plus bonus
/// values and the number of drop weeks.
///
/// The `points` table may be sparse; positions without an entry award 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointsConfig {
    pub name: String,
    #[schema(value_type = Object)]
    pub points: BTreeMap<u32, i32>,
    #[serde(default)]
    pub drop_weeks: u32,
    #[serde(default)]
    pub fastest_lap_points: u32,
    #[serde(default)]
    pub pole_position_points: u32,
}

impl PointsConfig {
    /// Base points for a division finishing position (1-based).
    pub fn points_for(&self, position: u32) -> i32 {
        self.points.get(&position).copied().unwrap_or(0)
    }
}

impl Default for PointsConfig {
    fn default() -> Self {
        PointsPreset::Standard.config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointsPreset {
    Standard,
    F1Style,
    IndycarStyle,
    NascarStyle,
}

impl PointsPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::F1Style => "f1_style",
            Self::IndycarStyle => "indycar_style",
            Self::NascarStyle => "nascar_style",
        }
    }

    pub fn all() -> &'static [PointsPreset] {
        &[
            Self::Standard,
            Self::F1Style,
            Self::IndycarStyle,
            Self::NascarStyle,
        ]
    }

    pub fn config(&self) -> PointsConfig {
        match self {
            Self::Standard => PointsConfig {
                name: "Standard Championship".to_string(),
                points: table(&[30, 28, 26, 24, 22, 20, 18, 16, 14, 12, 10, 8, 6, 4, 2]),
                drop_weeks: 2,
                fastest_lap_points: 1,
                pole_position_points: 1,
            },
            Self::F1Style => PointsConfig {
                name: "F1 Style".to_string(),
                points: table(&[25, 18, 15, 12, 10, 8, 6, 4, 2, 1]),
                drop_weeks: 2,
                fastest_lap_points: 1,
                pole_position_points: 1,
            },
            Self::IndycarStyle => PointsConfig {
                name: "IndyCar Style".to_string(),
                points: table(&[
                    50, 40, 35, 32, 30, 28, 26, 24, 22, 20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10,
                ]),
                drop_weeks: 1,
                fastest_lap_points: 0,
                pole_position_points: 1,
            },
            Self::NascarStyle => PointsConfig {
                name: "NASCAR Style".to_string(),
                points: table(&[
                    40, 35, 34, 33, 32, 31, 30, 29, 28, 27, 26, 25, 24, 23, 22, 21, 20, 19, 18, 17,
                ]),
                drop_weeks: 2,
                fastest_lap_points: 1,
                pole_position_points: 1,
            },
        }
    }

    /// All presets keyed by their identifier.
    pub fn catalog() -> BTreeMap<String, PointsConfig> {
        Self::all()
            .iter()
            .map(|preset| (preset.as_str().to_string(), preset.config()))
            .collect()
    }
}

fn table(values: &[i32]) -> BTreeMap<u32, i32> {
    values
        .iter()
        .enumerate()
        .map(|(idx, points)| (idx as u32 + 1, *points))
        .collect()
}
