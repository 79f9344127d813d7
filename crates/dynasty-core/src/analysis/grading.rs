// Position strength: starter/backup blended value and its letter grade.

use serde::Serialize;
use std::fmt;

use crate::valuation::round2;

/// Weight of the starters' mean in the blended measure.
pub const STARTER_WEIGHT: f64 = 0.7;
/// Weight of the backups' mean in the blended measure.
pub const BACKUP_WEIGHT: f64 = 0.3;

/// Letter grade for a position group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "F")]
    F,
}

/// Lower bound (inclusive) of each grade band, best first. Anything below
/// the last band is an F.
const GRADE_BANDS: &[(f64, Grade)] = &[
    (150.0, Grade::APlus),
    (140.0, Grade::A),
    (130.0, Grade::AMinus),
    (120.0, Grade::BPlus),
    (110.0, Grade::B),
    (100.0, Grade::BMinus),
    (90.0, Grade::CPlus),
    (80.0, Grade::C),
    (70.0, Grade::CMinus),
];

impl Grade {
    /// Grade an average value.
    pub fn from_value(avg_value: f64) -> Self {
        GRADE_BANDS
            .iter()
            .find(|(floor, _)| avg_value >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shorthand for `Grade::from_value`.
pub fn grade(avg_value: f64) -> Grade {
    Grade::from_value(avg_value)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Blend a position group's values: the top `starters` values are starters,
/// the rest backups, and the result is `0.7 * mean(starters) + 0.3 * mean(backups)`
/// rounded to two decimals. An empty group contributes 0, so a position with
/// no backups scores exactly `0.7 * starter_avg`.
pub fn blended_measure(values: &[f64], starters: usize) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let split = starters.min(sorted.len());
    let (starter_values, backup_values) = sorted.split_at(split);

    round2(STARTER_WEIGHT * mean(starter_values) + BACKUP_WEIGHT * mean(backup_values))
}
