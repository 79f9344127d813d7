// Recruiting plan: per-position headcount for next season against the
// configured minimum, position grade, and a three-tier recruiting priority.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::grading::{blended_measure, Grade};
use super::AnnotatedPlayer;
use crate::config::DynastyConfig;
use crate::roster::player::Status;

/// Recruiting urgency for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the recruiting plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecruitingPlanRow {
    #[serde(rename = "Position")]
    pub position: String,
    /// Players at the position who are not graduating.
    #[serde(rename = "Current Count")]
    pub current_count: usize,
    #[serde(rename = "Min Required")]
    pub min_required: usize,
    #[serde(rename = "Blended Value")]
    pub blended_value: f64,
    #[serde(rename = "Grade")]
    pub grade: Grade,
    #[serde(rename = "Priority")]
    pub priority: Priority,
}

/// Recruiting priority: understaffed -> High; otherwise an F grade -> High,
/// a plain C grade -> Medium, anything else -> Low. C+ and C- are not C.
pub fn recruiting_priority(current_count: usize, min_required: usize, grade: Grade) -> Priority {
    if current_count < min_required {
        Priority::High
    } else {
        match grade {
            Grade::F => Priority::High,
            Grade::C => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

/// Values of every player listed at `position`, graduating players included.
pub(crate) fn position_values(players: &[AnnotatedPlayer], position: &str) -> Vec<f64> {
    players
        .iter()
        .filter(|p| p.player.position == position)
        .map(|p| p.value)
        .collect()
}

/// Build the recruiting plan, one row per configured position in config order.
///
/// Headcount excludes graduating players; the blended value covers the whole
/// position group as it stands this season.
pub fn recruiting_plan(players: &[AnnotatedPlayer], config: &DynastyConfig) -> Vec<RecruitingPlanRow> {
    config
        .positions
        .iter()
        .map(|req| {
            let current_count = players
                .iter()
                .filter(|p| p.player.position == req.name && p.status != Status::Graduating)
                .count();
            let blended_value = blended_measure(&position_values(players, &req.name), req.starters);
            let grade = Grade::from_value(blended_value);
            let priority = recruiting_priority(current_count, req.min, grade);

            debug!(
                "{}: {} returning (min {}), blended {:.2} ({}), priority {}",
                req.name, current_count, req.min, blended_value, grade, priority
            );

            RecruitingPlanRow {
                position: req.name.clone(),
                current_count,
                min_required: req.min,
                blended_value,
                grade,
                priority,
            }
        })
        .collect()
}
