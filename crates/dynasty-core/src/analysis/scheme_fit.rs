// Scheme-fit analysis.
//
// Each player's archetype is weighted against their position's archetype
// table. Players below the weak-fit ceiling are checked against every other
// position for a better home; players with no weight at all are flagged for
// cuts whether or not such a home exists.

use serde::Serialize;
use tracing::debug;

use super::grading::{blended_measure, Grade};
use super::recruiting::{position_values, Priority};
use super::AnnotatedPlayer;
use crate::config::{DynastyConfig, PositionRequirement};

/// Weights below this are weak fits.
pub const WEAK_FIT_CEILING: f64 = 0.5;
/// A position is a move candidate when the archetype weighs more than this there.
pub const MOVE_THRESHOLD: f64 = 0.5;

/// How well an archetype suits a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitClass {
    /// Weight exactly 0: the archetype is not part of the position's vocabulary.
    NonFit,
    /// Weight in (0, 0.5).
    WeakFit,
    Fit,
}

impl FitClass {
    pub fn from_weight(weight: f64) -> Self {
        if weight == 0.0 {
            FitClass::NonFit
        } else if weight < WEAK_FIT_CEILING {
            FitClass::WeakFit
        } else {
            FitClass::Fit
        }
    }
}

/// One row of the scheme-fit summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeFitSummary {
    #[serde(rename = "POSITION")]
    pub position: String,
    /// Everyone listed at the position this season, graduating players included.
    #[serde(rename = "CURRENT COUNT")]
    pub current_count: usize,
    #[serde(rename = "MIN REQUIRED")]
    pub min_required: usize,
    #[serde(rename = "BLENDED VALUE")]
    pub blended_value: f64,
    #[serde(rename = "GRADE")]
    pub grade: Grade,
    #[serde(rename = "PRIORITY")]
    pub priority: Priority,
    /// Semicolon-joined recommendations; empty when nobody is flagged.
    #[serde(rename = "SCHEME FIT")]
    pub recommendations: String,
}

/// Headcount-only priority used by the scheme-fit summary: High when the
/// position is below its minimum, Low otherwise. Distinct from the recruiting
/// plan's three-tier rule.
pub fn headcount_priority(current_count: usize, min_required: usize) -> Priority {
    if current_count < min_required {
        Priority::High
    } else {
        Priority::Low
    }
}

/// Other configured positions where `archetype` weighs more than the move
/// threshold, in config order.
pub fn alternative_positions<'a>(
    archetype: &str,
    current_position: &str,
    config: &'a DynastyConfig,
) -> Vec<&'a str> {
    config
        .positions
        .iter()
        .filter(|req| req.name != current_position)
        .filter(|req| req.archetype_weight(archetype) > MOVE_THRESHOLD)
        .map(|req| req.name.as_str())
        .collect()
}

/// Recommendations for one position group, in roster order: move suggestions
/// for every weak or non-fit player that has somewhere better to go, then a
/// cut flag for every non-fit player.
pub fn position_recommendations(
    group: &[&AnnotatedPlayer],
    req: &PositionRequirement,
    config: &DynastyConfig,
) -> Vec<String> {
    let weights: Vec<f64> = group
        .iter()
        .map(|p| req.archetype_weight(&p.player.archetype))
        .collect();

    let mut recommendations = Vec::new();

    for (p, &weight) in group.iter().zip(&weights) {
        if FitClass::from_weight(weight) == FitClass::Fit {
            continue;
        }
        let moves = alternative_positions(&p.player.archetype, &req.name, config);
        if !moves.is_empty() {
            recommendations.push(format!(
                "{} poor scheme fit (consider moving to {})",
                p.player.full_name(),
                moves.join(", ")
            ));
        }
    }

    for (p, &weight) in group.iter().zip(&weights) {
        if FitClass::from_weight(weight) == FitClass::NonFit {
            recommendations.push(format!(
                "{} non-scheme fit (consider for cuts)",
                p.player.full_name()
            ));
        }
    }

    recommendations
}

/// Build the scheme-fit summary, one row per configured position in config order.
pub fn scheme_fit_summary(players: &[AnnotatedPlayer], config: &DynastyConfig) -> Vec<SchemeFitSummary> {
    config
        .positions
        .iter()
        .map(|req| {
            let group: Vec<&AnnotatedPlayer> = players
                .iter()
                .filter(|p| p.player.position == req.name)
                .collect();
            let current_count = group.len();
            let blended_value = blended_measure(&position_values(players, &req.name), req.starters);
            let recommendations = position_recommendations(&group, req, config);

            if !recommendations.is_empty() {
                debug!("{}: {} scheme-fit flags", req.name, recommendations.len());
            }

            SchemeFitSummary {
                position: req.name.clone(),
                current_count,
                min_required: req.min,
                blended_value,
                grade: Grade::from_value(blended_value),
                priority: headcount_priority(current_count, req.min),
                recommendations: recommendations.join("; "),
            }
        })
        .collect()
}
