// Secondary views over a finished analysis.

use serde::Serialize;
use std::collections::HashMap;

use super::scheme_fit::WEAK_FIT_CEILING;
use super::{AnnotatedPlayer, RosterAnalysis};
use crate::roster::player::{position_sort_order, Status};
use crate::valuation::round2;

/// Graduating headcount and value lost at one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraduationImpact {
    #[serde(rename = "POSITION")]
    pub position: String,
    #[serde(rename = "GRADUATING")]
    pub count: usize,
    #[serde(rename = "AVG VALUE")]
    pub avg_value: f64,
}

/// Per-position summary of graduating players, most affected positions first.
/// Positions with no graduating players are omitted.
pub fn graduation_impact(analysis: &RosterAnalysis) -> Vec<GraduationImpact> {
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    for p in analysis
        .players
        .iter()
        .filter(|p| p.status == Status::Graduating)
    {
        let entry = totals.entry(p.player.position.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += p.value;
    }

    let mut rows: Vec<GraduationImpact> = totals
        .into_iter()
        .map(|(position, (count, total))| GraduationImpact {
            position: position.to_string(),
            count,
            avg_value: round2(total / count as f64),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| position_sort_order(&a.position).cmp(&position_sort_order(&b.position)))
            .then_with(|| a.position.cmp(&b.position))
    });
    rows
}

/// Players whose archetype is a weak fit at their current position, in
/// roster order. Players at unconfigured positions are never candidates.
pub fn position_change_candidates(analysis: &RosterAnalysis) -> Vec<&AnnotatedPlayer> {
    analysis
        .players
        .iter()
        .filter(|p| p.scheme_fit.is_some_and(|w| w < WEAK_FIT_CEILING))
        .collect()
}
