// Roster analysis: valuation, status, position grades, scheme fit and the
// recruiting plan, assembled in one pass.

pub mod grading;
pub mod recruiting;
pub mod reports;
pub mod scheme_fit;

use tracing::info;

use crate::config::DynastyConfig;
use crate::roster::player::{position_sort_order, Player, Status};
use crate::valuation::{best_at_position, classify_status, compute_value};

pub use grading::{blended_measure, grade, Grade};
pub use recruiting::{recruiting_plan, Priority, RecruitingPlanRow};
pub use reports::{graduation_impact, position_change_candidates, GraduationImpact};
pub use scheme_fit::{scheme_fit_summary, FitClass, SchemeFitSummary};

/// A roster row with its computed value, status and scheme-fit weight.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPlayer {
    pub player: Player,
    pub value: f64,
    pub status: Status,
    /// Weight of the player's archetype at their own position. `None` when
    /// the position has no requirements entry.
    pub scheme_fit: Option<f64>,
}

/// Everything one analysis pass produces.
#[derive(Debug, Clone)]
pub struct RosterAnalysis {
    /// Annotated roster, sorted by position order then rating descending.
    pub players: Vec<AnnotatedPlayer>,
    pub recruiting_plan: Vec<RecruitingPlanRow>,
    pub scheme_fit: Vec<SchemeFitSummary>,
}

impl RosterAnalysis {
    /// Number of players with the given status.
    pub fn count_status(&self, status: Status) -> usize {
        self.players.iter().filter(|p| p.status == status).count()
    }
}

/// Run a full analysis pass over a roster.
///
/// Every row is valued before anything else looks at it; the scheme-fit
/// summary and recruiting plan both read the valued roster in its input
/// order, and only the returned player list is re-sorted.
pub fn analyze_roster(players: Vec<Player>, config: &DynastyConfig) -> RosterAnalysis {
    let best = best_at_position(&players);

    let mut annotated: Vec<AnnotatedPlayer> = players
        .into_iter()
        .map(|player| {
            let value = compute_value(&player, &config.valuation);
            let scheme_fit = config
                .requirement(&player.position)
                .map(|req| req.archetype_weight(&player.archetype));
            AnnotatedPlayer {
                player,
                value,
                // Placeholder until best-at-position is applied below.
                status: Status::Safe,
                scheme_fit,
            }
        })
        .collect();

    let scheme_fit = scheme_fit_summary(&annotated, config);

    for (p, is_best) in annotated.iter_mut().zip(best) {
        p.status = classify_status(p.value, &p.player.year, is_best);
    }

    let plan = recruiting_plan(&annotated, config);

    annotated.sort_by(|a, b| {
        position_sort_order(&a.player.position)
            .cmp(&position_sort_order(&b.player.position))
            .then_with(|| b.player.rating.cmp(&a.player.rating))
    });

    let analysis = RosterAnalysis {
        players: annotated,
        recruiting_plan: plan,
        scheme_fit,
    };

    info!(
        "Analyzed {} players: {} safe, {} at risk, {} cut, {} graduating",
        analysis.players.len(),
        analysis.count_status(Status::Safe),
        analysis.count_status(Status::AtRisk),
        analysis.count_status(Status::Cut),
        analysis.count_status(Status::Graduating),
    );

    analysis
}
