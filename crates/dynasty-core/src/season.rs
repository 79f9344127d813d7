// Season rollover: returning players plus signed recruits, one class older.

use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::RosterAnalysis;
use crate::roster::player::{is_redshirt_year, position_sort_order, Player, Status};

/// Year a senior class advances into.
pub const GRADUATED: &str = "GRADUATED";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonError {
    #[error("roster is empty")]
    EmptyRoster,

    #[error("recruiting table is empty")]
    EmptyRecruits,
}

/// Next class for a plain or redshirted year. Unknown years are returned as-is.
fn next_class(year: &str) -> Option<&'static str> {
    let next = match year {
        "HS" => "FR",
        "FR" => "SO",
        "SO" => "JR",
        "JR" => "SR",
        "SR" => GRADUATED,
        "FR (RS)" => "SO (RS)",
        "SO (RS)" => "JR (RS)",
        "JR (RS)" => "SR (RS)",
        "SR (RS)" => GRADUATED,
        _ => return None,
    };
    Some(next)
}

/// Advance a returning player's year.
///
/// A player sitting out this season (`redshirt` set) whose year has no
/// redshirt marker yet keeps the class and gains ` (RS)`; everyone else moves
/// up one class.
pub fn advance_year(year: &str, redshirt: bool) -> String {
    if redshirt && !year.contains("RS") {
        format!("{year} (RS)")
    } else {
        next_class(year).map(str::to_string).unwrap_or_else(|| year.to_string())
    }
}

/// Advance a recruit's year (normally HS -> FR). Redshirt flags are ignored.
pub fn advance_recruit_year(year: &str) -> String {
    if is_redshirt_year(year) {
        return year.to_string();
    }
    next_class(year).map(str::to_string).unwrap_or_else(|| year.to_string())
}

fn leaves_program(status: Status, player: &Player) -> bool {
    status == Status::Graduating || player.is_departing()
}

/// Clear everything that belongs to the season just finished.
fn reset_season_markers(player: &mut Player) {
    player.redshirt = false;
    player.cut = false;
    player.transfer_out = false;
    player.drafted = None;
    player.rating = 0;
    player.base_rating = 0.0;
    player.committed_to = None;
    player.raw.clear();
}

/// Build next season's roster from an analysed roster and the recruiting table.
///
/// Graduating, cut, drafted and transferring players are dropped; the rest
/// advance a class. Recruits committed to `school` (compared against the
/// upper-cased name) join as freshmen. The result is sorted by position order
/// then by this season's rating, highest first, with per-season markers reset.
pub fn next_season(
    analysis: &RosterAnalysis,
    recruits: &[Player],
    school: &str,
) -> Result<Vec<Player>, SeasonError> {
    if analysis.players.is_empty() {
        return Err(SeasonError::EmptyRoster);
    }
    if recruits.is_empty() {
        return Err(SeasonError::EmptyRecruits);
    }

    let mut next: Vec<Player> = analysis
        .players
        .iter()
        .filter(|p| !leaves_program(p.status, &p.player))
        .map(|p| {
            let mut player = p.player.clone();
            player.year = advance_year(&player.year, player.redshirt);
            player
        })
        .collect();

    let returning = next.len();
    info!(
        "{} returning players, {} leaving",
        returning,
        analysis.players.len() - returning
    );

    let school_key = school.trim().to_uppercase();
    next.extend(
        recruits
            .iter()
            .filter(|r| r.committed_to.as_deref().map(str::trim) == Some(school_key.as_str()))
            .map(|r| {
                let mut player = r.clone();
                player.year = advance_recruit_year(&player.year);
                player
            }),
    );
    info!(
        "{} of {} recruits committed to {}",
        next.len() - returning,
        recruits.len(),
        school_key
    );

    next.sort_by(|a, b| {
        position_sort_order(&a.position)
            .cmp(&position_sort_order(&b.position))
            .then_with(|| b.rating.cmp(&a.rating))
    });

    for player in &mut next {
        debug!("Next season: {}", player);
        reset_season_markers(player);
    }

    Ok(next)
}
